use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::irradiance::{Parameter, YearRange};

// ─── Requests ────────────────────────────────────────────────────────────────

/// Panel and loss settings shared by both sizing requests.
///
/// A `panel_id` pulls nominal power, efficiency and area from the catalog and
/// takes precedence over the individual fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PanelOptions {
    pub panel_id: Option<u32>,
    /// Dimensionless, conventionally in (0, 1]
    pub performance_ratio: Option<f64>,
    /// kWp per panel
    pub panel_nominal_power_kw: Option<f64>,
    /// Fraction of incident energy converted
    pub panel_efficiency: Option<f64>,
    /// m² per panel
    pub panel_area_m2: Option<f64>,
}

/// `POST /api/sizing`: fetch irradiance for a site, then size the system
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SizingRequest {
    /// Household consumption per month (kWh)
    pub monthly_consumption_kwh: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub parameter: Option<Parameter>,
    pub start: Option<i32>,
    pub end: Option<i32>,
    #[serde(flatten)]
    pub options: PanelOptions,
}

/// `POST /api/sizing/estimate`: size from a known mean monthly irradiance
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EstimateRequest {
    pub monthly_consumption_kwh: f64,
    pub mean_monthly_irradiance: f64,
    #[serde(flatten)]
    pub options: PanelOptions,
}

// ─── Resolved inputs ─────────────────────────────────────────────────────────

/// Panel figures the sizing chain runs with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelSpec {
    /// Catalog panel these figures came from, if any
    pub panel_id: Option<u32>,
    pub nominal_power_kw: f64,
    pub efficiency: f64,
    pub area_m2: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingInputs {
    pub monthly_consumption_kwh: f64,
    pub mean_monthly_irradiance: f64,
    pub performance_ratio: f64,
    pub panel: PanelSpec,
}

// ─── Result ──────────────────────────────────────────────────────────────────

/// Every stage of the sizing chain, plus the inputs it ran with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SizingResult {
    // ── Inputs ───────────────────────────────────────────────────────────────
    pub monthly_consumption_kwh: f64,
    pub mean_monthly_irradiance: f64,
    pub performance_ratio: f64,
    pub panel_id: Option<u32>,
    pub panel_nominal_power_kw: f64,
    pub panel_efficiency: f64,
    pub panel_area_m2: f64,

    // ── Chain ────────────────────────────────────────────────────────────────
    /// kWh/m²/year
    pub yearly_irradiance: f64,
    /// PVOUT, kWh/kWp/year
    pub pv_output: f64,
    /// kWp
    pub peak_power_kwp: f64,
    /// Continuous; rounding is left to the caller
    pub panel_count: f64,
    /// kWh/year
    pub annual_energy_kwh: f64,
}

/// Site and year span the irradiance was fetched for
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SiteSizingResponse {
    pub parameter: Parameter,
    pub latitude: f64,
    pub longitude: f64,
    pub years: YearRange,
    pub sizing: SizingResult,
}
