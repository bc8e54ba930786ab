use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ─── Panels ──────────────────────────────────────────────────────────────────

/// Panel fields supplied when adding to the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewPanel {
    pub name: String,
    pub manufacturer: String,
    /// m
    pub length: f64,
    /// m
    pub width: f64,
    /// kg
    pub weight: f64,
    /// COP
    #[serde(default)]
    pub price: Option<f64>,
    /// Fraction of incident energy converted
    pub efficiency: f64,
    /// kWp
    pub nominal_power: f64,
    /// V
    pub open_circuit_voltage: f64,
    /// A
    pub short_circuit_current: f64,
    /// V
    pub mpp_voltage: f64,
    /// A
    pub mpp_current: f64,
    /// %V/°C
    pub voltage_temperature_coefficient: f64,
    /// %A/°C
    pub current_temperature_coefficient: f64,
}

/// A stored solar panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Panel {
    pub id: u32,
    #[serde(flatten)]
    pub spec: NewPanel,
}

impl Panel {
    /// m²
    pub fn area(&self) -> f64 {
        self.spec.length * self.spec.width
    }

    /// kg/m², zero for a degenerate footprint
    pub fn density(&self) -> f64 {
        let area = self.area();
        if area > 0.0 { self.spec.weight / area } else { 0.0 }
    }
}

/// Panel as returned by the API, with its derived figures
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PanelView {
    #[serde(flatten)]
    pub panel: Panel,
    pub area: f64,
    pub density: f64,
}

impl From<Panel> for PanelView {
    fn from(panel: Panel) -> Self {
        let area = panel.area();
        let density = panel.density();
        Self { panel, area, density }
    }
}

// ─── Inverters ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewInverter {
    pub name: String,
    pub manufacturer: String,
    /// kWp
    pub nominal_power: f64,
    /// Number of MPP inlets
    pub no_mpp: u32,
    /// V
    pub min_input_voltage: f64,
    /// V
    pub max_input_voltage: f64,
    /// A
    pub max_output_current: f64,
    /// V
    pub output_voltage: f64,
    /// kg
    pub weight: f64,
    /// m
    pub width: f64,
    /// m
    pub height: f64,
    /// m
    pub depth: f64,
    #[serde(default)]
    pub efficiency: Option<f64>,
    /// COP
    #[serde(default)]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Inverter {
    pub id: u32,
    #[serde(flatten)]
    pub spec: NewInverter,
}

impl Inverter {
    /// m³
    pub fn volume(&self) -> f64 {
        self.spec.width * self.spec.height * self.spec.depth
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InverterView {
    #[serde(flatten)]
    pub inverter: Inverter,
    pub volume: f64,
}

impl From<Inverter> for InverterView {
    fn from(inverter: Inverter) -> Self {
        let volume = inverter.volume();
        Self { inverter, volume }
    }
}
