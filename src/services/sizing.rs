/// ============================================================
///  PV system sizing chain
///
///   1. Yearly irradiance – mean monthly reading × 365.25
///   2. PV output (PVOUT) – yearly irradiance × performance ratio
///   3. Peak power        – yearly consumption / PVOUT
///   4. Panel count       – peak power / panel nominal power
///   5. Energy produced   – irradiance × efficiency × array area × PR
///
///  The formula functions keep IEEE semantics (x / 0 = inf); the
///  pipeline refuses zero divisors instead.
/// ============================================================

use tracing::{debug, info};

use crate::errors::{Result, SizingError};
use crate::models::irradiance::MonthlyPointQuery;
use crate::models::sizing::{PanelSpec, SizingInputs, SizingResult};
use crate::services::nasa_power::{self, PowerDataSource};

// ─── Constants ───────────────────────────────────────────────────────────────
pub const DAYS_PER_YEAR: f64 = 365.25;
pub const MONTHS_PER_YEAR: f64 = 12.0;
pub const DEFAULT_PERFORMANCE_RATIO: f64 = 0.8;
pub const DEFAULT_PANEL_NOMINAL_POWER_KW: f64 = 0.620;
pub const DEFAULT_PANEL_AREA_M2: f64 = 2.53;

// ─── Formulas ────────────────────────────────────────────────────────────────

/// kWh/m²/year from the mean monthly reading (daily-equivalent units)
pub fn yearly_irradiance(mean_monthly: f64) -> f64 {
    mean_monthly * DAYS_PER_YEAR
}

/// kWh/kWp/year
pub fn pv_output(yearly_irradiance: f64, performance_ratio: f64) -> f64 {
    yearly_irradiance * performance_ratio
}

/// kWp needed to cover a year of consumption
pub fn required_peak_power(monthly_consumption: f64, pv_output: f64) -> f64 {
    (monthly_consumption * MONTHS_PER_YEAR) / pv_output
}

pub fn panel_count(peak_power: f64, panel_nominal_power: f64) -> f64 {
    peak_power / panel_nominal_power
}

/// kWh/year for an array of `panels` panels of `panel_area` m² each
pub fn energy_produced(
    yearly_irradiance: f64,
    efficiency: f64,
    panels: f64,
    panel_area: f64,
    performance_ratio: f64,
) -> f64 {
    let array_area = panels * panel_area;
    yearly_irradiance * efficiency * array_area * performance_ratio
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

impl SizingInputs {
    /// Runs the chain, rejecting any stage that would divide by zero
    pub fn compute(&self) -> Result<SizingResult> {
        let panel = &self.panel;

        let yearly = yearly_irradiance(self.mean_monthly_irradiance);
        let specific_yield = pv_output(yearly, self.performance_ratio);
        if specific_yield == 0.0 {
            return Err(SizingError::ArithmeticDegenerate("pv_output"));
        }
        let peak_power_kwp = required_peak_power(self.monthly_consumption_kwh, specific_yield);

        if panel.nominal_power_kw == 0.0 {
            return Err(SizingError::ArithmeticDegenerate("panel_nominal_power"));
        }
        let panels = panel_count(peak_power_kwp, panel.nominal_power_kw);
        let annual_energy = energy_produced(
            yearly,
            panel.efficiency,
            panels,
            panel.area_m2,
            self.performance_ratio,
        );

        debug!(
            "[SIZING] yearly={:.3} pvout={:.3} peak={:.3}kWp panels={:.3} energy={:.1}kWh",
            yearly, specific_yield, peak_power_kwp, panels, annual_energy
        );

        Ok(SizingResult {
            monthly_consumption_kwh: self.monthly_consumption_kwh,
            mean_monthly_irradiance: self.mean_monthly_irradiance,
            performance_ratio: self.performance_ratio,
            panel_id: panel.panel_id,
            panel_nominal_power_kw: panel.nominal_power_kw,
            panel_efficiency: panel.efficiency,
            panel_area_m2: panel.area_m2,
            yearly_irradiance: yearly,
            pv_output: specific_yield,
            peak_power_kwp,
            panel_count: panels,
            annual_energy_kwh: annual_energy,
        })
    }
}

/// fetch → yearly → PVOUT → peak power → panel count → energy
pub async fn size_system(
    source: &dyn PowerDataSource,
    query: &MonthlyPointQuery,
    monthly_consumption_kwh: f64,
    performance_ratio: f64,
    panel: PanelSpec,
) -> Result<SizingResult> {
    let mean_monthly_irradiance = nasa_power::fetch_mean_monthly(
        source,
        query.parameter,
        query.longitude,
        query.latitude,
        query.years,
    )
    .await?;

    let result = SizingInputs {
        monthly_consumption_kwh,
        mean_monthly_irradiance,
        performance_ratio,
        panel,
    }
    .compute()?;

    info!(
        "[SIZING] ({:.4}, {:.4}) {} kWh/month -> {:.2} kWp, {:.2} panels, {:.0} kWh/year",
        query.latitude,
        query.longitude,
        monthly_consumption_kwh,
        result.peak_power_kwp,
        result.panel_count,
        result.annual_energy_kwh
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::irradiance::{Parameter, YearRange};
    use crate::services::nasa_power::testing::FakeSource;
    use approx::assert_abs_diff_eq;

    fn default_panel(efficiency: f64) -> PanelSpec {
        PanelSpec {
            panel_id: None,
            nominal_power_kw: DEFAULT_PANEL_NOMINAL_POWER_KW,
            efficiency,
            area_m2: DEFAULT_PANEL_AREA_M2,
        }
    }

    #[test]
    fn test_pv_output() {
        assert_eq!(pv_output(1000.0, 0.8), 800.0);
        assert_eq!(pv_output(1000.0, DEFAULT_PERFORMANCE_RATIO), 800.0);
    }

    #[test]
    fn test_required_peak_power() {
        assert_eq!(required_peak_power(1000.0, 800.0), 15.0);
    }

    #[test]
    fn test_required_peak_power_zero_output_is_infinite() {
        assert!(required_peak_power(1000.0, 0.0).is_infinite());
    }

    #[test]
    fn test_panel_count_not_rounded() {
        let count = panel_count(15.0, DEFAULT_PANEL_NOMINAL_POWER_KW);
        assert_abs_diff_eq!(count, 24.19, epsilon = 0.005);
        assert!(count.fract() != 0.0);
    }

    #[test]
    fn test_energy_produced() {
        // 1000 kWh/m² × 0.2 × (10 × 2.0 m²) × 0.8
        assert_abs_diff_eq!(energy_produced(1000.0, 0.2, 10.0, 2.0, 0.8), 3200.0, epsilon = 1e-9);
    }

    #[test]
    fn test_formulas_are_pure() {
        let first = (
            yearly_irradiance(4.5),
            pv_output(1643.625, 0.8),
            required_peak_power(1000.0, 1314.9),
            panel_count(9.126, 0.62),
            energy_produced(1643.625, 0.21, 14.7, 2.53, 0.8),
        );
        let second = (
            yearly_irradiance(4.5),
            pv_output(1643.625, 0.8),
            required_peak_power(1000.0, 1314.9),
            panel_count(9.126, 0.62),
            energy_produced(1643.625, 0.21, 14.7, 2.53, 0.8),
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_compute_matches_each_formula() {
        let inputs = SizingInputs {
            monthly_consumption_kwh: 1000.0,
            mean_monthly_irradiance: 4.5,
            performance_ratio: DEFAULT_PERFORMANCE_RATIO,
            panel: default_panel(0.21),
        };
        let result = inputs.compute().unwrap();

        let yearly = 4.5 * 365.25;
        let pvout = yearly * 0.8;
        let peak = 1000.0 * 12.0 / pvout;
        let panels = peak / 0.620;
        let energy = yearly * 0.21 * (panels * 2.53) * 0.8;

        assert_eq!(result.yearly_irradiance, yearly);
        assert_eq!(result.pv_output, pvout);
        assert_eq!(result.peak_power_kwp, peak);
        assert_eq!(result.panel_count, panels);
        assert_eq!(result.annual_energy_kwh, energy);
        assert_eq!(inputs.compute().unwrap(), result);
    }

    #[test]
    fn test_compute_rejects_zero_pv_output() {
        let inputs = SizingInputs {
            monthly_consumption_kwh: 1000.0,
            mean_monthly_irradiance: 4.5,
            performance_ratio: 0.0,
            panel: default_panel(0.21),
        };
        assert!(matches!(
            inputs.compute(),
            Err(SizingError::ArithmeticDegenerate("pv_output"))
        ));
    }

    #[test]
    fn test_compute_rejects_zero_nominal_power() {
        let mut panel = default_panel(0.21);
        panel.nominal_power_kw = 0.0;
        let inputs = SizingInputs {
            monthly_consumption_kwh: 1000.0,
            mean_monthly_irradiance: 4.5,
            performance_ratio: 0.8,
            panel,
        };
        assert!(matches!(
            inputs.compute(),
            Err(SizingError::ArithmeticDegenerate("panel_nominal_power"))
        ));
    }

    #[tokio::test]
    async fn test_size_system_end_to_end() {
        let keys: Vec<String> = (1..=12).map(|m| format!("2023{:02}", m)).collect();
        let mut entries: Vec<(&str, f64)> = keys.iter().map(|k| (k.as_str(), 4.5)).collect();
        entries.push(("202313", 4.5));
        let source = FakeSource::with_values(Parameter::AllskySfcSwDwn, &entries);
        let query = MonthlyPointQuery {
            parameter: Parameter::AllskySfcSwDwn,
            longitude: -73.756138,
            latitude: 3.997587,
            years: YearRange { start: 2023, end: 2023 },
        };

        let result = size_system(&source, &query, 1000.0, 0.8, default_panel(0.21))
            .await
            .unwrap();

        let yearly = result.mean_monthly_irradiance * 365.25;
        assert_abs_diff_eq!(result.mean_monthly_irradiance, 4.5, epsilon = 1e-12);
        assert_eq!(result.yearly_irradiance, yearly);
        assert_eq!(result.pv_output, pv_output(yearly, 0.8));
        assert_eq!(result.peak_power_kwp, required_peak_power(1000.0, result.pv_output));
        assert_eq!(result.panel_count, panel_count(result.peak_power_kwp, 0.620));
        assert_eq!(
            result.annual_energy_kwh,
            energy_produced(yearly, 0.21, result.panel_count, 2.53, 0.8)
        );
    }

    #[tokio::test]
    async fn test_size_system_propagates_fetch_error() {
        let source = FakeSource::failing("boom");
        let query = MonthlyPointQuery {
            parameter: Parameter::AllskySfcSwDwn,
            longitude: 0.0,
            latitude: 0.0,
            years: YearRange::default(),
        };
        let result = size_system(&source, &query, 1000.0, 0.8, default_panel(0.21)).await;
        assert!(matches!(result, Err(SizingError::RemoteService(_))));
    }
}
