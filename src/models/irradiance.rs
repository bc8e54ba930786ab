use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::errors::{Result, SizingError};

// ─── Parameter codes ─────────────────────────────────────────────────────────

macro_rules! power_parameters {
    ($($variant:ident => $code:literal,)+) => {
        /// Solar and meteorological variables served by the NASA POWER
        /// monthly-point endpoint.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        pub enum Parameter {
            $(
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl Parameter {
            pub const ALL: &'static [Parameter] = &[$(Parameter::$variant,)+];

            /// Code as sent in the `parameters` query field
            pub fn code(self) -> &'static str {
                match self {
                    $(Parameter::$variant => $code,)+
                }
            }
        }

        impl FromStr for Parameter {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($code => Ok(Parameter::$variant),)+
                    other => Err(format!("unknown parameter code '{}'", other)),
                }
            }
        }
    };
}

power_parameters! {
    ClrskySfcSwDwn => "CLRSKY_SFC_SW_DWN",
    AllskySfcSwDwn => "ALLSKY_SFC_SW_DWN",
    AllskyKt => "ALLSKY_KT",
    Ws2m => "WS2M",
    Ws10m => "WS10M",
    Ws50m => "WS50M",
    T2m => "T2M",
    T10m => "T10M",
    Ts => "TS",
    Qv2m => "QV2M",
    Rh2m => "RH2M",
    Prectotcorr => "PRECTOTCORR",
    Ps => "PS",
    Wd2m => "WD2M",
    Wd10m => "WD10M",
    Wd50m => "WD50M",
    AllskySfcUvIndex => "ALLSKY_SFC_UV_INDEX",
    AllskySrfAlb => "ALLSKY_SRF_ALB",
    AllskySfcSwUp => "ALLSKY_SFC_SW_UP",
    AllskySfcSwDni => "ALLSKY_SFC_SW_DNI",
    AllskySfcSwDiff => "ALLSKY_SFC_SW_DIFF",
    AllskySfcLwDwn => "ALLSKY_SFC_LW_DWN",
    AllskySfcLwUp => "ALLSKY_SFC_LW_UP",
    CloudAmtDay => "CLOUD_AMT_DAY",
    DirectIlluminance => "DIRECT_ILLUMINANCE",
    GlobalIlluminance => "GLOBAL_ILLUMINANCE",
    DiffuseIlluminance => "DIFFUSE_ILLUMINANCE",
    AllskySfcParTot => "ALLSKY_SFC_PAR_TOT",
    AllskySfcUva => "ALLSKY_SFC_UVA",
    AllskySfcUvb => "ALLSKY_SFC_UVB",
    ClrskySrfAlb => "CLRSKY_SRF_ALB",
    ClrskySfcLwDwn => "CLRSKY_SFC_LW_DWN",
    ClrskySfcLwUp => "CLRSKY_SFC_LW_UP",
    ClrskySfcParTot => "CLRSKY_SFC_PAR_TOT",
    ClrskySfcSwDiff => "CLRSKY_SFC_SW_DIFF",
    ClrskySfcSwDni => "CLRSKY_SFC_SW_DNI",
    ClrskySfcSwUp => "CLRSKY_SFC_SW_UP",
    CloudOd => "CLOUD_OD",
    U2m => "U2M",
    U10m => "U10M",
    U50m => "U50M",
    MiddayInsol => "MIDDAY_INSOL",
    V2m => "V2M",
    V10m => "V10M",
    V50m => "V50M",
    Pbltop => "PBLTOP",
    Pw => "PW",
    Slp => "SLP",
    Rhoa => "RHOA",
    ZenithLuminance => "ZENITH_LUMINANCE",
}

impl Default for Parameter {
    fn default() -> Self {
        Parameter::AllskySfcSwDwn
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ─── Request shapes ──────────────────────────────────────────────────────────

/// Inclusive span of years to request, `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl Default for YearRange {
    fn default() -> Self {
        Self { start: 2020, end: 2024 }
    }
}

/// Everything needed to ask the monthly-point endpoint for one series
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyPointQuery {
    pub parameter: Parameter,
    pub longitude: f64,
    pub latitude: f64,
    pub years: YearRange,
}

impl MonthlyPointQuery {
    /// Query pairs in the form the remote service expects
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("start", self.years.start.to_string()),
            ("end", self.years.end.to_string()),
            ("latitude", self.latitude.to_string()),
            ("longitude", self.longitude.to_string()),
            ("community", "re".to_string()),
            ("parameters", self.parameter.code().to_string()),
            ("format", "json".to_string()),
            ("header", "false".to_string()),
            ("time-standard", "utc".to_string()),
        ]
    }
}

/// Query string accepted by `GET /api/irradiance`
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IrradianceQuery {
    /// Parameter code, defaults to ALLSKY_SFC_SW_DWN
    pub parameter: Option<Parameter>,
    pub latitude: f64,
    pub longitude: f64,
    /// First year, defaults to the configured range
    pub start: Option<i32>,
    /// Last year, defaults to the configured range
    pub end: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IrradianceResponse {
    pub parameter: Parameter,
    pub latitude: f64,
    pub longitude: f64,
    pub years: YearRange,
    /// Mean of the valid monthly readings
    pub mean_monthly: f64,
    /// `mean_monthly` scaled to a year (x 365.25)
    pub yearly: f64,
}

// ─── NASA POWER wire types ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MonthlyPointResponse {
    pub properties: MonthlyPointProperties,
}

#[derive(Debug, Deserialize)]
pub struct MonthlyPointProperties {
    /// parameter code -> "YYYYMM" -> reading
    pub parameter: HashMap<String, BTreeMap<String, f64>>,
}

// ─── Cleaned series ──────────────────────────────────────────────────────────

/// Key suffix the service uses for its per-year annual aggregate
pub const ANNUAL_SUFFIX: &str = "13";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyReading {
    pub year: i32,
    /// Calendar month, 1..=12
    pub month: u32,
    /// `None` when the service reported a non-positive (fill) value
    pub value: Option<f64>,
}

/// Monthly readings for one parameter, years concatenated in key order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlySeries {
    pub readings: Vec<MonthlyReading>,
}

impl MonthlySeries {
    /// Builds the series from the raw `YYYYMM -> value` map.
    ///
    /// Annual aggregate rows (`YYYY13`) are skipped. Any other key that is not
    /// a valid year/month is rejected.
    pub fn from_raw(raw: &BTreeMap<String, f64>) -> Result<Self> {
        let mut readings = Vec::with_capacity(raw.len());
        for (key, &value) in raw {
            if key.ends_with(ANNUAL_SUFFIX) {
                continue;
            }
            let (year, month) = parse_year_month(key)?;
            let value = if value > 0.0 { Some(value) } else { None };
            readings.push(MonthlyReading { year, month, value });
        }
        Ok(Self { readings })
    }

    /// (month, value) pairs that survived cleaning
    pub fn valid(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.readings
            .iter()
            .filter_map(|r| r.value.map(|v| (r.month, v)))
    }

    /// Arithmetic mean of the valid values, `None` if nothing survived
    pub fn mean(&self) -> Option<f64> {
        let (sum, count) = self
            .valid()
            .fold((0.0, 0usize), |(sum, count), (_, v)| (sum + v, count + 1));
        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }
}

fn parse_year_month(key: &str) -> Result<(i32, u32)> {
    let bad_key = || SizingError::MalformedResponse(format!("'{}' is not a YYYYMM key", key));

    if key.len() != 6 || !key.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad_key());
    }
    let year: i32 = key[..4].parse().map_err(|_| bad_key())?;
    let month: u32 = key[4..].parse().map_err(|_| bad_key())?;
    let date = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(bad_key)?;
    Ok((date.year(), date.month()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn raw(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_parameter_codes_round_trip_through_from_str() {
        assert_eq!(Parameter::ALL.len(), 50);
        for p in Parameter::ALL {
            assert_eq!(p.code().parse::<Parameter>(), Ok(*p));
        }
        assert!("NOT_A_CODE".parse::<Parameter>().is_err());
    }

    #[test]
    fn test_parameter_serde_uses_service_code() {
        let json = serde_json::to_string(&Parameter::AllskySfcSwDwn).unwrap();
        assert_eq!(json, "\"ALLSKY_SFC_SW_DWN\"");
        let back: Parameter = serde_json::from_str("\"T2M\"").unwrap();
        assert_eq!(back, Parameter::T2m);
        assert_eq!(Parameter::default(), Parameter::AllskySfcSwDwn);
    }

    #[test]
    fn test_query_pairs() {
        let q = MonthlyPointQuery {
            parameter: Parameter::AllskySfcSwDwn,
            longitude: -73.75,
            latitude: 3.99,
            years: YearRange::default(),
        };
        let pairs = q.to_query_pairs();
        let get = |k: &str| pairs.iter().find(|(key, _)| *key == k).map(|(_, v)| v.as_str());
        assert_eq!(get("start"), Some("2020"));
        assert_eq!(get("end"), Some("2024"));
        assert_eq!(get("community"), Some("re"));
        assert_eq!(get("parameters"), Some("ALLSKY_SFC_SW_DWN"));
        assert_eq!(get("format"), Some("json"));
        assert_eq!(get("header"), Some("false"));
        assert_eq!(get("time-standard"), Some("utc"));
        assert_eq!(get("longitude"), Some("-73.75"));
    }

    #[test]
    fn test_annual_rows_are_skipped() {
        let series = MonthlySeries::from_raw(&raw(&[
            ("202001", 5.0),
            ("202002", 6.0),
            ("202013", 5.5),
        ]))
        .unwrap();
        assert_eq!(series.readings.len(), 2);
        assert!(series.readings.iter().all(|r| r.month != 13));
    }

    #[test]
    fn test_years_concatenate_in_key_order() {
        let series = MonthlySeries::from_raw(&raw(&[
            ("202112", 3.0),
            ("202001", 1.0),
            ("202101", 2.0),
            ("202013", 9.0),
        ]))
        .unwrap();
        let months: Vec<(i32, u32)> = series.readings.iter().map(|r| (r.year, r.month)).collect();
        assert_eq!(months, vec![(2020, 1), (2021, 1), (2021, 12)]);
    }

    #[test]
    fn test_twelve_months_mean() {
        let values = [100.0, 120.0, 140.0, 160.0, 180.0, 200.0, 180.0, 160.0, 140.0, 120.0, 100.0, 80.0];
        let entries: Vec<(String, f64)> = values
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("2020{:02}", i + 1), *v))
            .collect();
        let map: BTreeMap<String, f64> = entries.into_iter().collect();
        let series = MonthlySeries::from_raw(&map).unwrap();
        assert_relative_eq!(series.mean().unwrap(), 140.0);
    }

    #[test]
    fn test_non_positive_values_are_missing() {
        let series = MonthlySeries::from_raw(&raw(&[
            ("202001", -5.0),
            ("202002", 10.0),
            ("202003", 20.0),
            ("202004", 0.0),
            ("202005", -999.0),
        ]))
        .unwrap();
        assert_eq!(series.readings.len(), 5);
        assert_eq!(series.valid().count(), 2);
        assert_eq!(series.mean(), Some(15.0));
    }

    #[test]
    fn test_empty_series_has_no_mean() {
        let series = MonthlySeries::from_raw(&raw(&[("202013", 4.0), ("202113", 4.2)])).unwrap();
        assert!(series.readings.is_empty());
        assert_eq!(series.mean(), None);
    }

    #[test]
    fn test_bad_keys_are_malformed() {
        for key in ["2020", "2020AB", "202000", "20201"] {
            let result = MonthlySeries::from_raw(&raw(&[(key, 1.0)]));
            assert!(
                matches!(result, Err(SizingError::MalformedResponse(_))),
                "key {} should be rejected",
                key
            );
        }
    }
}
