use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::models::irradiance::{Parameter, YearRange};
use crate::services::sizing::{
    DEFAULT_PANEL_AREA_M2, DEFAULT_PANEL_NOMINAL_POWER_KW, DEFAULT_PERFORMANCE_RATIO,
};

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "SOLAR_SIZING_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

fn default_port() -> u16 { 8080 }
fn default_base_url() -> String { "https://power.larc.nasa.gov".to_string() }
fn default_timeout_secs() -> u64 { 30 }

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub nasa_power: NasaPowerConfig,
    #[serde(default)]
    pub sizing: SizingDefaults,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct NasaPowerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Whole-request timeout; the service itself has none
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NasaPowerConfig {
    fn default() -> Self {
        Self { base_url: default_base_url(), timeout_secs: default_timeout_secs() }
    }
}

/// Values used when a sizing request leaves them out
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SizingDefaults {
    pub parameter: Parameter,
    pub years: YearRange,
    pub performance_ratio: f64,
    /// kWp
    pub panel_nominal_power_kw: f64,
    /// m²
    pub panel_area_m2: f64,
}

impl Default for SizingDefaults {
    fn default() -> Self {
        Self {
            parameter: Parameter::default(),
            years: YearRange::default(),
            performance_ratio: DEFAULT_PERFORMANCE_RATIO,
            panel_nominal_power_kw: DEFAULT_PANEL_NOMINAL_POWER_KW,
            panel_area_m2: DEFAULT_PANEL_AREA_M2,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// JSON file holding panels and inverters; in-memory only when absent
    pub path: Option<String>,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Loads the file named by `SOLAR_SIZING_CONFIG` (or `config.json`),
    /// falling back to defaults when it does not exist.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_or_default(&path)
    }

    /// Like `load`, but a missing file yields the defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                info!("[CONFIG] Loaded {}", path.display());
                Ok(config)
            }
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("[CONFIG] {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }
}
