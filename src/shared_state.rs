use std::sync::Arc;

use crate::config::SizingDefaults;
use crate::services::catalog::CatalogStore;
use crate::services::nasa_power::PowerDataSource;

#[derive(Clone)]
pub struct AppState {
    /// Remote irradiance source, the NASA POWER client outside of tests
    pub source: Arc<dyn PowerDataSource>,
    /// Panel and inverter records
    pub catalog: CatalogStore,
    /// Fallbacks for fields a request leaves out
    pub defaults: Arc<SizingDefaults>,
}

impl AppState {
    pub fn new(source: Arc<dyn PowerDataSource>, catalog: CatalogStore, defaults: SizingDefaults) -> Self {
        Self { source, catalog, defaults: Arc::new(defaults) }
    }
}
