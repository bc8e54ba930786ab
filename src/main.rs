mod routes;
mod controllers;
mod services;
mod models;
mod api_docs;
mod errors;
mod shared_state;
mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::services::catalog::CatalogStore;
use crate::services::nasa_power::NasaPowerClient;
use crate::shared_state::AppState;

#[cfg(feature = "verbose_log")]
const DEFAULT_LOG_LEVEL: &str = "debug";
#[cfg(not(feature = "verbose_log"))]
const DEFAULT_LOG_LEVEL: &str = "info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new(format!(
                    "solar_sizing={lvl},tower_http={lvl}",
                    lvl = DEFAULT_LOG_LEVEL
                ))
            }),
        )
        .init();

    // 2. Load configuration
    let config = Config::from_env()?;

    // 3. Remote irradiance source
    let source = NasaPowerClient::from_config(&config.nasa_power)?;

    // 4. Component catalog
    let catalog = match &config.catalog.path {
        Some(path) => CatalogStore::open(path).await?,
        None => {
            info!("[CATALOG] No catalog path configured, keeping records in memory");
            CatalogStore::in_memory()
        }
    };

    let state = AppState::new(Arc::new(source), catalog, config.sizing.clone());

    // 5. HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("API Server listening on http://{}", addr);
    info!("Scalar UI: http://{}/scalar", addr);

    axum_server::bind(addr)
        .serve(routes::app(state).into_make_service())
        .await?;

    Ok(())
}
