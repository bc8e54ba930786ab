use axum::{
    Router,
    routing::{get, post},
};

use crate::controllers::catalog_controller::{
    create_inverter, create_panel, delete_inverter, delete_panel, get_inverter, get_panel,
    list_inverters, list_panels,
};
use crate::controllers::irradiance_controller::{get_irradiance, list_parameters};
use crate::controllers::sizing_controller::{estimate, size_site};
use crate::shared_state::AppState;

/// Build the `/api/*` sub-router.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // Irradiance
        .route("/parameters",       get(list_parameters))
        .route("/irradiance",       get(get_irradiance))
        // Sizing
        .route("/sizing",           post(size_site))
        .route("/sizing/estimate",  post(estimate))
        // Catalog
        .route("/panels",           get(list_panels).post(create_panel))
        .route("/panels/{id}",      get(get_panel).delete(delete_panel))
        .route("/inverters",        get(list_inverters).post(create_inverter))
        .route("/inverters/{id}",   get(get_inverter).delete(delete_inverter))
        .with_state(state)
}
