use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::errors::ApiError;
use crate::models::catalog::{InverterView, NewInverter, NewPanel, PanelView};
use crate::shared_state::AppState;

// ─── Panels ──────────────────────────────────────────────────────────────────

/// GET /api/panels
/// List catalog panels with derived area and density
#[utoipa::path(
    get,
    path = "/api/panels",
    responses(
        (status = 200, description = "All panels", body = Vec<PanelView>)
    )
)]
pub async fn list_panels(State(state): State<AppState>) -> Json<Vec<PanelView>> {
    let panels = state.catalog.list_panels().await;
    Json(panels.into_iter().map(PanelView::from).collect())
}

/// GET /api/panels/{id}
#[utoipa::path(
    get,
    path = "/api/panels/{id}",
    params(("id" = u32, Path, description = "Panel id")),
    responses(
        (status = 200, description = "The panel", body = PanelView),
        (status = 404, description = "Panel not found")
    )
)]
pub async fn get_panel(
    Path(id): Path<u32>,
    State(state): State<AppState>,
) -> Result<Json<PanelView>, ApiError> {
    Ok(Json(state.catalog.get_panel(id).await?.into()))
}

/// POST /api/panels
#[utoipa::path(
    post,
    path = "/api/panels",
    request_body = NewPanel,
    responses(
        (status = 201, description = "Panel added", body = PanelView),
        (status = 500, description = "Catalog file could not be written")
    )
)]
pub async fn create_panel(
    State(state): State<AppState>,
    Json(spec): Json<NewPanel>,
) -> Result<(StatusCode, Json<PanelView>), ApiError> {
    let panel = state.catalog.add_panel(spec).await?;
    Ok((StatusCode::CREATED, Json(panel.into())))
}

/// DELETE /api/panels/{id}
#[utoipa::path(
    delete,
    path = "/api/panels/{id}",
    params(("id" = u32, Path, description = "Panel id")),
    responses(
        (status = 204, description = "Panel removed"),
        (status = 404, description = "Panel not found")
    )
)]
pub async fn delete_panel(
    Path(id): Path<u32>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state.catalog.remove_panel(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─── Inverters ───────────────────────────────────────────────────────────────

/// GET /api/inverters
#[utoipa::path(
    get,
    path = "/api/inverters",
    responses(
        (status = 200, description = "All inverters", body = Vec<InverterView>)
    )
)]
pub async fn list_inverters(State(state): State<AppState>) -> Json<Vec<InverterView>> {
    let inverters = state.catalog.list_inverters().await;
    Json(inverters.into_iter().map(InverterView::from).collect())
}

/// GET /api/inverters/{id}
#[utoipa::path(
    get,
    path = "/api/inverters/{id}",
    params(("id" = u32, Path, description = "Inverter id")),
    responses(
        (status = 200, description = "The inverter", body = InverterView),
        (status = 404, description = "Inverter not found")
    )
)]
pub async fn get_inverter(
    Path(id): Path<u32>,
    State(state): State<AppState>,
) -> Result<Json<InverterView>, ApiError> {
    Ok(Json(state.catalog.get_inverter(id).await?.into()))
}

/// POST /api/inverters
#[utoipa::path(
    post,
    path = "/api/inverters",
    request_body = NewInverter,
    responses(
        (status = 201, description = "Inverter added", body = InverterView),
        (status = 500, description = "Catalog file could not be written")
    )
)]
pub async fn create_inverter(
    State(state): State<AppState>,
    Json(spec): Json<NewInverter>,
) -> Result<(StatusCode, Json<InverterView>), ApiError> {
    let inverter = state.catalog.add_inverter(spec).await?;
    Ok((StatusCode::CREATED, Json(inverter.into())))
}

/// DELETE /api/inverters/{id}
#[utoipa::path(
    delete,
    path = "/api/inverters/{id}",
    params(("id" = u32, Path, description = "Inverter id")),
    responses(
        (status = 204, description = "Inverter removed"),
        (status = 404, description = "Inverter not found")
    )
)]
pub async fn delete_inverter(
    Path(id): Path<u32>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state.catalog.remove_inverter(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
