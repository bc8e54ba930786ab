use axum::{Json, extract::State};

use crate::controllers::irradiance_controller::resolve_years;
use crate::errors::ApiError;
use crate::models::irradiance::MonthlyPointQuery;
use crate::models::sizing::{
    EstimateRequest, PanelOptions, PanelSpec, SiteSizingResponse, SizingInputs, SizingRequest,
    SizingResult,
};
use crate::services::sizing;
use crate::shared_state::AppState;

/// Performance ratio and panel figures for a request.
///
/// A catalog panel wins over the individual fields, which win over the
/// configured defaults. Efficiency has no default.
async fn resolve_panel(state: &AppState, options: &PanelOptions) -> Result<(f64, PanelSpec), ApiError> {
    let performance_ratio = options
        .performance_ratio
        .unwrap_or(state.defaults.performance_ratio);

    let panel = match options.panel_id {
        Some(id) => {
            let panel = state.catalog.get_panel(id).await?;
            PanelSpec {
                panel_id: Some(panel.id),
                nominal_power_kw: panel.spec.nominal_power,
                efficiency: panel.spec.efficiency,
                area_m2: panel.area(),
            }
        }
        None => PanelSpec {
            panel_id: None,
            nominal_power_kw: options
                .panel_nominal_power_kw
                .unwrap_or(state.defaults.panel_nominal_power_kw),
            efficiency: options.panel_efficiency.ok_or_else(|| {
                ApiError::BadRequest("panel_efficiency or panel_id is required".to_string())
            })?,
            area_m2: options.panel_area_m2.unwrap_or(state.defaults.panel_area_m2),
        },
    };

    Ok((performance_ratio, panel))
}

/// POST /api/sizing
/// Size a PV system for a site
///
/// Fetches the site's mean monthly irradiance, then runs it through PVOUT,
/// peak power, panel count and annual energy.
#[utoipa::path(
    post,
    path = "/api/sizing",
    request_body = SizingRequest,
    responses(
        (status = 200, description = "Sizing chain for the site", body = SiteSizingResponse),
        (status = 400, description = "Missing panel efficiency or invalid year span"),
        (status = 404, description = "Panel not found"),
        (status = 422, description = "A divisor in the chain is zero"),
        (status = 502, description = "Remote service failed or returned unusable data")
    )
)]
pub async fn size_site(
    State(state): State<AppState>,
    Json(request): Json<SizingRequest>,
) -> Result<Json<SiteSizingResponse>, ApiError> {
    let (performance_ratio, panel) = resolve_panel(&state, &request.options).await?;
    let query = MonthlyPointQuery {
        parameter: request.parameter.unwrap_or(state.defaults.parameter),
        longitude: request.longitude,
        latitude: request.latitude,
        years: resolve_years(request.start, request.end, state.defaults.years)?,
    };

    let sized = sizing::size_system(
        state.source.as_ref(),
        &query,
        request.monthly_consumption_kwh,
        performance_ratio,
        panel,
    )
    .await?;

    Ok(Json(SiteSizingResponse {
        parameter: query.parameter,
        latitude: query.latitude,
        longitude: query.longitude,
        years: query.years,
        sizing: sized,
    }))
}

/// POST /api/sizing/estimate
/// Size a PV system from a known irradiance
///
/// Same chain as `/api/sizing` without the remote fetch.
#[utoipa::path(
    post,
    path = "/api/sizing/estimate",
    request_body = EstimateRequest,
    responses(
        (status = 200, description = "Sizing chain", body = SizingResult),
        (status = 400, description = "Missing panel efficiency"),
        (status = 404, description = "Panel not found"),
        (status = 422, description = "A divisor in the chain is zero")
    )
)]
pub async fn estimate(
    State(state): State<AppState>,
    Json(request): Json<EstimateRequest>,
) -> Result<Json<SizingResult>, ApiError> {
    let (performance_ratio, panel) = resolve_panel(&state, &request.options).await?;
    let result = SizingInputs {
        monthly_consumption_kwh: request.monthly_consumption_kwh,
        mean_monthly_irradiance: request.mean_monthly_irradiance,
        performance_ratio,
        panel,
    }
    .compute()?;
    Ok(Json(result))
}
