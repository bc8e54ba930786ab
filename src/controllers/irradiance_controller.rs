use axum::{
    Json,
    extract::{Query, State},
};

use crate::errors::ApiError;
use crate::models::irradiance::{IrradianceQuery, IrradianceResponse, Parameter, YearRange};
use crate::services::{nasa_power, sizing};
use crate::shared_state::AppState;

/// Applies configured defaults to an optional year span, rejecting reversed spans
pub fn resolve_years(
    start: Option<i32>,
    end: Option<i32>,
    defaults: YearRange,
) -> Result<YearRange, ApiError> {
    let years = YearRange {
        start: start.unwrap_or(defaults.start),
        end: end.unwrap_or(defaults.end),
    };
    if years.start > years.end {
        return Err(ApiError::BadRequest(format!(
            "start year {} is after end year {}",
            years.start, years.end
        )));
    }
    Ok(years)
}

/// GET /api/parameters
/// List the parameter codes the remote service can be asked for
#[utoipa::path(
    get,
    path = "/api/parameters",
    responses(
        (status = 200, description = "Known parameter codes", body = Vec<Parameter>)
    )
)]
pub async fn list_parameters() -> Json<Vec<Parameter>> {
    Json(Parameter::ALL.to_vec())
}

/// GET /api/irradiance
/// Mean monthly reading for a site
///
/// Fetches the monthly series for the parameter, drops annual rows and
/// non-positive readings, and returns the mean together with its yearly
/// equivalent.
#[utoipa::path(
    get,
    path = "/api/irradiance",
    params(IrradianceQuery),
    responses(
        (status = 200, description = "Mean monthly and yearly irradiance", body = IrradianceResponse),
        (status = 400, description = "Invalid query"),
        (status = 502, description = "Remote service failed or returned unusable data")
    )
)]
pub async fn get_irradiance(
    State(state): State<AppState>,
    Query(query): Query<IrradianceQuery>,
) -> Result<Json<IrradianceResponse>, ApiError> {
    let parameter = query.parameter.unwrap_or(state.defaults.parameter);
    let years = resolve_years(query.start, query.end, state.defaults.years)?;

    let mean_monthly = nasa_power::fetch_mean_monthly(
        state.source.as_ref(),
        parameter,
        query.longitude,
        query.latitude,
        years,
    )
    .await?;

    Ok(Json(IrradianceResponse {
        parameter,
        latitude: query.latitude,
        longitude: query.longitude,
        years,
        mean_monthly,
        yearly: sizing::yearly_irradiance(mean_monthly),
    }))
}
