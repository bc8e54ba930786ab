pub mod api_routes;

use axum::{Router, response::Html, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_scalar::Scalar;

use crate::api_docs::ApiDoc;
use crate::routes::api_routes::api_routes;
use crate::shared_state::AppState;

/// Full application router: `/api/*`, the Scalar UI, tracing and CORS
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes(state))
        .route("/scalar", get(|| async {
            Html(Scalar::new(ApiDoc::openapi()).to_html())
        }))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
