//! Error types for the fetcher, the sizing chain and the HTTP layer

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::catalog::CatalogError;

/// Failures of the irradiance-to-sizing pipeline
#[derive(Debug, Error)]
pub enum SizingError {
    #[error("remote service error: {0}")]
    RemoteService(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("degenerate arithmetic: {0} is zero")]
    ArithmeticDegenerate(&'static str),
}

impl From<reqwest::Error> for SizingError {
    fn from(e: reqwest::Error) -> Self {
        SizingError::RemoteService(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SizingError>;

/// Everything a handler can fail with
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Sizing(#[from] SizingError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Sizing(SizingError::RemoteService(_))
            | ApiError::Sizing(SizingError::MalformedResponse(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Sizing(SizingError::ArithmeticDegenerate(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Catalog(CatalogError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("[API] {} -> {}", self, status);
        } else {
            tracing::warn!("[API] {} -> {}", self, status);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
