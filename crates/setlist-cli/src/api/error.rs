//! API error responses

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use setlist_soundcloud::MetadataError;
use thiserror::Error;

/// Every failure is answered as `{"error": message}`
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400
    #[error("{0}")]
    BadRequest(String),

    /// 404
    #[error("{0}")]
    NotFound(String),

    /// 500
    #[error("{0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Map a resolver failure, using `not_found` as the 404 message
    pub fn from_metadata(err: MetadataError, not_found: &str) -> Self {
        match err {
            MetadataError::InvalidInput(msg) => ApiError::BadRequest(msg),
            MetadataError::NotFound => ApiError::NotFound(not_found.to_string()),
            err @ (MetadataError::UpstreamUnavailable(_) | MetadataError::ScrapeError(_)) => {
                log::error!("Metadata lookup failed: {}", err);
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
