//! API error types with `{detail}` JSON responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::types::ErrorBody;
use crate::application::RecommendError;
use crate::domain::ValidationError;

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or out-of-range request input.
    #[error("{0}")]
    Validation(String),

    /// Failure while scoring; the message is returned to the caller as-is.
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Validation(detail) => {
                tracing::debug!(detail, "Rejected recommendation request");
                (StatusCode::UNPROCESSABLE_ENTITY, detail)
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "Recommendation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, detail)
            }
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<RecommendError> for ApiError {
    fn from(err: RecommendError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
