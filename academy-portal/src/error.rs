//! Error types for academy-portal
//!
//! Every handler returns [`ApiResult`]; failures render as
//! `{"error": {"code", "message", "fields"?}}` with a matching status.

use academy_common::api::types::{ErrorBody, ErrorDetail};
use academy_common::FieldError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Form fields rejected (422)
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Admin authentication failed (401)
    #[error("Unauthorized: {message}")]
    Unauthorized { code: &'static str, message: String },

    /// Conflict (409), e.g. duplicate slug
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Checkout is not configured (503)
    #[error("Payments unavailable: {0}")]
    PaymentUnavailable(String),

    /// Payment provider rejected or failed the call (502)
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<academy_common::Error> for ApiError {
    fn from(err: academy_common::Error) -> Self {
        use academy_common::Error as E;
        match err {
            E::NotFound(msg) => ApiError::NotFound(msg),
            E::InvalidInput(msg) => ApiError::BadRequest(msg),
            E::Validation(fields) => ApiError::Validation(fields),
            E::Database(e) => ApiError::from(e),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return ApiError::Conflict(db_err.message().to_string());
            }
        }
        ApiError::Internal(format!("Database error: {}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut fields = None;
        let (status, code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Validation(errors) => {
                fields = Some(errors);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "VALIDATION_FAILED",
                    "One or more fields are invalid".to_string(),
                )
            }
            ApiError::Unauthorized { code, message } => (StatusCode::UNAUTHORIZED, code, message),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            ApiError::PaymentUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "PAYMENTS_UNAVAILABLE", msg)
            }
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg),
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                internal_error()
            }
            ApiError::Other(ref err) => {
                error!("Unhandled error: {:#}", err);
                internal_error()
            }
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                fields,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Details stay in the server log
fn internal_error() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "Internal server error".to_string(),
    )
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
