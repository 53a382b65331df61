//! Authentication middleware for admin routes
//!
//! Checks `x-academy-timestamp` and `x-academy-signature` against the shared
//! secret. The signature covers method, path (with query string), timestamp
//! and canonical JSON body.

use axum::{
    body::Body,
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde_json::Value;
use tracing::warn;

use academy_common::api::auth::{
    now_millis, validate_signature, validate_timestamp, ApiAuthError, SIGNATURE_HEADER,
    TIMESTAMP_HEADER,
};

use crate::{ApiError, AppState};

/// Largest admin request body accepted (1 MiB)
const MAX_ADMIN_BODY_BYTES: usize = 1024 * 1024;

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn unauthorized(code: &'static str, message: impl Into<String>) -> ApiError {
    ApiError::Unauthorized {
        code,
        message: message.into(),
    }
}

/// Admin authentication middleware
///
/// Returns 401 when headers are missing, stale or mis-signed. A shared secret
/// of 0 turns checking off.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if state.admin_secret == 0 {
        return Ok(next.run(request).await);
    }

    let (parts, body) = request.into_parts();

    let timestamp = header_str(&parts.headers, TIMESTAMP_HEADER)
        .and_then(|v| v.trim().parse::<i64>().ok())
        .ok_or_else(|| unauthorized("missing_headers", format!("{} header required", TIMESTAMP_HEADER)))?;
    let signature = header_str(&parts.headers, SIGNATURE_HEADER)
        .map(str::to_string)
        .ok_or_else(|| unauthorized("missing_headers", format!("{} header required", SIGNATURE_HEADER)))?;

    validate_timestamp(timestamp, now_millis()).map_err(|e| match e {
        ApiAuthError::InvalidTimestamp { reason, .. } => unauthorized("timestamp_invalid", reason),
        other => ApiError::Internal(other.to_string()),
    })?;

    let body_bytes = axum::body::to_bytes(body, MAX_ADMIN_BODY_BYTES)
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read body: {}", e)))?;

    let json_body: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes)
            .map_err(|e| ApiError::BadRequest(format!("Invalid JSON: {}", e)))?
    };

    let path = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| parts.uri.path());

    validate_signature(
        &signature,
        parts.method.as_str(),
        path,
        timestamp,
        &json_body,
        state.admin_secret,
    )
    .map_err(|e| match e {
        ApiAuthError::InvalidSignature { .. } => {
            warn!(method = %parts.method, path, "Admin signature rejected");
            unauthorized("signature_invalid", "Invalid signature")
        }
        other => ApiError::Internal(other.to_string()),
    })?;

    let request = Request::from_parts(parts, Body::from(body_bytes));
    Ok(next.run(request).await)
}
