//! Liveness endpoint

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok", or "degraded" when the database does not answer
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    pub build: &'static str,
    pub database: &'static str,
}

/// GET /health (no auth)
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database_ok = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => true,
        Err(e) => {
            warn!("Health check query failed: {}", e);
            false
        }
    };

    let (code, status, database) = if database_ok {
        (StatusCode::OK, "ok", "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable")
    };

    (
        code,
        Json(HealthResponse {
            status,
            module: "academy-portal",
            version: env!("CARGO_PKG_VERSION"),
            build: env!("GIT_HASH"),
            database,
        }),
    )
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
