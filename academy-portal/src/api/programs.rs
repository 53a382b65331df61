//! Program catalog endpoints
//!
//! Public: list (with optional `q` search) and detail.
//! Admin: full CRUD keyed by slug.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use academy_common::api::types::{Program, ProgramInput};
use academy_common::search::filter_programs;

use super::extract::{ApiJson, ApiQuery};
use crate::db::programs as store;
use crate::{ApiError, ApiResult, AppState};

/// Query parameters for the public program list
#[derive(Debug, Default, Deserialize)]
pub struct ProgramListQuery {
    /// Case-insensitive search text
    #[serde(default)]
    pub q: Option<String>,
}

/// GET /api/programs
pub async fn list_programs(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProgramListQuery>,
) -> ApiResult<Json<Vec<Program>>> {
    let programs = store::list_programs(&state.db, false).await?;
    let programs = match query.q.as_deref() {
        Some(q) => filter_programs(&programs, q).into_iter().cloned().collect(),
        None => programs,
    };
    Ok(Json(programs))
}

/// GET /api/programs/:slug
///
/// Inactive programs are hidden from the public detail view.
pub async fn get_program(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Program>> {
    store::get_program(&state.db, &slug)
        .await?
        .filter(|p| p.active)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("program {}", slug)))
}

/// GET /api/admin/programs (includes inactive)
pub async fn admin_list_programs(State(state): State<AppState>) -> ApiResult<Json<Vec<Program>>> {
    Ok(Json(store::list_programs(&state.db, true).await?))
}

/// POST /api/admin/programs
pub async fn admin_create_program(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ProgramInput>,
) -> ApiResult<(StatusCode, Json<Program>)> {
    input.validate()?;
    let program = store::create_program(&state.db, &input).await?;
    info!(slug = %program.slug, "Program created");
    Ok((StatusCode::CREATED, Json(program)))
}

/// PUT /api/admin/programs/:slug
pub async fn admin_update_program(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    ApiJson(input): ApiJson<ProgramInput>,
) -> ApiResult<Json<Program>> {
    input.validate()?;
    store::update_program(&state.db, &slug, &input)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("program {}", slug)))
}

/// DELETE /api/admin/programs/:slug
pub async fn admin_delete_program(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<StatusCode> {
    if store::delete_program(&state.db, &slug).await? {
        info!(slug = %slug, "Program deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("program {}", slug)))
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/programs", get(list_programs))
        .route("/api/programs/:slug", get(get_program))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/admin/programs",
            get(admin_list_programs).post(admin_create_program),
        )
        .route(
            "/api/admin/programs/:slug",
            axum::routing::put(admin_update_program).delete(admin_delete_program),
        )
}
