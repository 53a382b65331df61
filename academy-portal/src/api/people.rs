//! Testimonials and coach profiles

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::info;

use academy_common::api::types::{Coach, CoachInput, Testimonial, TestimonialInput};

use super::extract::ApiJson;
use crate::db::people as store;
use crate::{ApiError, ApiResult, AppState};

/// GET /api/testimonials (newest first)
pub async fn list_testimonials(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Testimonial>>> {
    Ok(Json(store::list_testimonials(&state.db).await?))
}

pub async fn create_testimonial(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<TestimonialInput>,
) -> ApiResult<(StatusCode, Json<Testimonial>)> {
    input.validate()?;
    let testimonial = store::create_testimonial(&state.db, &input).await?;
    info!(id = %testimonial.id, "Testimonial added");
    Ok((StatusCode::CREATED, Json(testimonial)))
}

pub async fn delete_testimonial(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if store::delete_testimonial(&state.db, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("testimonial {}", id)))
    }
}

/// GET /api/coaches
pub async fn list_coaches(State(state): State<AppState>) -> ApiResult<Json<Vec<Coach>>> {
    Ok(Json(store::list_coaches(&state.db).await?))
}

pub async fn create_coach(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CoachInput>,
) -> ApiResult<(StatusCode, Json<Coach>)> {
    input.validate()?;
    let coach = store::create_coach(&state.db, &input).await?;
    info!(id = %coach.id, "Coach added");
    Ok((StatusCode::CREATED, Json(coach)))
}

pub async fn delete_coach(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if store::delete_coach(&state.db, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("coach {}", id)))
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/testimonials", get(list_testimonials))
        .route("/api/coaches", get(list_coaches))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/testimonials", post(create_testimonial))
        .route("/api/admin/testimonials/:id", delete(delete_testimonial))
        .route("/api/admin/coaches", post(create_coach))
        .route("/api/admin/coaches/:id", delete(delete_coach))
}
