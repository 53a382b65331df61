//! Gallery and video library endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::info;

use academy_common::api::types::{GalleryInput, GalleryItem, Video, VideoInput};

use super::extract::ApiJson;
use crate::db::media as store;
use crate::{ApiError, ApiResult, AppState};

// ========================================
// Gallery
// ========================================

/// GET /api/gallery (by sort_order)
pub async fn list_gallery(State(state): State<AppState>) -> ApiResult<Json<Vec<GalleryItem>>> {
    Ok(Json(store::list_gallery(&state.db).await?))
}

/// GET /api/gallery/:id
pub async fn get_gallery_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<GalleryItem>> {
    store::get_gallery_item(&state.db, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("gallery item {}", id)))
}

pub async fn create_gallery_item(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<GalleryInput>,
) -> ApiResult<(StatusCode, Json<GalleryItem>)> {
    input.validate()?;
    let item = store::create_gallery_item(&state.db, &input).await?;
    info!(id = %item.id, "Gallery item added");
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_gallery_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<GalleryInput>,
) -> ApiResult<Json<GalleryItem>> {
    input.validate()?;
    store::update_gallery_item(&state.db, &id, &input)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("gallery item {}", id)))
}

pub async fn delete_gallery_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if store::delete_gallery_item(&state.db, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("gallery item {}", id)))
    }
}

// ========================================
// Videos
// ========================================

/// GET /api/videos (by sort_order)
pub async fn list_videos(State(state): State<AppState>) -> ApiResult<Json<Vec<Video>>> {
    Ok(Json(store::list_videos(&state.db).await?))
}

pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Video>> {
    store::get_video(&state.db, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("video {}", id)))
}

pub async fn create_video(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<VideoInput>,
) -> ApiResult<(StatusCode, Json<Video>)> {
    input.validate()?;
    let video = store::create_video(&state.db, &input).await?;
    info!(id = %video.id, "Video added");
    Ok((StatusCode::CREATED, Json(video)))
}

pub async fn update_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<VideoInput>,
) -> ApiResult<Json<Video>> {
    input.validate()?;
    store::update_video(&state.db, &id, &input)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("video {}", id)))
}

pub async fn delete_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if store::delete_video(&state.db, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("video {}", id)))
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/gallery", get(list_gallery))
        .route("/api/gallery/:id", get(get_gallery_item))
        .route("/api/videos", get(list_videos))
        .route("/api/videos/:id", get(get_video))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/gallery", post(create_gallery_item))
        .route(
            "/api/admin/gallery/:id",
            put(update_gallery_item).delete(delete_gallery_item),
        )
        .route("/api/admin/videos", post(create_video))
        .route("/api/admin/videos/:id", put(update_video).delete(delete_video))
}
