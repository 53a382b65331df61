//! Chat rooms and messages
//!
//! Clients poll `GET .../messages` every few seconds and post with
//! `POST .../messages`. There is no push channel.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::{debug, info};

use academy_common::api::types::{ChatMessage, ChatRoom, ChatRoomInput, SendMessageRequest};

use super::extract::{ApiJson, ApiQuery};
use crate::db::chat as store;
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct MessagesQuery {
    /// Number of most recent messages; clamped to the configured maximum
    #[serde(default)]
    pub limit: Option<i64>,
}

async fn room_or_404(state: &AppState, slug: &str) -> ApiResult<ChatRoom> {
    store::find_room(&state.db, slug)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("chat room {}", slug)))
}

/// GET /api/chat/rooms
pub async fn list_rooms(State(state): State<AppState>) -> ApiResult<Json<Vec<ChatRoom>>> {
    Ok(Json(store::list_rooms(&state.db).await?))
}

/// GET /api/chat/rooms/:room/messages?limit=N (oldest first)
pub async fn list_messages(
    State(state): State<AppState>,
    Path(room): Path<String>,
    ApiQuery(query): ApiQuery<MessagesQuery>,
) -> ApiResult<Json<Vec<ChatMessage>>> {
    let room = room_or_404(&state, &room).await?;
    let limit = state.chat_limits.clamp(query.limit);
    let messages = store::recent_messages(&state.db, &room.id, limit).await?;
    debug!(room = %room.slug, count = messages.len(), "Chat history read");
    Ok(Json(messages))
}

/// POST /api/chat/rooms/:room/messages
pub async fn send_message(
    State(state): State<AppState>,
    Path(room): Path<String>,
    ApiJson(request): ApiJson<SendMessageRequest>,
) -> ApiResult<(StatusCode, Json<ChatMessage>)> {
    request.validate()?;
    let room = room_or_404(&state, &room).await?;
    let message = store::insert_message(&state.db, &room.id, &request.author, &request.body).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// POST /api/admin/chat/rooms
pub async fn create_room(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ChatRoomInput>,
) -> ApiResult<(StatusCode, Json<ChatRoom>)> {
    input.validate()?;
    let room = store::create_room(&state.db, &input).await?;
    info!(room = %room.slug, "Chat room created");
    Ok((StatusCode::CREATED, Json(room)))
}

/// DELETE /api/admin/chat/messages/:id
pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if store::delete_message(&state.db, &id).await? {
        info!(message_id = %id, "Chat message removed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("chat message {}", id)))
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/chat/rooms", get(list_rooms))
        .route(
            "/api/chat/rooms/:room/messages",
            get(list_messages).post(send_message),
        )
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/chat/rooms", post(create_room))
        .route("/api/admin/chat/messages/:id", delete(delete_message))
}
