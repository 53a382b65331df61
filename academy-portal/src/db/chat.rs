//! Chat room and message queries

use academy_common::api::types::{ChatMessage, ChatRoom, ChatRoomInput};
use academy_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{new_guid, now_db, timestamp};

fn room_from_row(row: &SqliteRow) -> Result<ChatRoom> {
    Ok(ChatRoom {
        id: row.try_get("guid")?,
        slug: row.try_get("slug")?,
        name: row.try_get("name")?,
        created_at: timestamp(row, "created_at")?,
    })
}

fn message_from_row(row: &SqliteRow) -> Result<ChatMessage> {
    Ok(ChatMessage {
        id: row.try_get("guid")?,
        seq: row.try_get("seq")?,
        room_id: row.try_get("room_id")?,
        author: row.try_get("author")?,
        body: row.try_get("body")?,
        created_at: timestamp(row, "created_at")?,
    })
}

pub async fn list_rooms(pool: &SqlitePool) -> Result<Vec<ChatRoom>> {
    let rows = sqlx::query("SELECT guid, slug, name, created_at FROM chat_rooms ORDER BY name")
        .fetch_all(pool)
        .await?;
    rows.iter().map(room_from_row).collect()
}

pub async fn find_room(pool: &SqlitePool, slug: &str) -> Result<Option<ChatRoom>> {
    let row = sqlx::query("SELECT guid, slug, name, created_at FROM chat_rooms WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(room_from_row).transpose()
}

pub async fn create_room(pool: &SqlitePool, input: &ChatRoomInput) -> Result<ChatRoom> {
    sqlx::query("INSERT INTO chat_rooms (guid, slug, name, created_at) VALUES (?, ?, ?, ?)")
        .bind(new_guid())
        .bind(&input.slug)
        .bind(input.name.trim())
        .bind(now_db())
        .execute(pool)
        .await?;

    find_room(pool, &input.slug)
        .await?
        .ok_or_else(|| academy_common::Error::Internal(format!("room {} vanished", input.slug)))
}

/// The last `limit` messages of a room, oldest first
pub async fn recent_messages(
    pool: &SqlitePool,
    room_id: &str,
    limit: i64,
) -> Result<Vec<ChatMessage>> {
    let rows = sqlx::query(
        r#"
        SELECT seq, guid, room_id, author, body, created_at
        FROM chat_messages
        WHERE room_id = ?
        ORDER BY seq DESC
        LIMIT ?
        "#,
    )
    .bind(room_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let mut messages = rows
        .iter()
        .map(message_from_row)
        .collect::<Result<Vec<_>>>()?;
    messages.reverse();
    Ok(messages)
}

pub async fn insert_message(
    pool: &SqlitePool,
    room_id: &str,
    author: &str,
    body: &str,
) -> Result<ChatMessage> {
    let guid = new_guid();

    let row = sqlx::query(
        r#"
        INSERT INTO chat_messages (guid, room_id, author, body, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING seq, guid, room_id, author, body, created_at
        "#,
    )
    .bind(&guid)
    .bind(room_id)
    .bind(author.trim())
    .bind(body.trim())
    .bind(now_db())
    .fetch_one(pool)
    .await?;

    message_from_row(&row)
}

pub async fn delete_message(pool: &SqlitePool, message_id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM chat_messages WHERE guid = ?")
        .bind(message_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
