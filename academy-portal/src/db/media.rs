//! Gallery and video queries

use academy_common::api::types::{GalleryInput, GalleryItem, Video, VideoInput};
use academy_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{new_guid, now_db, timestamp};

// ========================================
// Gallery
// ========================================

fn gallery_from_row(row: &SqliteRow) -> Result<GalleryItem> {
    Ok(GalleryItem {
        id: row.try_get("guid")?,
        title: row.try_get("title")?,
        image_url: row.try_get("image_url")?,
        caption: row.try_get("caption")?,
        sort_order: row.try_get("sort_order")?,
        created_at: timestamp(row, "created_at")?,
        updated_at: timestamp(row, "updated_at")?,
    })
}

pub async fn list_gallery(pool: &SqlitePool) -> Result<Vec<GalleryItem>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, title, image_url, caption, sort_order, created_at, updated_at
        FROM gallery_items
        ORDER BY sort_order, created_at
        "#,
    )
    .fetch_all(pool)
    .await?;
    rows.iter().map(gallery_from_row).collect()
}

pub async fn get_gallery_item(pool: &SqlitePool, id: &str) -> Result<Option<GalleryItem>> {
    let row = sqlx::query(
        r#"
        SELECT guid, title, image_url, caption, sort_order, created_at, updated_at
        FROM gallery_items
        WHERE guid = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.as_ref().map(gallery_from_row).transpose()
}

pub async fn create_gallery_item(pool: &SqlitePool, input: &GalleryInput) -> Result<GalleryItem> {
    let guid = new_guid();
    let now = now_db();

    sqlx::query(
        r#"
        INSERT INTO gallery_items (guid, title, image_url, caption, sort_order, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&guid)
    .bind(input.title.trim())
    .bind(input.image_url.trim())
    .bind(&input.caption)
    .bind(input.sort_order)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    get_gallery_item(pool, &guid)
        .await?
        .ok_or_else(|| academy_common::Error::Internal(format!("gallery item {} vanished", guid)))
}

pub async fn update_gallery_item(
    pool: &SqlitePool,
    id: &str,
    input: &GalleryInput,
) -> Result<Option<GalleryItem>> {
    let result = sqlx::query(
        r#"
        UPDATE gallery_items
        SET title = ?, image_url = ?, caption = ?, sort_order = ?, updated_at = ?
        WHERE guid = ?
        "#,
    )
    .bind(input.title.trim())
    .bind(input.image_url.trim())
    .bind(&input.caption)
    .bind(input.sort_order)
    .bind(now_db())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_gallery_item(pool, id).await
}

pub async fn delete_gallery_item(pool: &SqlitePool, id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM gallery_items WHERE guid = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ========================================
// Videos
// ========================================

fn video_from_row(row: &SqliteRow) -> Result<Video> {
    Ok(Video {
        id: row.try_get("guid")?,
        title: row.try_get("title")?,
        video_url: row.try_get("video_url")?,
        description: row.try_get("description")?,
        sort_order: row.try_get("sort_order")?,
        created_at: timestamp(row, "created_at")?,
        updated_at: timestamp(row, "updated_at")?,
    })
}

pub async fn list_videos(pool: &SqlitePool) -> Result<Vec<Video>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, title, video_url, description, sort_order, created_at, updated_at
        FROM videos
        ORDER BY sort_order, created_at
        "#,
    )
    .fetch_all(pool)
    .await?;
    rows.iter().map(video_from_row).collect()
}

pub async fn get_video(pool: &SqlitePool, id: &str) -> Result<Option<Video>> {
    let row = sqlx::query(
        r#"
        SELECT guid, title, video_url, description, sort_order, created_at, updated_at
        FROM videos
        WHERE guid = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.as_ref().map(video_from_row).transpose()
}

pub async fn create_video(pool: &SqlitePool, input: &VideoInput) -> Result<Video> {
    let guid = new_guid();
    let now = now_db();

    sqlx::query(
        r#"
        INSERT INTO videos (guid, title, video_url, description, sort_order, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&guid)
    .bind(input.title.trim())
    .bind(input.video_url.trim())
    .bind(&input.description)
    .bind(input.sort_order)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    get_video(pool, &guid)
        .await?
        .ok_or_else(|| academy_common::Error::Internal(format!("video {} vanished", guid)))
}

pub async fn update_video(pool: &SqlitePool, id: &str, input: &VideoInput) -> Result<Option<Video>> {
    let result = sqlx::query(
        r#"
        UPDATE videos
        SET title = ?, video_url = ?, description = ?, sort_order = ?, updated_at = ?
        WHERE guid = ?
        "#,
    )
    .bind(input.title.trim())
    .bind(input.video_url.trim())
    .bind(&input.description)
    .bind(input.sort_order)
    .bind(now_db())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_video(pool, id).await
}

pub async fn delete_video(pool: &SqlitePool, id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM videos WHERE guid = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
