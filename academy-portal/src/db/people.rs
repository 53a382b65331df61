//! Testimonial and coach queries

use academy_common::api::types::{Coach, CoachInput, Testimonial, TestimonialInput};
use academy_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{new_guid, now_db, timestamp};

fn testimonial_from_row(row: &SqliteRow) -> Result<Testimonial> {
    Ok(Testimonial {
        id: row.try_get("guid")?,
        author: row.try_get("author")?,
        quote: row.try_get("quote")?,
        rating: row.try_get("rating")?,
        created_at: timestamp(row, "created_at")?,
    })
}

fn coach_from_row(row: &SqliteRow) -> Result<Coach> {
    Ok(Coach {
        id: row.try_get("guid")?,
        name: row.try_get("name")?,
        title: row.try_get("title")?,
        bio: row.try_get("bio")?,
        photo_url: row.try_get("photo_url")?,
        created_at: timestamp(row, "created_at")?,
    })
}

/// Newest first
pub async fn list_testimonials(pool: &SqlitePool) -> Result<Vec<Testimonial>> {
    let rows = sqlx::query(
        "SELECT guid, author, quote, rating, created_at FROM testimonials \
         ORDER BY created_at DESC, rowid DESC",
    )
    .fetch_all(pool)
    .await?;
    rows.iter().map(testimonial_from_row).collect()
}

pub async fn create_testimonial(
    pool: &SqlitePool,
    input: &TestimonialInput,
) -> Result<Testimonial> {
    let row = sqlx::query(
        r#"
        INSERT INTO testimonials (guid, author, quote, rating, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING guid, author, quote, rating, created_at
        "#,
    )
    .bind(new_guid())
    .bind(input.author.trim())
    .bind(input.quote.trim())
    .bind(input.rating)
    .bind(now_db())
    .fetch_one(pool)
    .await?;
    testimonial_from_row(&row)
}

pub async fn delete_testimonial(pool: &SqlitePool, id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM testimonials WHERE guid = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Alphabetical by name
pub async fn list_coaches(pool: &SqlitePool) -> Result<Vec<Coach>> {
    let rows = sqlx::query(
        "SELECT guid, name, title, bio, photo_url, created_at FROM coaches ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    rows.iter().map(coach_from_row).collect()
}

pub async fn create_coach(pool: &SqlitePool, input: &CoachInput) -> Result<Coach> {
    let row = sqlx::query(
        r#"
        INSERT INTO coaches (guid, name, title, bio, photo_url, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING guid, name, title, bio, photo_url, created_at
        "#,
    )
    .bind(new_guid())
    .bind(input.name.trim())
    .bind(input.title.trim())
    .bind(&input.bio)
    .bind(&input.photo_url)
    .bind(now_db())
    .fetch_one(pool)
    .await?;
    coach_from_row(&row)
}

pub async fn delete_coach(pool: &SqlitePool, id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM coaches WHERE guid = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
