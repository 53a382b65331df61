//! Lead capture queries

use academy_common::api::types::{Lead, LeadRequest};
use academy_common::recommendation::ProgramSlug;
use academy_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{new_guid, now_db, timestamp};

fn from_row(row: &SqliteRow) -> Result<Lead> {
    Ok(Lead {
        id: row.try_get("guid")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        message: row.try_get("message")?,
        athlete_age: row.try_get("athlete_age")?,
        sport: row.try_get("sport")?,
        goal: row.try_get("goal")?,
        recommended_slug: row.try_get("recommended_slug")?,
        source: row.try_get("source")?,
        created_at: timestamp(row, "created_at")?,
    })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Store a validated lead and return its id
pub async fn insert_lead(
    pool: &SqlitePool,
    lead: &LeadRequest,
    recommended: Option<ProgramSlug>,
) -> Result<String> {
    let guid = new_guid();

    sqlx::query(
        r#"
        INSERT INTO leads
            (guid, name, email, phone, message, athlete_age, sport, goal,
             recommended_slug, source, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&guid)
    .bind(lead.name.trim())
    .bind(lead.email.trim().to_lowercase())
    .bind(non_blank(lead.phone.as_deref()))
    .bind(non_blank(lead.message.as_deref()))
    .bind(lead.quiz.map(|q| q.age.as_str()))
    .bind(lead.quiz.map(|q| q.sport.as_str()))
    .bind(lead.quiz.map(|q| q.goal.as_str()))
    .bind(recommended.map(|s| s.as_str()))
    .bind(non_blank(lead.source.as_deref()))
    .bind(now_db())
    .execute(pool)
    .await?;

    Ok(guid)
}

pub async fn count_leads(pool: &SqlitePool) -> Result<i64> {
    Ok(sqlx::query_scalar("SELECT COUNT(*) FROM leads")
        .fetch_one(pool)
        .await?)
}

/// Newest first
pub async fn list_leads(pool: &SqlitePool, limit: i64, offset: i64) -> Result<Vec<Lead>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, name, email, phone, message, athlete_age, sport, goal,
               recommended_slug, source, created_at
        FROM leads
        ORDER BY created_at DESC, rowid DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    rows.iter().map(from_row).collect()
}
