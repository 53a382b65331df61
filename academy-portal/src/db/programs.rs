//! Program catalog queries

use academy_common::api::types::{Program, ProgramInput};
use academy_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{new_guid, now_db, timestamp};

const COLUMNS: &str = "guid, slug, name, description, price_cents, schedule, age_range, sport, \
                       active, created_at, updated_at";

fn from_row(row: &SqliteRow) -> Result<Program> {
    Ok(Program {
        id: row.try_get("guid")?,
        slug: row.try_get("slug")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price_cents: row.try_get("price_cents")?,
        schedule: row.try_get("schedule")?,
        age_range: row.try_get("age_range")?,
        sport: row.try_get("sport")?,
        active: row.try_get::<i64, _>("active")? != 0,
        created_at: timestamp(row, "created_at")?,
        updated_at: timestamp(row, "updated_at")?,
    })
}

/// Programs ordered by price, cheapest first
pub async fn list_programs(pool: &SqlitePool, include_inactive: bool) -> Result<Vec<Program>> {
    let sql = if include_inactive {
        format!("SELECT {} FROM programs ORDER BY price_cents, name", COLUMNS)
    } else {
        format!(
            "SELECT {} FROM programs WHERE active = 1 ORDER BY price_cents, name",
            COLUMNS
        )
    };
    let rows = sqlx::query(&sql).fetch_all(pool).await?;
    rows.iter().map(from_row).collect()
}

pub async fn get_program(pool: &SqlitePool, slug: &str) -> Result<Option<Program>> {
    let sql = format!("SELECT {} FROM programs WHERE slug = ?", COLUMNS);
    let row = sqlx::query(&sql).bind(slug).fetch_optional(pool).await?;
    row.as_ref().map(from_row).transpose()
}

pub async fn create_program(pool: &SqlitePool, input: &ProgramInput) -> Result<Program> {
    let guid = new_guid();
    let now = now_db();

    sqlx::query(
        r#"
        INSERT INTO programs
            (guid, slug, name, description, price_cents, schedule, age_range, sport,
             active, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&guid)
    .bind(&input.slug)
    .bind(input.name.trim())
    .bind(input.description.trim())
    .bind(input.price_cents)
    .bind(&input.schedule)
    .bind(&input.age_range)
    .bind(&input.sport)
    .bind(input.active as i64)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    get_program(pool, &input.slug)
        .await?
        .ok_or_else(|| academy_common::Error::Internal(format!("program {} vanished", guid)))
}

/// Replace every editable field; returns `None` when the slug is unknown
pub async fn update_program(
    pool: &SqlitePool,
    slug: &str,
    input: &ProgramInput,
) -> Result<Option<Program>> {
    let result = sqlx::query(
        r#"
        UPDATE programs
        SET slug = ?, name = ?, description = ?, price_cents = ?, schedule = ?,
            age_range = ?, sport = ?, active = ?, updated_at = ?
        WHERE slug = ?
        "#,
    )
    .bind(&input.slug)
    .bind(input.name.trim())
    .bind(input.description.trim())
    .bind(input.price_cents)
    .bind(&input.schedule)
    .bind(&input.age_range)
    .bind(&input.sport)
    .bind(input.active as i64)
    .bind(now_db())
    .bind(slug)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_program(pool, &input.slug).await
}

pub async fn delete_program(pool: &SqlitePool, slug: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM programs WHERE slug = ?")
        .bind(slug)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Active programs for the given slugs, in the order requested
///
/// Unknown or inactive slugs are left out; callers compare lengths.
pub async fn find_active_by_slugs(pool: &SqlitePool, slugs: &[String]) -> Result<Vec<Program>> {
    let mut found = Vec::with_capacity(slugs.len());
    for slug in slugs {
        if let Some(program) = get_program(pool, slug).await? {
            if program.active {
                found.push(program);
            }
        }
    }
    Ok(found)
}
