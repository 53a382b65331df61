//! Checkout session bookkeeping
//!
//! Only the redirect is recorded; payment state stays with the provider.

use academy_common::Result;
use sqlx::SqlitePool;

use super::now_db;

pub struct NewCheckoutSession<'a> {
    pub guid: &'a str,
    pub provider_session_id: &'a str,
    pub program_slugs: &'a [String],
    pub customer_email: Option<&'a str>,
    pub amount_cents: i64,
    pub url: &'a str,
}

pub async fn insert_session(pool: &SqlitePool, session: &NewCheckoutSession<'_>) -> Result<()> {
    let slugs = serde_json::to_string(session.program_slugs)
        .map_err(|e| academy_common::Error::Internal(format!("Failed to serialize slugs: {}", e)))?;

    sqlx::query(
        r#"
        INSERT INTO checkout_sessions
            (guid, provider_session_id, program_slugs, customer_email, amount_cents, url, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(session.guid)
    .bind(session.provider_session_id)
    .bind(slugs)
    .bind(session.customer_email)
    .bind(session.amount_cents)
    .bind(session.url)
    .bind(now_db())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn count_sessions(pool: &SqlitePool) -> Result<i64> {
    Ok(sqlx::query_scalar("SELECT COUNT(*) FROM checkout_sessions")
        .fetch_one(pool)
        .await?)
}
