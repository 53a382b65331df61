//! Database initialization
//!
//! Creates the database on first run, brings every table up to the current
//! schema (`CREATE TABLE IF NOT EXISTS`) and seeds the entry programs and the
//! default chat room. Safe to call on every startup.

use crate::recommendation::ProgramSlug;
use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

pub const DEFAULT_CHAT_ROOM: &str = "general";
pub const SETTING_CHAT_HISTORY_LIMIT: &str = "chat_history_limit";
pub const SETTING_CHAT_MAX_LIMIT: &str = "chat_max_limit";

/// Open (creating if needed) the portal database
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_schema(&pool).await?;
    seed_defaults(&pool).await?;
    init_default_settings(&pool).await?;

    Ok(pool)
}

/// Create every table and index (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_settings_table(pool).await?;
    create_programs_table(pool).await?;
    create_leads_table(pool).await?;
    create_chat_tables(pool).await?;
    create_gallery_table(pool).await?;
    create_videos_table(pool).await?;
    create_testimonials_table(pool).await?;
    create_coaches_table(pool).await?;
    create_checkout_sessions_table(pool).await?;
    Ok(())
}

async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_programs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS programs (
            guid TEXT PRIMARY KEY,
            slug TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            price_cents INTEGER NOT NULL CHECK (price_cents >= 0),
            schedule TEXT,
            age_range TEXT,
            sport TEXT,
            active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_leads_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS leads (
            guid TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT,
            message TEXT,
            athlete_age TEXT,
            sport TEXT,
            goal TEXT,
            recommended_slug TEXT,
            source TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_leads_created_at ON leads(created_at)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_chat_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS chat_rooms (
            guid TEXT PRIMARY KEY,
            slug TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // seq gives a total order even when two messages share a created_at
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS chat_messages (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            guid TEXT NOT NULL UNIQUE,
            room_id TEXT NOT NULL REFERENCES chat_rooms(guid) ON DELETE CASCADE,
            author TEXT NOT NULL,
            body TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_chat_messages_room_seq ON chat_messages(room_id, seq)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_gallery_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS gallery_items (
            guid TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            image_url TEXT NOT NULL,
            caption TEXT,
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_videos_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS videos (
            guid TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            video_url TEXT NOT NULL,
            description TEXT,
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_testimonials_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS testimonials (
            guid TEXT PRIMARY KEY,
            author TEXT NOT NULL,
            quote TEXT NOT NULL,
            rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_coaches_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS coaches (
            guid TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            title TEXT NOT NULL,
            bio TEXT,
            photo_url TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_checkout_sessions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS checkout_sessions (
            guid TEXT PRIMARY KEY,
            provider_session_id TEXT NOT NULL,
            program_slugs TEXT NOT NULL,
            customer_email TEXT,
            amount_cents INTEGER NOT NULL,
            url TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Seed the quiz programs and default chat room
///
/// `INSERT OR IGNORE` keyed on slug, so admin edits to these rows survive
/// restarts.
pub async fn seed_defaults(pool: &SqlitePool) -> Result<()> {
    let now = crate::time::to_db(&crate::time::now());

    for slug in ProgramSlug::ALL {
        let rec = slug.recommendation();
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO programs
                (guid, slug, name, description, price_cents, active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, 1, ?, ?)
            "#,
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(rec.slug.as_str())
        .bind(rec.program)
        .bind(rec.description)
        .bind(rec.price_cents)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;
    }

    sqlx::query(
        "INSERT OR IGNORE INTO chat_rooms (guid, slug, name, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(DEFAULT_CHAT_ROOM)
    .bind("General")
    .bind(&now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Ensure every runtime setting has a value
async fn init_default_settings(pool: &SqlitePool) -> Result<()> {
    ensure_setting(pool, SETTING_CHAT_HISTORY_LIMIT, "50").await?;
    ensure_setting(pool, SETTING_CHAT_MAX_LIMIT, "200").await?;
    Ok(())
}

/// Read a runtime setting
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let value: Option<Option<String>> =
        sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(pool)
            .await?;
    Ok(value.flatten())
}

/// Insert the setting only if it is missing or NULL
pub async fn ensure_setting(pool: &SqlitePool, key: &str, default: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value) VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value WHERE settings.value IS NULL
        "#,
    )
    .bind(key)
    .bind(default)
    .execute(pool)
    .await?;
    Ok(())
}
