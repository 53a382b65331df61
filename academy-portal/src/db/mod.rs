//! Database access for academy-portal
//!
//! Schema creation and seeding live in `academy_common::db`; this module holds
//! the per-table queries the HTTP handlers use.

pub mod chat;
pub mod checkout;
pub mod leads;
pub mod media;
pub mod people;
pub mod programs;

use academy_common::Result;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

pub use academy_common::db::init::init_database;

/// Read an RFC 3339 timestamp column
pub(crate) fn timestamp(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>> {
    let value: String = row.try_get(column)?;
    academy_common::time::from_db(&value)
}

pub(crate) fn new_guid() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn now_db() -> String {
    academy_common::time::to_db(&academy_common::time::now())
}
