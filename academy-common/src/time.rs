//! Timestamp utilities

use chrono::{DateTime, Utc};

use crate::{Error, Result};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Render a timestamp the way it is stored in the database
pub fn to_db(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

/// Parse a stored RFC 3339 timestamp
pub fn from_db(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Failed to parse timestamp '{}': {}", value, e)))
}
