//! Admin API authentication via timestamp and signature headers
//!
//! # Scheme
//!
//! - Every `/api/admin/*` request carries `x-academy-timestamp` (Unix epoch ms)
//!   and `x-academy-signature` (SHA-256, 64 hex chars)
//! - Timestamp must be ≤30 000ms past and ≤1 000ms future
//! - Signature covers method, path, timestamp and the canonical JSON body,
//!   followed by the shared secret
//! - Shared secret lives in the `settings` table under `admin_shared_secret`
//! - Secret value 0 disables checking
//!
//! # Pure Functions
//!
//! Apart from the secret loaders this module has no I/O and no HTTP framework
//! dependencies. The portal wraps it in axum middleware and the client uses
//! it to sign outgoing requests.

use serde_json::Value;
use sha2::{Digest, Sha256};

#[cfg(feature = "sqlx")]
use sqlx::SqlitePool;

pub const TIMESTAMP_HEADER: &str = "x-academy-timestamp";
pub const SIGNATURE_HEADER: &str = "x-academy-signature";
pub const SECRET_SETTING_KEY: &str = "admin_shared_secret";

/// Oldest acceptable request age
pub const MAX_PAST_SKEW_MS: i64 = 30_000;
/// Furthest acceptable clock drift into the future
pub const MAX_FUTURE_SKEW_MS: i64 = 1_000;

// ========================================
// Error Types
// ========================================

#[derive(Debug, Clone)]
pub enum ApiAuthError {
    /// Timestamp outside acceptable window
    InvalidTimestamp {
        timestamp: i64,
        now: i64,
        reason: String,
    },

    /// Signature does not match calculated value
    InvalidSignature { provided: String, calculated: String },

    /// Timestamp or signature header missing or unparsable
    MissingHeaders(String),

    /// Database error loading shared secret
    DatabaseError(String),
}

impl std::fmt::Display for ApiAuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiAuthError::InvalidTimestamp { reason, .. } => {
                write!(f, "Invalid timestamp: {}", reason)
            }
            ApiAuthError::InvalidSignature { .. } => write!(f, "Invalid signature"),
            ApiAuthError::MissingHeaders(detail) => write!(f, "Missing auth headers: {}", detail),
            ApiAuthError::DatabaseError(err) => write!(f, "Database error: {}", err),
        }
    }
}

impl std::error::Error for ApiAuthError {}

// ========================================
// Shared Secret Management
// ========================================

/// Load the admin shared secret, generating one on first use
///
/// A `configured` value (from TOML or CLI) always wins and is written back so
/// the dashboard and the server agree.
#[cfg(feature = "sqlx")]
pub async fn load_admin_secret(
    db: &SqlitePool,
    configured: Option<i64>,
) -> Result<i64, ApiAuthError> {
    if let Some(secret) = configured {
        store_secret(db, secret).await?;
        return Ok(secret);
    }

    let result: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(SECRET_SETTING_KEY)
        .fetch_optional(db)
        .await
        .map_err(|e| ApiAuthError::DatabaseError(e.to_string()))?;

    match result {
        Some((value,)) => value
            .parse::<i64>()
            .map_err(|e| ApiAuthError::DatabaseError(format!("Invalid i64: {}", e))),
        None => initialize_admin_secret(db).await,
    }
}

/// Generate and store a crypto-random non-zero secret
#[cfg(feature = "sqlx")]
pub async fn initialize_admin_secret(db: &SqlitePool) -> Result<i64, ApiAuthError> {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    let secret: i64 = loop {
        let val = rng.gen::<i64>();
        if val != 0 {
            break val;
        }
    };

    store_secret(db, secret).await?;
    Ok(secret)
}

#[cfg(feature = "sqlx")]
async fn store_secret(db: &SqlitePool, secret: i64) -> Result<(), ApiAuthError> {
    sqlx::query("INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)")
        .bind(SECRET_SETTING_KEY)
        .bind(secret.to_string())
        .execute(db)
        .await
        .map_err(|e| ApiAuthError::DatabaseError(e.to_string()))?;
    Ok(())
}

// ========================================
// Timestamp Validation
// ========================================

/// Current Unix time in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Check a request timestamp against `now`
///
/// # Examples
///
/// ```
/// use academy_common::api::auth::validate_timestamp;
///
/// let now = 1_760_000_000_000;
/// assert!(validate_timestamp(now - 5_000, now).is_ok());
/// assert!(validate_timestamp(now - 60_000, now).is_err());
/// assert!(validate_timestamp(now + 5_000, now).is_err());
/// ```
pub fn validate_timestamp(timestamp: i64, now: i64) -> Result<(), ApiAuthError> {
    let diff = now - timestamp;

    if diff > MAX_PAST_SKEW_MS {
        return Err(ApiAuthError::InvalidTimestamp {
            timestamp,
            now,
            reason: format!("Timestamp {}ms too old (max {}ms past)", diff, MAX_PAST_SKEW_MS),
        });
    }

    if diff < -MAX_FUTURE_SKEW_MS {
        return Err(ApiAuthError::InvalidTimestamp {
            timestamp,
            now,
            reason: format!(
                "Timestamp {}ms in future (max {}ms future)",
                diff.abs(),
                MAX_FUTURE_SKEW_MS
            ),
        });
    }

    Ok(())
}

// ========================================
// Signature Calculation and Validation
// ========================================

/// Sign an admin request
///
/// The signed string is `METHOD\nPATH\nTIMESTAMP\nCANONICAL_BODY` with the
/// decimal shared secret appended. An absent body signs as `null`.
///
/// # Examples
///
/// ```
/// use academy_common::api::auth::sign_request;
/// use serde_json::json;
///
/// let sig = sign_request("POST", "/api/admin/videos", 1_760_000_000_000, &json!({"title": "Camp"}), 42);
/// assert_eq!(sig.len(), 64);
/// ```
pub fn sign_request(
    method: &str,
    path: &str,
    timestamp: i64,
    body: &Value,
    shared_secret: i64,
) -> String {
    let to_hash = format!(
        "{}\n{}\n{}\n{}{}",
        method.to_ascii_uppercase(),
        path,
        timestamp,
        to_canonical_json(body),
        shared_secret
    );

    let mut hasher = Sha256::new();
    hasher.update(to_hash.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Convert JSON to canonical form (sorted keys, no whitespace)
///
/// # Examples
///
/// ```
/// use academy_common::api::auth::to_canonical_json;
/// use serde_json::json;
///
/// let canonical = to_canonical_json(&json!({"z": 3, "a": 1}));
/// assert_eq!(canonical, r#"{"a":1,"z":3}"#);
/// ```
pub fn to_canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut pairs: Vec<_> = map.iter().collect();
            pairs.sort_by_key(|(k, _)| *k);
            let items: Vec<String> = pairs
                .into_iter()
                .map(|(k, v)| format!("{}:{}", Value::String(k.clone()), to_canonical_json(v)))
                .collect();
            format!("{{{}}}", items.join(","))
        }
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(to_canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        // serde_json's own string escaping is already canonical
        Value::String(_) => value.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
    }
}

/// Compare a provided signature with the expected one
pub fn validate_signature(
    provided: &str,
    method: &str,
    path: &str,
    timestamp: i64,
    body: &Value,
    shared_secret: i64,
) -> Result<(), ApiAuthError> {
    let calculated = sign_request(method, path, timestamp, body, shared_secret);

    if !constant_time_eq(provided.as_bytes(), calculated.as_bytes()) {
        return Err(ApiAuthError::InvalidSignature {
            provided: provided.to_string(),
            calculated,
        });
    }

    Ok(())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

// ========================================
// Tests
// ========================================
