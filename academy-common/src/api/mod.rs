//! API module for shared HTTP API functionality
//!
//! Provides admin request signing and the request/response types used by both
//! academy-portal (server) and academy-client.
//!
//! # Design Principle
//!
//! This module contains ONLY:
//! - Pure functions (no HTTP framework dependencies)
//! - Database operations (via sqlx, behind the `sqlx` feature)
//! - Shared types
//!
//! The portal wraps these with axum middleware; the client with reqwest.

pub mod auth;
pub mod types;

pub use auth::{sign_request, to_canonical_json, validate_signature, validate_timestamp, ApiAuthError};
pub use types::*;
