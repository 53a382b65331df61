//! # Academy Common Library
//!
//! Shared code for the Academy portal server and client including:
//! - Program recommendation rules (quiz)
//! - Form validation shared by every intake form
//! - Client-side program search
//! - API request/response types and admin request signing
//! - Database schema and models
//! - Configuration loading

pub mod api;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod recommendation;
pub mod search;
pub mod time;
pub mod validation;

pub use error::{Error, Result};
pub use recommendation::{recommend, AgeBracket, Goal, ProgramSlug, Recommendation, Sport};
pub use validation::FieldError;
