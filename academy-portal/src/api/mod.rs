//! HTTP API handlers for academy-portal

pub mod admin_auth;
pub mod chat;
pub mod checkout;
pub mod extract;
pub mod health;
pub mod leads;
pub mod media;
pub mod people;
pub mod programs;
pub mod quiz;

pub use admin_auth::admin_auth_middleware;
pub use extract::{ApiJson, ApiQuery};
pub use health::health_routes;
