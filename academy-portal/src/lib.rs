//! academy-portal library
//!
//! HTTP JSON back end for The Academy site: programs, quiz, leads, checkout,
//! polling chat, gallery/videos, testimonials and coaches, plus the admin
//! routes behind signed requests.

use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub mod api;
pub mod db;
pub mod error;
pub mod pagination;
pub mod payments;

pub use crate::error::{ApiError, ApiResult};

use academy_common::db::init::{get_setting, SETTING_CHAT_HISTORY_LIMIT, SETTING_CHAT_MAX_LIMIT};
use payments::PaymentProvider;

/// Message-count limits for chat history reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatLimits {
    /// Messages returned when the request names no limit
    pub default_limit: i64,
    /// Hard cap on any single read
    pub max_limit: i64,
}

impl Default for ChatLimits {
    fn default() -> Self {
        Self {
            default_limit: 50,
            max_limit: 200,
        }
    }
}

impl ChatLimits {
    /// Read limits from the settings table, keeping defaults for bad values
    pub async fn load(db: &SqlitePool) -> academy_common::Result<Self> {
        let defaults = Self::default();
        let max_limit = parse_limit(
            get_setting(db, SETTING_CHAT_MAX_LIMIT).await?,
            SETTING_CHAT_MAX_LIMIT,
        )
        .unwrap_or(defaults.max_limit);
        let default_limit = parse_limit(
            get_setting(db, SETTING_CHAT_HISTORY_LIMIT).await?,
            SETTING_CHAT_HISTORY_LIMIT,
        )
        .unwrap_or(defaults.default_limit)
        .min(max_limit);

        Ok(Self {
            default_limit,
            max_limit,
        })
    }

    /// Clamp a requested limit into `[1, max_limit]`
    pub fn clamp(&self, requested: Option<i64>) -> i64 {
        requested
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit)
    }
}

fn parse_limit(value: Option<String>, key: &str) -> Option<i64> {
    let value = value?;
    match value.trim().parse::<i64>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
            warn!("Ignoring invalid setting {} = {:?}", key, value);
            None
        }
    }
}

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Admin request signing secret (0 disables admin auth)
    pub admin_secret: i64,
    /// Hosted checkout provider
    pub payments: Arc<dyn PaymentProvider>,
    pub chat_limits: ChatLimits,
}

impl AppState {
    pub fn new(db: SqlitePool, admin_secret: i64, payments: Arc<dyn PaymentProvider>) -> Self {
        Self {
            db,
            admin_secret,
            payments,
            chat_limits: ChatLimits::default(),
        }
    }

    pub fn with_chat_limits(mut self, chat_limits: ChatLimits) -> Self {
        self.chat_limits = chat_limits;
        self
    }
}

/// Build application router
///
/// Public routes serve the marketing site and member portal; everything under
/// `/api/admin` passes through signature checking first.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;

    let admin = Router::new()
        .merge(api::leads::admin_routes())
        .merge(api::programs::admin_routes())
        .merge(api::chat::admin_routes())
        .merge(api::media::admin_routes())
        .merge(api::people::admin_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::admin_auth_middleware,
        ));

    let public = Router::new()
        .merge(api::health_routes())
        .merge(api::programs::routes())
        .merge(api::quiz::routes())
        .merge(api::leads::routes())
        .merge(api::checkout::routes())
        .merge(api::chat::routes())
        .merge(api::media::routes())
        .merge(api::people::routes());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(admin)
        .merge(public)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
