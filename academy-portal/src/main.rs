//! academy-portal - HTTP back end for The Academy
//!
//! Serves the public site API (programs, quiz, leads, checkout, chat, media)
//! and the signed admin API from one SQLite database.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use academy_common::api::auth::load_admin_secret;
use academy_common::config::{
    RootFolderInitializer, RootFolderResolver, TomlConfig, DEFAULT_PORT,
};
use academy_portal::db::init_database;
use academy_portal::payments::{DisabledProvider, PaymentProvider, StripeProvider};
use academy_portal::{build_router, AppState, ChatLimits};

const MODULE_NAME: &str = "academy-portal";

/// Command-line arguments for academy-portal
#[derive(Parser, Debug)]
#[command(name = "academy-portal")]
#[command(about = "HTTP back end for The Academy")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "ACADEMY_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(short, long)]
    bind: Option<String>,

    /// Data folder holding academy.db
    #[arg(short, long, env = "ACADEMY_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Config file (defaults to ~/.config/academy/academy-portal.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stripe secret key; checkout is disabled without one
    #[arg(long, env = "ACADEMY_STRIPE_SECRET_KEY", hide_env_values = true)]
    stripe_secret_key: Option<String>,

    /// Fixed admin signing secret (0 disables admin auth)
    #[arg(long, env = "ACADEMY_ADMIN_SECRET", hide_env_values = true)]
    admin_secret: Option<i64>,
}

fn load_config(path: Option<&PathBuf>) -> Result<TomlConfig> {
    match path {
        Some(path) => TomlConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(TomlConfig::load_or_default(MODULE_NAME)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "academy_portal={level},academy_common={level},tower_http=info",
                    level = config.logging.level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Academy Portal (academy-portal) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root_folder = RootFolderResolver::new(MODULE_NAME)
        .with_cli_arg(args.root_folder.clone())
        .with_toml(&config)
        .resolve();
    let initializer = RootFolderInitializer::new(root_folder);
    initializer.ensure_directory_exists()?;

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());
    let pool = init_database(&db_path)
        .await
        .context("Failed to initialize database")?;

    let configured_secret = args.admin_secret.or(config.admin_shared_secret);
    let admin_secret = load_admin_secret(&pool, configured_secret)
        .await
        .context("Failed to load admin secret")?;
    if admin_secret == 0 {
        warn!("Admin authentication disabled (admin_shared_secret = 0)");
    } else {
        info!("Loaded admin signing secret");
    }

    let chat_limits = ChatLimits::load(&pool).await?;
    info!(
        default_limit = chat_limits.default_limit,
        max_limit = chat_limits.max_limit,
        "Chat history limits"
    );

    let stripe_key = args
        .stripe_secret_key
        .clone()
        .or_else(|| config.payments.stripe_secret_key.clone())
        .filter(|k| !k.trim().is_empty());
    let payments: Arc<dyn PaymentProvider> = match stripe_key {
        Some(key) => Arc::new(StripeProvider::new(key, &config.payments)?),
        None => {
            warn!("No Stripe secret key configured; checkout will return 503");
            Arc::new(DisabledProvider)
        }
    };
    info!("Payment provider: {}", payments.name());

    let state = AppState::new(pool, admin_secret, payments).with_chat_limits(chat_limits);
    let app = build_router(state);

    let bind = args
        .bind
        .or(config.bind_address)
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = args.port.or(config.port).unwrap_or(DEFAULT_PORT);
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("academy-portal listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
