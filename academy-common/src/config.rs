//! Configuration loading and root folder resolution
//!
//! Bootstrap settings come from a small TOML file; everything that can change
//! at runtime lives in the database `settings` table.
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. `ACADEMY_ROOT_FOLDER` environment variable
//! 3. `root_folder` in the TOML config file
//! 4. OS-dependent compiled default (fallback)

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::{Error, Result};

pub const ROOT_FOLDER_ENV: &str = "ACADEMY_ROOT_FOLDER";
pub const DATABASE_FILE_NAME: &str = "academy.db";
pub const DEFAULT_PORT: u16 = 5780;

/// Bootstrap configuration loaded from TOML
///
/// Missing files and missing keys are not errors; defaults apply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    #[serde(default)]
    pub bind_address: Option<String>,

    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub payments: PaymentConfig,

    /// Fixed admin secret; when absent the server generates one
    #[serde(default)]
    pub admin_shared_secret: Option<i64>,

    /// Base URL the client talks to
    #[serde(default)]
    pub portal_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Hosted checkout settings
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Provider secret key; checkout is disabled when unset
    #[serde(default)]
    pub stripe_secret_key: Option<String>,

    #[serde(default = "default_stripe_api_base")]
    pub stripe_api_base: String,

    #[serde(default = "default_success_url")]
    pub success_url: String,

    #[serde(default = "default_cancel_url")]
    pub cancel_url: String,

    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            stripe_secret_key: None,
            stripe_api_base: default_stripe_api_base(),
            success_url: default_success_url(),
            cancel_url: default_cancel_url(),
            currency: default_currency(),
        }
    }
}

fn default_stripe_api_base() -> String {
    "https://api.stripe.com".to_string()
}

fn default_success_url() -> String {
    "http://localhost:3000/checkout/success?session_id={CHECKOUT_SESSION_ID}".to_string()
}

fn default_cancel_url() -> String {
    "http://localhost:3000/programs".to_string()
}

fn default_currency() -> String {
    "usd".to_string()
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse TOML {} failed: {}", path.display(), e)))
    }

    /// Load the module's config file, falling back to defaults
    ///
    /// A missing file is normal; a malformed one is logged and ignored so the
    /// service still starts.
    pub fn load_or_default(module_name: &str) -> Self {
        let Some(path) = config_file_path(module_name) else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(&path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// `~/.config/academy/<module>.toml` (platform config dir)
pub fn config_file_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("academy").join(format!("{}.toml", module_name)))
}

/// Compiled fallback values for the current platform
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        let root_folder = dirs::data_local_dir()
            .map(|d| d.join("academy"))
            .unwrap_or_else(|| PathBuf::from("./academy_data"));
        Self { root_folder }
    }
}

/// Resolves the data root folder in priority order
#[derive(Debug, Clone)]
pub struct RootFolderResolver {
    module_name: String,
    cli_arg: Option<PathBuf>,
    toml: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            cli_arg: None,
            toml: None,
        }
    }

    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    pub fn with_toml(mut self, config: &TomlConfig) -> Self {
        self.toml = config.root_folder.clone();
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            info!("{}: root folder from command line", self.module_name);
            return path.clone();
        }
        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                info!("{}: root folder from {}", self.module_name, ROOT_FOLDER_ENV);
                return PathBuf::from(path);
            }
        }
        if let Some(path) = &self.toml {
            info!("{}: root folder from TOML config", self.module_name);
            return path.clone();
        }
        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Creates the root folder and locates files inside it
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            info!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }
}
