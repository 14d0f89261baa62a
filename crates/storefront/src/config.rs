//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `YRUSH_STORAGE` - Durable storage backend, `file` or `memory` (default: file)
//! - `YRUSH_DATA_DIR` - Directory for storage files (default: .yrush)
//! - `YRUSH_STORAGE_QUOTA_BYTES` - Per-scope byte quota, 0 disables (default: 5242880)
//! - `YRUSH_CATALOG_PATH` - Catalog override JSON file
//! - `YRUSH_DELIVERY_FEE` - Delivery fee in rupees (default: 5)
//! - `YRUSH_LOGIN_PATH` - Where unauthenticated users are sent (default: login.html)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;

use rust_decimal::Decimal;
use thiserror::Error;

use yrush_core::Price;

/// Durable storage file name inside the data directory.
pub const DURABLE_FILE_NAME: &str = "local_storage.json";

/// Session storage file name inside the data directory.
pub const SESSION_FILE_NAME: &str = "session_storage.json";

/// Default per-scope quota, matching the common browser `localStorage` limit.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which backend holds the durable scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageKind {
    /// JSON file in the data directory.
    #[default]
    File,
    /// In-process map, gone when the process exits.
    Memory,
}

impl std::str::FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(format!("expected `file` or `memory`, got `{other}`")),
        }
    }
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Durable storage backend
    pub storage: StorageKind,
    /// Directory holding storage files
    pub data_dir: PathBuf,
    /// Per-scope byte quota (`None` disables)
    pub quota_bytes: Option<usize>,
    /// Catalog override file
    pub catalog_path: Option<PathBuf>,
    /// Flat fee added to delivery orders
    pub delivery_fee: Price,
    /// Redirect target for unauthenticated access
    pub login_path: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            storage: StorageKind::File,
            data_dir: PathBuf::from(".yrush"),
            quota_bytes: Some(DEFAULT_QUOTA_BYTES),
            catalog_path: None,
            delivery_fee: Price::from_paise(500),
            login_path: "login.html".to_string(),
            sentry_dsn: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable cannot be parsed.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let storage = match get("YRUSH_STORAGE") {
            Some(raw) => raw
                .parse::<StorageKind>()
                .map_err(|e| ConfigError::InvalidEnvVar("YRUSH_STORAGE".to_string(), e))?,
            None => defaults.storage,
        };

        let data_dir = get("YRUSH_DATA_DIR").map_or(defaults.data_dir, PathBuf::from);

        let quota_bytes = match get("YRUSH_STORAGE_QUOTA_BYTES") {
            Some(raw) => {
                let bytes = raw.trim().parse::<usize>().map_err(|e| {
                    ConfigError::InvalidEnvVar("YRUSH_STORAGE_QUOTA_BYTES".to_string(), e.to_string())
                })?;
                (bytes > 0).then_some(bytes)
            }
            None => defaults.quota_bytes,
        };

        let catalog_path = get("YRUSH_CATALOG_PATH").map(PathBuf::from);

        let delivery_fee = match get("YRUSH_DELIVERY_FEE") {
            Some(raw) => parse_fee(&raw)?,
            None => defaults.delivery_fee,
        };

        let login_path = get("YRUSH_LOGIN_PATH").unwrap_or(defaults.login_path);
        let sentry_dsn = get("SENTRY_DSN");

        Ok(Self {
            storage,
            data_dir,
            quota_bytes,
            catalog_path,
            delivery_fee,
            login_path,
            sentry_dsn,
        })
    }

    /// Path of the durable storage file.
    #[must_use]
    pub fn durable_path(&self) -> PathBuf {
        self.data_dir.join(DURABLE_FILE_NAME)
    }

    /// Path of the session storage file (used by the CLI, whose "session"
    /// outlives a single process).
    #[must_use]
    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE_NAME)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a non-negative rupee amount.
fn parse_fee(raw: &str) -> Result<Price, ConfigError> {
    let amount = raw.trim().parse::<Decimal>().map_err(|e| {
        ConfigError::InvalidEnvVar("YRUSH_DELIVERY_FEE".to_string(), e.to_string())
    })?;
    let fee = Price::new(amount);
    if fee.is_negative() {
        return Err(ConfigError::InvalidEnvVar(
            "YRUSH_DELIVERY_FEE".to_string(),
            "must not be negative".to_string(),
        ));
    }
    Ok(fee)
}
