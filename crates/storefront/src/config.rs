//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOREFRONT_DATA_DIR` - Directory holding persisted state (default: `.storefront`)
//! - `STOREFRONT_NOTIFICATION_MS` - Notification display time in ms (default: 3000)
//! - `STOREFRONT_CATALOG_PATH` - JSON product catalog (default: built-in catalog)
//! - `STOREFRONT_THEME` - Initial theme, `light` or `dark` (default: light)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::notifications::DEFAULT_DURATION;
use crate::theme::Theme;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory backing the blob store
    pub data_dir: PathBuf,
    /// Default notification display duration
    pub notification_duration: Duration,
    /// Optional catalog file replacing the built-in products
    pub catalog_path: Option<PathBuf>,
    /// Theme shown at startup
    pub theme: Theme,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".storefront"),
            notification_duration: DEFAULT_DURATION,
            catalog_path: None,
            theme: Theme::Light,
            sentry_dsn: None,
            sentry_environment: None,
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
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let data_dir = lookup("STOREFRONT_DATA_DIR")
            .filter(|v| !v.trim().is_empty())
            .map_or(defaults.data_dir, PathBuf::from);

        let notification_duration = match lookup("STOREFRONT_NOTIFICATION_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| invalid("STOREFRONT_NOTIFICATION_MS", &e))?,
            None => defaults.notification_duration,
        };

        let catalog_path = lookup("STOREFRONT_CATALOG_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let theme = match lookup("STOREFRONT_THEME") {
            Some(raw) => raw
                .parse::<Theme>()
                .map_err(|e| invalid("STOREFRONT_THEME", &e))?,
            None => defaults.theme,
        };

        Ok(Self {
            data_dir,
            notification_duration,
            catalog_path,
            theme,
            sentry_dsn: lookup("SENTRY_DSN").filter(|v| !v.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT").filter(|v| !v.is_empty()),
        })
    }
}

fn invalid(key: &str, err: &impl ToString) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), err.to_string())
}
