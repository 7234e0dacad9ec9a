//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `ESHOP_STORAGE_PATH` - JSON file backing the local store (in-memory when unset)
//! - `ESHOP_SESSION_TTL_SECS` - Session token lifetime in seconds (default: 3600)
//! - `ESHOP_CHECKOUT_DELAY_MS` - Simulated payment latency in milliseconds (default: 2000)
//! - `ESHOP_PASSWORD_SCHEME` - `argon2` or `plain` (default: argon2)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::services::auth::{AuthSettings, PasswordScheme};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Where the local store is persisted; `None` keeps it in memory
    pub storage_path: Option<PathBuf>,
    /// Lifetime of an issued session token
    pub session_ttl: Duration,
    /// Simulated payment latency
    pub checkout_delay: Duration,
    /// How new passwords are stored
    pub password_scheme: PasswordScheme,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        let auth = AuthSettings::default();
        Self {
            storage_path: None,
            session_ttl: auth.session_ttl,
            checkout_delay: crate::services::checkout::DEFAULT_PAYMENT_DELAY,
            password_scheme: auth.password_scheme,
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
    /// Returns `ConfigError` if a variable is set to a value that does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` for unparseable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let storage_path = get_optional_env(&lookup, "ESHOP_STORAGE_PATH").map(PathBuf::from);

        let session_ttl = Duration::from_secs(parse_env_or_default(
            &lookup,
            "ESHOP_SESSION_TTL_SECS",
            "3600",
        )?);
        if session_ttl.is_zero() {
            return Err(ConfigError::InvalidEnvVar(
                "ESHOP_SESSION_TTL_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let checkout_delay = Duration::from_millis(parse_env_or_default(
            &lookup,
            "ESHOP_CHECKOUT_DELAY_MS",
            "2000",
        )?);
        let password_scheme = parse_env_or_default(&lookup, "ESHOP_PASSWORD_SCHEME", "argon2")?;

        Ok(Self {
            storage_path,
            session_ttl,
            checkout_delay,
            password_scheme,
            sentry_dsn: get_optional_env(&lookup, "SENTRY_DSN"),
            sentry_environment: get_optional_env(&lookup, "SENTRY_ENVIRONMENT"),
        })
    }

    /// Session store settings derived from this configuration.
    #[must_use]
    pub const fn auth_settings(&self) -> AuthSettings {
        AuthSettings {
            session_ttl: self.session_ttl,
            password_scheme: self.password_scheme,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating blank values as unset.
fn get_optional_env(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Get a variable with a default value.
fn get_env_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional_env(lookup, key).unwrap_or_else(|| default.to_string())
}

/// Get a variable with a default value and parse it.
fn parse_env_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(lookup, key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
