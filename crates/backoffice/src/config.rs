//! Back office configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BACKOFFICE_DATABASE_URL` - `PostgreSQL` connection string (falls back
//!   to `DATABASE_URL`)
//!
//! ## Optional
//! - `BACKOFFICE_HOST` - Bind address (default: 127.0.0.1)
//! - `BACKOFFICE_PORT` - Listen port (default: 3000)
//! - `BACKOFFICE_ASSET_ROOT` - Directory for uploaded images (default: public)
//! - `BACKOFFICE_CUSTOMERS_PER_PAGE` - Customer list page size (default: 6)
//! - `BACKOFFICE_PRODUCTS_PER_PAGE` - Product list page size (default: 6)
//! - `BACKOFFICE_IMAGE_REQUIRE_FILE` - Reject submissions without a file
//! - `BACKOFFICE_IMAGE_REQUIRE_NONEMPTY` - Reject zero-byte uploads
//! - `BACKOFFICE_IMAGE_REQUIRE_IMAGE_TYPE` - Reject non-`image/*` uploads
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

use crate::forms::ImagePolicy;

/// Default page size for both customer and product list views.
const DEFAULT_PAGE_SIZE: u32 = 6;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Back office application configuration.
#[derive(Debug, Clone)]
pub struct BackofficeConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Root directory for uploaded assets (served publicly)
    pub asset_root: PathBuf,
    /// Rows per page on the customer list
    pub customers_per_page: u32,
    /// Rows per page on the product list
    pub products_per_page: u32,
    /// Upload validation rules (all off by default)
    pub image_policy: ImagePolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl BackofficeConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("BACKOFFICE_DATABASE_URL")?;
        let host = get_env_or_default("BACKOFFICE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("BACKOFFICE_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("BACKOFFICE_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("BACKOFFICE_PORT".to_string(), e.to_string())
            })?;
        let asset_root = PathBuf::from(get_env_or_default("BACKOFFICE_ASSET_ROOT", "public"));
        let customers_per_page = get_page_size("BACKOFFICE_CUSTOMERS_PER_PAGE")?;
        let products_per_page = get_page_size("BACKOFFICE_PRODUCTS_PER_PAGE")?;
        let image_policy = ImagePolicy {
            require_file: get_env_flag("BACKOFFICE_IMAGE_REQUIRE_FILE"),
            require_nonempty: get_env_flag("BACKOFFICE_IMAGE_REQUIRE_NONEMPTY"),
            require_image_type: get_env_flag("BACKOFFICE_IMAGE_REQUIRE_IMAGE_TYPE"),
        };

        Ok(Self {
            database_url,
            host,
            port,
            asset_root,
            customers_per_page,
            products_per_page,
            image_policy,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read a boolean flag ("1", "true", "yes", case-insensitive).
fn get_env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| parse_flag(&v))
        .unwrap_or(false)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

/// Read a page-size variable, defaulting to [`DEFAULT_PAGE_SIZE`].
///
/// A page size of zero is rejected: it would make every offset calculation
/// and page count degenerate.
fn get_page_size(key: &str) -> Result<u32, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => {
            let size = raw.parse::<u32>().map_err(|e| {
                ConfigError::InvalidEnvVar(key.to_string(), e.to_string())
            })?;
            if size == 0 {
                return Err(ConfigError::InvalidEnvVar(
                    key.to_string(),
                    "page size must be at least 1".to_string(),
                ));
            }
            Ok(size)
        }
        Err(_) => Ok(DEFAULT_PAGE_SIZE),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_accepts_common_truthy_values() {
        assert!(parse_flag("1"));
        assert!(parse_flag("true"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" yes "));
    }

    #[test]
    fn test_parse_flag_rejects_other_values() {
        assert!(!parse_flag("0"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("on"));
    }

    #[test]
    fn test_socket_addr() {
        let config = BackofficeConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            asset_root: PathBuf::from("public"),
            customers_per_page: 6,
            products_per_page: 6,
            image_policy: ImagePolicy::default(),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }
}
