//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: `http://localhost:3000`)
//! - `STOREFRONT_RATE_LIMIT` - Rate limit auth form posts (default: true)
//! - `API_BASE_URL` - Remote REST API root (default: `http://localhost:8000/api/v1`)
//! - `API_TIMEOUT_SECS` - Outbound request timeout in seconds (default: 15)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Public URL used when `STOREFRONT_BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Default root of the remote REST API.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Default outbound request timeout.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 15;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: Url,
    /// Remote API client configuration
    pub api: ApiConfig,
    /// Whether auth form posts are rate limited per client IP
    pub rate_limit: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "production", "staging")
    pub sentry_environment: Option<String>,
}

/// Remote API client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Root URL every endpoint path is appended to
    pub base_url: Url,
    /// Timeout applied to every outbound request
    pub timeout: Duration,
}

impl ApiConfig {
    /// Build an API configuration from a base URL string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL does not parse or is not http(s).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_http_url("API_BASE_URL", base_url)?,
            timeout,
        })
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is normal outside local development.
        let _ = dotenvy::dotenv();

        let base_url = get_optional_env("STOREFRONT_BASE_URL");
        let base_url = parse_http_url(
            "STOREFRONT_BASE_URL",
            base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
        )?;
        let rate_limit = get_optional_env("STOREFRONT_RATE_LIMIT")
            .map_or(Ok(true), |v| parse_bool("STOREFRONT_RATE_LIMIT", &v))?;

        Ok(Self {
            host: parse_env_or("STOREFRONT_HOST", IpAddr::from([127, 0, 0, 1]))?,
            port: parse_env_or("STOREFRONT_PORT", 3000)?,
            base_url,
            api: ApiConfig::from_env()?,
            rate_limit,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies must carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.scheme() == "https"
    }
}

impl ApiConfig {
    /// Load `API_BASE_URL` and `API_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if either variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let timeout_secs = parse_env_or("API_TIMEOUT_SECS", DEFAULT_API_TIMEOUT_SECS)?;
        let base_url = get_optional_env("API_BASE_URL");

        Self::new(
            base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL),
            Duration::from_secs(timeout_secs),
        )
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse `key` with `FromStr`, falling back to `default` when unset or blank.
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse an http(s) URL, rejecting other schemes.
fn parse_http_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{other}'"),
        )),
    }
}

/// Parse a boolean flag in the usual spellings.
fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn default_api() -> ApiConfig {
        ApiConfig::new(
            DEFAULT_API_BASE_URL,
            Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
        )
        .unwrap()
    }

    fn test_config(base_url: &str) -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: Url::parse(base_url).unwrap(),
            api: default_api(),
            rate_limit: false,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config("http://localhost:3000").socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_is_secure_follows_scheme() {
        assert!(!test_config("http://localhost:3000").is_secure());
        assert!(test_config("https://shop.example.com").is_secure());
    }

    #[test]
    fn test_default_api_config() {
        let api = default_api();
        assert_eq!(api.base_url.as_str(), "http://localhost:8000/api/v1");
        assert_eq!(api.timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_parse_http_url_rejects_other_schemes() {
        assert!(parse_http_url("API_BASE_URL", "ftp://example.com").is_err());
        assert!(parse_http_url("API_BASE_URL", "not a url").is_err());
        assert!(parse_http_url("API_BASE_URL", "https://api.example.com/v1").is_ok());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("X", "TRUE").unwrap());
        assert!(parse_bool("X", "on").unwrap());
        assert!(!parse_bool("X", "0").unwrap());
        assert!(parse_bool("X", "maybe").is_err());
    }
}
