//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CARTWHEEL_API_URL` - Base URL of the remote catalog/account API
//! - `CARTWHEEL_BASE_URL` - Public URL for the storefront
//! - `CARTWHEEL_CHECKOUT_KEY` - Publishable key for the hosted checkout widget
//!
//! ## Optional
//! - `CARTWHEEL_HOST` - Bind address (default: 127.0.0.1)
//! - `CARTWHEEL_PORT` - Listen port (default: 3000)
//! - `CARTWHEEL_MERCHANT_NAME` - Name shown in the checkout widget (default: Cartwheel)
//! - `CARTWHEEL_SESSION_IDLE_MINUTES` - Minutes before an idle session's store is dropped, 1 to 525600 (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "xxx",
    "todo",
    "insert",
];

/// Longest accepted session idle time (one year).
const MAX_SESSION_IDLE_MINUTES: u64 = 60 * 24 * 365;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
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
    pub base_url: String,
    /// Base URL of the remote API
    pub api_url: Url,
    /// How long an untouched session keeps its store
    pub session_idle: Duration,
    /// Hosted checkout widget configuration
    pub checkout: CheckoutConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry performance trace sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Hosted checkout widget configuration.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Publishable key (safe to expose in the browser)
    pub publishable_key: String,
    /// Merchant name shown in the widget
    pub merchant_name: String,
}

impl StorefrontConfig {
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

        let host = parse_env("CARTWHEEL_HOST", &get_env_or_default("CARTWHEEL_HOST", "127.0.0.1"))?;
        let port = parse_env("CARTWHEEL_PORT", &get_env_or_default("CARTWHEEL_PORT", "3000"))?;
        let base_url = get_required_env("CARTWHEEL_BASE_URL")?;
        let api_url = parse_api_url(&get_required_env("CARTWHEEL_API_URL")?)?;
        let session_idle =
            parse_session_idle(&get_env_or_default("CARTWHEEL_SESSION_IDLE_MINUTES", "30"))?;

        let checkout = CheckoutConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            api_url,
            session_idle,
            checkout,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env(
                "SENTRY_SAMPLE_RATE",
                &get_env_or_default("SENTRY_SAMPLE_RATE", "1.0"),
            )?,
            sentry_traces_sample_rate: parse_env(
                "SENTRY_TRACES_SAMPLE_RATE",
                &get_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0"),
            )?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should be marked `Secure`.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl CheckoutConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let publishable_key = get_required_env("CARTWHEEL_CHECKOUT_KEY")?;
        reject_placeholder(&publishable_key, "CARTWHEEL_CHECKOUT_KEY")?;

        Ok(Self {
            publishable_key,
            merchant_name: get_env_or_default("CARTWHEEL_MERCHANT_NAME", "Cartwheel"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a raw value, naming the variable in the error.
fn parse_env<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse the remote API base URL. Only http(s) URLs are accepted.
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar("CARTWHEEL_API_URL".to_string(), e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEnvVar(
            "CARTWHEEL_API_URL".to_string(),
            format!("unsupported scheme '{other}'"),
        )),
    }
}

/// Parse the session idle time in minutes, between one minute and
/// [`MAX_SESSION_IDLE_MINUTES`].
fn parse_session_idle(raw: &str) -> Result<Duration, ConfigError> {
    const KEY: &str = "CARTWHEEL_SESSION_IDLE_MINUTES";

    let minutes: u64 = parse_env(KEY, raw)?;
    if !(1..=MAX_SESSION_IDLE_MINUTES).contains(&minutes) {
        return Err(ConfigError::InvalidEnvVar(
            KEY.to_string(),
            format!("must be between 1 and {MAX_SESSION_IDLE_MINUTES} minutes"),
        ));
    }

    minutes
        .checked_mul(60)
        .map(Duration::from_secs)
        .ok_or_else(|| ConfigError::InvalidEnvVar(KEY.to_string(), "out of range".to_string()))
}

/// Reject values that were obviously copied from a sample `.env`.
fn reject_placeholder(value: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InvalidEnvVar(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            api_url: Url::parse("https://api.example.com").unwrap(),
            session_idle: Duration::from_secs(1800),
            checkout: CheckoutConfig {
                publishable_key: "pk_test_51Hx".to_string(),
                merchant_name: "Cartwheel".to_string(),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_is_secure() {
        let mut config = config();
        assert!(!config.is_secure());
        config.base_url = "https://shop.example.com".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_parse_api_url() {
        assert!(parse_api_url("https://api.example.com/v1").is_ok());
        assert!(parse_api_url(" http://127.0.0.1:8080 ").is_ok());
        assert!(matches!(
            parse_api_url("ftp://api.example.com"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(parse_api_url("not a url").is_err());
    }

    #[test]
    fn test_parse_env_reports_variable() {
        let err = parse_env::<u16>("CARTWHEEL_PORT", "eighty").unwrap_err();
        assert!(err.to_string().contains("CARTWHEEL_PORT"));
        assert_eq!(parse_env::<u16>("CARTWHEEL_PORT", " 8080 ").unwrap(), 8080);
    }

    #[test]
    fn test_parse_session_idle() {
        assert_eq!(parse_session_idle("30").unwrap(), Duration::from_secs(1800));
        assert!(matches!(
            parse_session_idle("0"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(matches!(
            parse_session_idle("18446744073709551615"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(parse_session_idle("525601").is_err());
        assert!(parse_session_idle("525600").is_ok());
    }

    #[test]
    fn test_reject_placeholder() {
        assert!(reject_placeholder("your-publishable-stripe-key", "K").is_err());
        assert!(reject_placeholder("pk_live_changeme", "K").is_err());
        assert!(reject_placeholder("pk_test_51HxQ2f", "K").is_ok());
    }
}
