//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `PRODUCT_API_URL` - Product endpoint (default: the live product API)
//! - `STOREFRONT_STORE_PATH` - Store file for the product cache and rate window
//!   (default: `.tee-storefront/store.json`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate, 0.0 to 1.0 (default: 1.0)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Product endpoint used when `PRODUCT_API_URL` is not set.
pub const DEFAULT_PRODUCT_API_URL: &str =
    "https://3sb655pz3a.execute-api.ap-southeast-2.amazonaws.com/live/product";

/// Store file used when `STOREFRONT_STORE_PATH` is not set.
pub const DEFAULT_STORE_PATH: &str = ".tee-storefront/store.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Product endpoint configuration
    pub product_api: ProductApiConfig,
    /// Path of the persistent store file
    pub store_path: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
}

/// Product endpoint configuration.
#[derive(Debug, Clone)]
pub struct ProductApiConfig {
    /// Endpoint returning the product JSON
    pub url: Url,
}

impl Default for ProductApiConfig {
    fn default() -> Self {
        Self {
            url: default_product_api_url(),
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
    /// Returns `ConfigError` if a variable is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let product_api = ProductApiConfig::from_env()?;
        let store_path = PathBuf::from(get_env_or_default(
            "STOREFRONT_STORE_PATH",
            DEFAULT_STORE_PATH,
        ));
        let sentry_sample_rate = get_env_or_default("SENTRY_SAMPLE_RATE", "1.0")
            .parse::<f32>()
            .ok()
            .filter(|rate| (0.0..=1.0).contains(rate))
            .ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "SENTRY_SAMPLE_RATE".to_string(),
                    "must be a number between 0.0 and 1.0".to_string(),
                )
            })?;

        Ok(Self {
            product_api,
            store_path,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
        })
    }
}

impl ProductApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = match get_optional_env("PRODUCT_API_URL") {
            Some(raw) => parse_endpoint(&raw, "PRODUCT_API_URL")?,
            None => default_product_api_url(),
        };

        Ok(Self { url })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// # Panics
///
/// Never in practice: the default URL is a constant covered by tests.
fn default_product_api_url() -> Url {
    Url::parse(DEFAULT_PRODUCT_API_URL).expect("default product API URL is valid")
}

/// Parse an endpoint URL, accepting only `http` and `https`.
fn parse_endpoint(raw: &str, var_name: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{other}'"),
        )),
    }
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}
