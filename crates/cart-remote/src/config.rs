//! # Remote API Configuration
//!
//! Configuration for the commerce API client.
//! All values are loaded from environment variables.

use cart_core::CartMutationError;
use std::env;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Commerce API configuration
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the commerce API (e.g., "https://api.example-bazaar.io")
    pub base_url: String,

    /// Service API key sent with every request
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl RemoteConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `COMMERCE_API_BASE_URL`
    /// - `COMMERCE_API_KEY`
    ///
    /// Optional:
    /// - `COMMERCE_API_TIMEOUT_SECS` (default 30)
    pub fn from_env() -> Result<Self, CartMutationError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let base_url = env::var("COMMERCE_API_BASE_URL").map_err(|_| {
            CartMutationError::Configuration("COMMERCE_API_BASE_URL not set".to_string())
        })?;

        let api_key = env::var("COMMERCE_API_KEY").map_err(|_| {
            CartMutationError::Configuration("COMMERCE_API_KEY not set".to_string())
        })?;

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(CartMutationError::Configuration(
                "COMMERCE_API_BASE_URL must start with http:// or https://".to_string(),
            ));
        }

        if api_key.is_empty() {
            return Err(CartMutationError::Configuration(
                "COMMERCE_API_KEY must not be empty".to_string(),
            ));
        }

        let timeout_secs = env::var("COMMERCE_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            base_url,
            api_key,
            timeout_secs,
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Builder: set request timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Full URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_config() {
        let config = RemoteConfig::new("https://api.example-bazaar.io", "key_test_abc");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(
            config.url("/v1/settings"),
            "https://api.example-bazaar.io/v1/settings"
        );
    }

    #[test]
    fn test_url_joins_trailing_slash() {
        let config = RemoteConfig::new("https://api.example-bazaar.io/", "key");
        assert_eq!(
            config.url("/v1/carts/c-1"),
            "https://api.example-bazaar.io/v1/carts/c-1"
        );
    }

    #[test]
    fn test_from_env_missing_base_url() {
        env::remove_var("COMMERCE_API_BASE_URL");

        let result = RemoteConfig::from_env();
        assert!(result.is_err());
    }
}
