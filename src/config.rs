//! Client configuration

use crate::{LootPayError, Result};
use std::time::Duration;
use url::Url;

/// Default LootPay API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.lootpay.com";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "LOOTPAY_API_KEY";

/// Environment variable overriding the base URL
pub const BASE_URL_ENV: &str = "LOOTPAY_BASE_URL";

/// Configuration for a [`LootPayClient`](crate::LootPayClient)
#[derive(Clone)]
pub struct ClientConfig {
    /// API key sent in the `x-api-key` header
    pub api_key: String,
    /// Base URL of the LootPay API
    pub base_url: String,
    /// Request timeout; none by default
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    /// Create a config for the production endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    /// Build a config from `LOOTPAY_API_KEY` and, if set, `LOOTPAY_BASE_URL`
    pub fn from_env() -> Self {
        use std::env;

        let api_key = env::var(API_KEY_ENV).unwrap_or_default();
        let config = Self::new(api_key);

        match env::var(BASE_URL_ENV) {
            Ok(base_url) if !base_url.is_empty() => config.with_base_url(base_url),
            _ => config,
        }
    }

    /// Point the client at another environment (staging, a mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(LootPayError::config("API key cannot be empty"));
        }

        if http::HeaderValue::from_str(&self.api_key).is_err() {
            return Err(LootPayError::config(
                "API key contains characters not allowed in a header",
            ));
        }

        self.parsed_base_url().map(|_| ())
    }

    pub(crate) fn parsed_base_url(&self) -> Result<Url> {
        if self.base_url.is_empty() {
            return Err(LootPayError::config("Base URL cannot be empty"));
        }

        let url = Url::parse(&self.base_url)
            .map_err(|e| LootPayError::config(format!("Invalid base URL: {e}")))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(LootPayError::config(
                "Base URL must start with http:// or https://",
            ));
        }

        Ok(url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(String::new())
    }
}
