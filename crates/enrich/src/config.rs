//! Configuration for the enrichment client
//!
//! Built from the application config, with environment-variable overrides.

use crate::error::{BackendError, BackendResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use wanderlist_core::config::EnrichmentConfig;
use wanderlist_core::retry::RetryConfig;

/// Default backend URL
const DEFAULT_BASE_URL: &str = "https://api.wanderlist.dev";

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the enrichment backend
    pub base_url: String,
    /// Bearer key for authenticated calls
    pub api_key: Option<String>,
    /// Request timeout
    #[serde(with = "secs_serde")]
    pub timeout: Duration,
    /// Retry configuration
    pub retry: RetryConfig,
}

mod secs_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(15),
            retry: RetryConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Builds client configuration from the application config, letting
    /// environment variables override each value:
    ///
    /// - `WANDERLIST_API_URL`: backend base URL
    /// - `WANDERLIST_API_KEY`: bearer key
    /// - `WANDERLIST_TIMEOUT_SECS`: request timeout in seconds
    pub fn from_app(config: &EnrichmentConfig) -> Self {
        let base_url = env::var("WANDERLIST_API_URL").unwrap_or_else(|_| config.base_url.clone());

        let api_key = env::var("WANDERLIST_API_KEY")
            .ok()
            .or_else(|| config.api_key.clone());

        let timeout = env::var("WANDERLIST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(config.timeout_secs));

        Self {
            base_url,
            api_key,
            timeout,
            retry: RetryConfig::with_attempts(config.max_attempts),
        }
    }

    /// Builder-style method to set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set the API key
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Builder-style method to set the timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set the retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> BackendResult<()> {
        if self.base_url.is_empty() {
            return Err(BackendError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(BackendError::config(
                "base_url must start with http:// or https://",
            ));
        }

        if self.timeout.is_zero() {
            return Err(BackendError::config("timeout cannot be zero"));
        }

        Ok(())
    }
}
