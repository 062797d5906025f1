//! Suite configuration: where the router lives and how to talk to it.

use crate::result::{RoutecheckError, RoutecheckResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Router address used when none is given.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/v1";

/// Placeholder key; the router handles upstream auth itself.
pub const DEFAULT_API_KEY: &str = "not-used";

/// Per-request timeout, matching the OpenAI SDK default.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Model identifiers probed by the model-mapping sweep.
pub const DEFAULT_MODELS: [&str; 5] = ["gpt-4", "gpt-4o", "gpt-3.5-turbo", "gpt-5", "o1-mini"];

/// Configuration for one suite run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// API root including the version prefix
    pub base_url: String,
    /// Bearer token sent with every request
    pub api_key: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Identifiers for the model-mapping sweep
    pub models: Vec<String>,
    /// Probe the router before running cases
    pub health_check: bool,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            timeout: DEFAULT_TIMEOUT,
            models: DEFAULT_MODELS.iter().map(ToString::to_string).collect(),
            health_check: true,
        }
    }
}

impl SuiteConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the router base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the API key
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the model sweep list
    #[must_use]
    pub fn with_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = models.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable the pre-run health probe
    #[must_use]
    pub const fn with_health_check(mut self, enabled: bool) -> Self {
        self.health_check = enabled;
        self
    }

    /// Reject configurations the suite cannot run with.
    pub fn validate(&self) -> RoutecheckResult<()> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(RoutecheckError::config(format!(
                "base URL must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(RoutecheckError::config("timeout must be greater than zero"));
        }
        if self.models.is_empty() {
            return Err(RoutecheckError::config(
                "model sweep needs at least one model identifier",
            ));
        }
        if self.models.iter().any(|m| m.trim().is_empty()) {
            return Err(RoutecheckError::config("model identifiers must not be blank"));
        }
        Ok(())
    }
}
