//! Client configuration
//!
//! Connection settings for the workspace service.

use std::time::Duration;

use crate::error::{ClientError, Result};

/// Base URL the service listens on by default
pub const DEFAULT_BASE_URL: &str = "http://localhost:4000/_exo";

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every RPC path is appended to (e.g. "http://localhost:4000/_exo")
    pub base_url: String,

    /// Upper bound on a single request, including reading the body
    ///
    /// A request that exceeds it fails with [`ClientError::RequestFailed`].
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Creates a configuration without a request timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }

    /// Sets the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(ClientError::InvalidConfig(
                "base_url cannot be empty".to_string(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::InvalidConfig(
                "base_url must start with http:// or https://".to_string(),
            ));
        }

        if self.timeout.is_some_and(|timeout| timeout.is_zero()) {
            return Err(ClientError::InvalidConfig(
                "timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
