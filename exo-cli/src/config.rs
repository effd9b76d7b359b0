//! Configuration module
//!
//! Handles CLI configuration: service URL, workspace selection and log
//! tailing settings.

use std::time::Duration;

use anyhow::Result;
use exo_client::ClientConfig;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the workspace service
    pub url: String,

    /// Workspace id or unambiguous id prefix; `None` selects the workspace
    /// rooted at the current directory
    pub workspace: Option<String>,

    /// Maximum number of log events kept while tailing
    pub log_buffer_size: usize,

    /// Delay between log fetches when following
    pub poll_interval: Duration,

    /// Per-request timeout
    pub timeout: Option<Duration>,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        self.client_config().validate()?;

        if self.log_buffer_size == 0 {
            anyhow::bail!("log_buffer_size must be greater than 0");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.workspace.as_deref() == Some("") {
            anyhow::bail!("workspace cannot be empty");
        }

        Ok(())
    }

    /// Connection settings for the service client
    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(self.url.clone());
        match self.timeout {
            Some(timeout) => config.with_timeout(timeout),
            None => config,
        }
    }
}
