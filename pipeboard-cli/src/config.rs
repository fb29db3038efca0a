//! Configuration module
//!
//! Settings for reaching the pipeline backend.

use anyhow::{Context, Result};
use pipeboard_client::DashboardClient;
use std::time::Duration;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend API
    pub api_url: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Config {
    pub fn new(api_url: String, timeout: Duration) -> Self {
        Self { api_url, timeout }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_url.is_empty() {
            anyhow::bail!("api_url cannot be empty");
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            anyhow::bail!("api_url must start with http:// or https://");
        }

        if self.timeout.is_zero() {
            anyhow::bail!("timeout must be greater than 0");
        }

        Ok(())
    }

    /// Build a backend client from this configuration
    pub fn client(&self) -> Result<DashboardClient> {
        DashboardClient::with_timeout(&self.api_url, self.timeout)
            .context("Failed to build HTTP client")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("http://localhost:3000".to_string(), Duration::from_secs(30))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.api_url = String::new();
        assert!(config.validate().is_err());

        config.api_url = "localhost:3000".to_string();
        assert!(config.validate().is_err());

        config.api_url = "https://pipelines.internal".to_string();
        assert!(config.validate().is_ok());

        config.timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_client_uses_api_url() {
        let config = Config::new("http://localhost:4000/".to_string(), Duration::from_secs(5));
        let client = config.client().unwrap();
        assert_eq!(client.base_url(), "http://localhost:4000");
    }
}
