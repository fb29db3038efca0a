//! Pipeboard HTTP Client
//!
//! A small, type-safe HTTP client for the pipeline backend REST API.
//!
//! The editor talks to the backend only through the [`PipelineApi`] trait, so
//! it can be driven by [`DashboardClient`] in production and by an in-memory
//! fake in tests.
//!
//! # Example
//!
//! ```no_run
//! use pipeboard_client::DashboardClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = DashboardClient::new("http://localhost:3000");
//!
//!     let pipeline = client.get_pipeline("sample-pipeline-id").await?;
//!     println!("Loaded pipeline: {} ({} versions)", pipeline.name, pipeline.versions().len());
//!     Ok(())
//! }
//! ```

mod api;
mod data_sources;
pub mod error;
mod pipelines;

// Re-export commonly used types
pub use api::PipelineApi;
pub use error::{ClientError, Result};

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client for the pipeline backend API
///
/// Endpoints are grouped by resource:
/// - Pipelines (get, update)
/// - Data sources (list)
#[derive(Debug, Clone)]
pub struct DashboardClient {
    /// Base URL of the backend (e.g., "http://localhost:3000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl DashboardClient {
    /// Create a new dashboard client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the backend API (e.g., "http://localhost:3000")
    ///
    /// # Example
    /// ```
    /// use pipeboard_client::DashboardClient;
    ///
    /// let client = DashboardClient::new("http://localhost:3000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new dashboard client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the backend API
    /// * `client` - A configured reqwest Client
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Create a client whose requests fail after `timeout`
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Get the base URL of the backend
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an endpoint URL from path segments
    ///
    /// Each segment is percent-encoded, so ids containing `/`, `?` or `#`
    /// stay a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose body is not consumed (e.g., PUT operations)
    ///
    /// This method checks the status code and returns an error if the request failed.
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = DashboardClient::new("http://localhost:3000");
        assert_eq!(client.base_url(), "http://localhost:3000");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = DashboardClient::new("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = DashboardClient::new("http://localhost:3000/");
        let url = client.endpoint(&["api", "pipelines", "team/etl?v=1#x"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/api/pipelines/team%2Fetl%3Fv=1%23x"
        );

        let prefixed = DashboardClient::new("http://localhost:3000/backend");
        let url = prefixed.endpoint(&["api", "data-sources"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/backend/api/data-sources");
    }

    #[test]
    fn test_endpoint_rejects_invalid_base() {
        let client = DashboardClient::new("not a url");
        let err = client.endpoint(&["api"]).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_client_with_timeout() {
        let client =
            DashboardClient::with_timeout("http://localhost:3000", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
    }
}
