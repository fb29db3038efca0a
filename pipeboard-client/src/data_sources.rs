//! Data-source API endpoints

use crate::DashboardClient;
use crate::error::Result;
use pipeboard_core::domain::data_source::DataSource;

impl DashboardClient {
    /// List all data sources
    ///
    /// # Returns
    /// Every data source known to the backend, in backend order
    pub async fn list_data_sources(&self) -> Result<Vec<DataSource>> {
        let url = self.endpoint(&["api", "data-sources"])?;
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        self.handle_response(response).await
    }
}
