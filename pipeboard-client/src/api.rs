//! Backend API seam
//!
//! The editor session depends on this trait rather than on the concrete HTTP
//! client, so loads and saves can be exercised against an in-memory backend.

use async_trait::async_trait;
use pipeboard_core::domain::data_source::DataSource;
use pipeboard_core::domain::pipeline::Pipeline;

use crate::DashboardClient;
use crate::error::Result;

/// Operations the editor needs from the pipeline backend
#[async_trait]
pub trait PipelineApi: Send + Sync {
    /// Fetch a pipeline document with its versions and steps
    async fn get_pipeline(&self, pipeline_id: &str) -> Result<Pipeline>;

    /// Fetch every registered data source
    async fn list_data_sources(&self) -> Result<Vec<DataSource>>;

    /// Overwrite a pipeline document with `pipeline`
    async fn update_pipeline(&self, pipeline_id: &str, pipeline: &Pipeline) -> Result<()>;
}

#[async_trait]
impl PipelineApi for DashboardClient {
    async fn get_pipeline(&self, pipeline_id: &str) -> Result<Pipeline> {
        DashboardClient::get_pipeline(self, pipeline_id).await
    }

    async fn list_data_sources(&self) -> Result<Vec<DataSource>> {
        DashboardClient::list_data_sources(self).await
    }

    async fn update_pipeline(&self, pipeline_id: &str, pipeline: &Pipeline) -> Result<()> {
        DashboardClient::update_pipeline(self, pipeline_id, pipeline).await
    }
}
