//! Pipeline-related API endpoints

use crate::DashboardClient;
use crate::error::{ClientError, Result};
use pipeboard_core::domain::pipeline::Pipeline;

impl DashboardClient {
    // =============================================================================
    // Pipeline Documents
    // =============================================================================

    /// Get a pipeline by ID
    ///
    /// # Arguments
    /// * `pipeline_id` - The pipeline identifier
    ///
    /// # Returns
    /// The pipeline with its nested versions and steps
    ///
    /// # Example
    /// ```no_run
    /// # use pipeboard_client::DashboardClient;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = DashboardClient::new("http://localhost:3000");
    /// let pipeline = client.get_pipeline("sample-pipeline-id").await?;
    /// for version in pipeline.versions() {
    ///     println!("Version {}: {} step(s)", version.version_number, version.steps().len());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_pipeline(&self, pipeline_id: &str) -> Result<Pipeline> {
        let url = self.endpoint(&["api", "pipelines", pipeline_id])?;
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        self.handle_response(response).await.map_err(|e| {
            if e.is_not_found() {
                ClientError::NotFound(format!("pipeline {}", pipeline_id))
            } else {
                e
            }
        })
    }

    /// Overwrite a pipeline
    ///
    /// The whole document is sent; the backend decides what happens to
    /// concurrent writers. The response body is not consumed.
    ///
    /// # Arguments
    /// * `pipeline_id` - The pipeline identifier
    /// * `pipeline` - The full pipeline document to store
    pub async fn update_pipeline(&self, pipeline_id: &str, pipeline: &Pipeline) -> Result<()> {
        let url = self.endpoint(&["api", "pipelines", pipeline_id])?;
        tracing::debug!("PUT {}", url);
        let response = self.client.put(url).json(pipeline).send().await?;

        self.handle_empty_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PipelineApi;
    use axum::{
        Json, Router,
        extract::{Path, State},
        http::StatusCode,
        routing::get,
    };
    use serde_json::{Value as JsonValue, json};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// In-memory stand-in for the pipeline backend
    #[derive(Clone, Default)]
    struct Backend {
        pipelines: Arc<Mutex<HashMap<String, JsonValue>>>,
        puts: Arc<Mutex<Vec<(String, JsonValue)>>>,
    }

    async fn get_pipeline_handler(
        State(backend): State<Backend>,
        Path(id): Path<String>,
    ) -> std::result::Result<Json<JsonValue>, (StatusCode, String)> {
        backend
            .pipelines
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .map(Json)
            .ok_or((StatusCode::NOT_FOUND, format!("Pipeline {} not found", id)))
    }

    async fn put_pipeline_handler(
        State(backend): State<Backend>,
        Path(id): Path<String>,
        Json(body): Json<JsonValue>,
    ) -> StatusCode {
        if id == "locked" {
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
        backend.puts.lock().unwrap().push((id.clone(), body.clone()));
        backend.pipelines.lock().unwrap().insert(id, body);
        StatusCode::NO_CONTENT
    }

    async fn list_data_sources_handler() -> Json<JsonValue> {
        Json(json!([
            { "id": "ds1", "name": "Warehouse", "type": "postgres" },
            { "id": "ds2", "name": "Clickstream", "type": "kafka" }
        ]))
    }

    async fn spawn_backend(backend: Backend) -> String {
        let app = Router::new()
            .route(
                "/api/pipelines/{id}",
                get(get_pipeline_handler).put(put_pipeline_handler),
            )
            .route("/api/data-sources", get(list_data_sources_handler))
            .with_state(backend);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    fn document() -> JsonValue {
        json!({
            "id": "p1",
            "name": "Nightly ETL",
            "description": "Loads the warehouse",
            "schedule": "0 3 * * *",
            "versions": [
                { "id": "v1", "versionNumber": 1, "steps": [
                    { "id": "s1", "name": "Extract", "type": "sql", "description": "",
                      "config": { "query": "select * from events" }, "order": 0 }
                ] }
            ]
        })
    }

    #[tokio::test]
    async fn test_get_pipeline() {
        let backend = Backend::default();
        backend
            .pipelines
            .lock()
            .unwrap()
            .insert("p1".to_string(), document());
        let url = spawn_backend(backend).await;

        let client = DashboardClient::new(url);
        let pipeline = client.get_pipeline("p1").await.unwrap();

        assert_eq!(pipeline.name, "Nightly ETL");
        assert_eq!(pipeline.versions()[0].steps()[0].step_type, "sql");
        assert_eq!(pipeline.extra.get("schedule"), Some(&json!("0 3 * * *")));
    }

    #[tokio::test]
    async fn test_get_missing_pipeline_is_not_found() {
        let url = spawn_backend(Backend::default()).await;
        let client = DashboardClient::new(url);

        let err = client.get_pipeline("nope").await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_id_with_reserved_characters_stays_one_segment() {
        let backend = Backend::default();
        let mut doc = document();
        doc["id"] = json!("team/etl?v=1");
        backend
            .pipelines
            .lock()
            .unwrap()
            .insert("team/etl?v=1".to_string(), doc.clone());
        let url = spawn_backend(backend.clone()).await;

        let client = DashboardClient::new(url);
        let pipeline = client.get_pipeline("team/etl?v=1").await.unwrap();
        assert_eq!(pipeline.id, "team/etl?v=1");

        client.update_pipeline("team/etl?v=1", &pipeline).await.unwrap();
        let puts = backend.puts.lock().unwrap();
        assert_eq!(puts[0].0, "team/etl?v=1");
        assert_eq!(puts[0].1, doc);
    }

    #[tokio::test]
    async fn test_put_keeps_null_and_missing_fields() {
        let sparse = json!({
            "id": "p2",
            "name": "Sparse",
            "description": null,
            "versions": [
                { "id": "v1", "versionNumber": 1, "steps": [
                    { "id": "s1", "name": "n", "type": "t", "config": null, "order": 0 }
                ] },
                { "id": "v2", "versionNumber": 2 }
            ]
        });
        let backend = Backend::default();
        backend
            .pipelines
            .lock()
            .unwrap()
            .insert("p2".to_string(), sparse.clone());
        let url = spawn_backend(backend.clone()).await;

        let client = DashboardClient::new(url);
        let pipeline = client.get_pipeline("p2").await.unwrap();
        client.update_pipeline("p2", &pipeline).await.unwrap();

        assert_eq!(backend.puts.lock().unwrap()[0].1, sparse);
    }

    #[tokio::test]
    async fn test_list_data_sources() {
        let url = spawn_backend(Backend::default()).await;
        let client = DashboardClient::new(url);

        let sources = client.list_data_sources().await.unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[1].source_type, "kafka");
    }

    #[tokio::test]
    async fn test_put_body_matches_get_body() {
        let backend = Backend::default();
        backend
            .pipelines
            .lock()
            .unwrap()
            .insert("p1".to_string(), document());
        let url = spawn_backend(backend.clone()).await;

        let client: Arc<dyn PipelineApi> = Arc::new(DashboardClient::new(url));
        let pipeline = client.get_pipeline("p1").await.unwrap();
        client.update_pipeline("p1", &pipeline).await.unwrap();

        let puts = backend.puts.lock().unwrap();
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].0, "p1");
        assert_eq!(puts[0].1, document());
    }

    #[tokio::test]
    async fn test_update_reports_server_error() {
        let url = spawn_backend(Backend::default()).await;
        let client = DashboardClient::new(url);
        let pipeline: Pipeline = serde_json::from_value(document()).unwrap();

        let err = client.update_pipeline("locked", &pipeline).await.unwrap_err();
        assert!(err.is_server_error());
    }
}
