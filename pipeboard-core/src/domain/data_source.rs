//! Data source domain model
//!
//! Represents an external input a pipeline can be pointed at. Data sources are
//! read-only from the editor's point of view.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// A data source registered with the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    /// Unique identifier for the data source
    pub id: String,

    /// Display name
    pub name: String,

    /// Kind of source (e.g. "postgres", "s3")
    #[serde(rename = "type")]
    pub source_type: String,

    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.source_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_data_source_list() {
        let body = json!([
            { "id": "ds1", "name": "Warehouse", "type": "postgres" },
            { "id": "ds2", "name": "Raw events", "type": "s3", "region": "eu-west-1" }
        ]);

        let sources: Vec<DataSource> = serde_json::from_value(body).unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].source_type, "postgres");
        assert_eq!(sources[1].extra.get("region"), Some(&json!("eu-west-1")));
        assert_eq!(sources[1].to_string(), "Raw events (s3)");
    }
}
