//! Pipeline domain types
//!
//! Optional fields remember whether they were absent or explicitly `null` on
//! the wire, and unknown fields are kept in `extra`, so a load followed by a
//! save sends back exactly what was received.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

/// Default name given to a freshly added step
pub const NEW_STEP_NAME: &str = "New Step";

/// Default type given to a freshly added step
pub const CUSTOM_STEP_TYPE: &str = "custom";

/// Reads a field that is present on the wire as `Some`, even when it is `null`
///
/// Combined with `#[serde(default)]`, an absent field stays `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Pipeline document
///
/// The sole root of the edit model: versions and steps are owned values,
/// never shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    pub id: String,
    pub name: String,
    /// `None` when absent, `Some(None)` when `null`
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versions: Option<Vec<Version>>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Pipeline {
    pub fn description(&self) -> Option<&str> {
        self.description.as_ref()?.as_deref()
    }

    /// Versions in array order (empty when the document has none)
    pub fn versions(&self) -> &[Version] {
        self.versions.as_deref().unwrap_or_default()
    }

    /// Mutable version list, created on first use
    pub fn versions_mut(&mut self) -> &mut Vec<Version> {
        self.versions.get_or_insert_with(Vec::new)
    }

    /// Find a version by id
    pub fn version(&self, version_id: &str) -> Option<&Version> {
        self.versions().iter().find(|v| v.id == version_id)
    }

    /// Id of the first version, the one selected after a load
    pub fn first_version_id(&self) -> Option<&str> {
        self.versions().first().map(|v| v.id.as_str())
    }
}

/// A numbered snapshot of a pipeline's steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub id: String,
    pub version_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<Step>>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Version {
    /// Steps in list order (empty when the document has none)
    pub fn steps(&self) -> &[Step] {
        self.steps.as_deref().unwrap_or_default()
    }

    /// Mutable step list, created on first use
    pub fn steps_mut(&mut self) -> &mut Vec<Step> {
        self.steps.get_or_insert_with(Vec::new)
    }

    /// Find a step by id
    pub fn step(&self, step_id: &str) -> Option<&Step> {
        self.steps().iter().find(|s| s.id == step_id)
    }

    /// Position of a step in the list
    pub fn step_position(&self, step_id: &str) -> Option<usize> {
        self.steps().iter().position(|s| s.id == step_id)
    }
}

/// A single configurable unit of work within a version
///
/// `config` is opaque: its meaning belongs to `step_type` and it is never
/// validated here. `order` is assigned once at creation and is not kept in
/// sync with the step's position after deletions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub step_type: String,
    /// `None` when absent, `Some(None)` when `null`
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub description: Option<Option<String>>,
    /// `None` when absent, `Some(JsonValue::Null)` when `null`
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub config: Option<JsonValue>,
    pub order: u32,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Step {
    /// Creates a default "custom" step at the given order
    ///
    /// The id is a random UUID so that rapid successive additions never collide.
    pub fn new_custom(order: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: NEW_STEP_NAME.to_string(),
            step_type: CUSTOM_STEP_TYPE.to_string(),
            description: Some(Some(String::new())),
            config: Some(JsonValue::Object(Map::new())),
            order,
            extra: Map::new(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_ref()?.as_deref()
    }

    /// Configuration, unless absent or `null`
    pub fn config(&self) -> Option<&JsonValue> {
        self.config.as_ref().filter(|c| !c.is_null())
    }
}
