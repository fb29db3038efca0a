//! Step DTOs

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::pipeline::Step;

/// Partial edit of a step, as submitted by the step editor
///
/// Fields left as `None` keep the step's current value. The step's id and
/// order are never touched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepPatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub step_type: Option<String>,
    pub description: Option<String>,
    pub config: Option<JsonValue>,
}

impl StepPatch {
    /// Returns true if the patch would change nothing
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.step_type.is_none()
            && self.description.is_none()
            && self.config.is_none()
    }

    /// Produce the edited copy of `step`
    pub fn apply(&self, step: &Step) -> Step {
        let mut edited = step.clone();
        if let Some(name) = &self.name {
            edited.name = name.clone();
        }
        if let Some(step_type) = &self.step_type {
            edited.step_type = step_type.clone();
        }
        if let Some(description) = &self.description {
            edited.description = Some(Some(description.clone()));
        }
        if let Some(config) = &self.config {
            edited.config = Some(config.clone());
        }
        edited
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_patch_is_identity() {
        let step = Step::new_custom(0);
        let patch = StepPatch::default();
        assert!(patch.is_empty());
        assert_eq!(patch.apply(&step), step);
    }

    #[test]
    fn test_patch_keeps_identity_and_order() {
        let step = Step::new_custom(2);
        let patch = StepPatch {
            name: Some("Load".to_string()),
            step_type: Some("sql".to_string()),
            description: None,
            config: Some(json!({ "table": "events" })),
        };

        let edited = patch.apply(&step);
        assert_eq!(edited.id, step.id);
        assert_eq!(edited.order, 2);
        assert_eq!(edited.name, "Load");
        assert_eq!(edited.step_type, "sql");
        assert_eq!(edited.description, step.description);
        assert_eq!(edited.config, Some(json!({ "table": "events" })));
    }
}
