//! ID resolver module
//!
//! Step ids are UUIDs, which are tedious to type. This module lets users name
//! a step by any unambiguous prefix of its id, and a version either by its id
//! or by its version number.

use anyhow::{Result, anyhow};
use pipeboard_core::domain::pipeline::{Pipeline, Version};

/// Resolve a version id or version number to a version id
///
/// An exact id match wins; otherwise the input is read as a version number.
///
/// # Errors
/// Returns an error if no version matches.
pub fn resolve_version_id(pipeline: &Pipeline, input: &str) -> Result<String> {
    if let Some(version) = pipeline.version(input) {
        return Ok(version.id.clone());
    }

    let number = input.trim_start_matches(['v', 'V']).parse::<u32>().ok();
    pipeline
        .versions()
        .iter()
        .find(|v| Some(v.version_number) == number)
        .map(|v| v.id.clone())
        .ok_or_else(|| {
            anyhow!(
                "No version '{}' in pipeline {} (available: {})",
                input,
                pipeline.id,
                pipeline
                    .versions()
                    .iter()
                    .map(|v| format!("{} (#{})", v.id, v.version_number))
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
}

/// Resolve a step id or prefix within a version
///
/// # Errors
/// Returns an error if:
/// - No step matches the prefix
/// - Multiple steps match the prefix (ambiguous)
pub fn resolve_step_id(version: &Version, input: &str) -> Result<String> {
    if let Some(step) = version.step(input) {
        return Ok(step.id.clone());
    }

    let prefix = input.to_lowercase();

    let matches: Vec<_> = version
        .steps()
        .iter()
        .filter(|s| s.id.to_lowercase().starts_with(&prefix))
        .collect();

    match matches.len() {
        0 => Err(anyhow!(
            "No step found with ID starting with '{}' in version {}",
            prefix,
            version.id
        )),
        1 => Ok(matches[0].id.clone()),
        _ => {
            let ids: Vec<String> = matches.iter().map(|s| s.id.clone()).collect();
            Err(anyhow!(
                "Ambiguous prefix '{}' matches multiple steps: {}",
                prefix,
                ids.join(", ")
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pipeline() -> Pipeline {
        serde_json::from_value(json!({
            "id": "p1",
            "name": "Nightly ETL",
            "versions": [
                { "id": "v-a", "versionNumber": 1, "steps": [
                    { "id": "3f2a9c10-0000-4000-8000-000000000001", "name": "Extract", "type": "sql", "order": 0 },
                    { "id": "3f2b1111-0000-4000-8000-000000000002", "name": "Load", "type": "sql", "order": 1 },
                    { "id": "extract", "name": "Legacy", "type": "custom", "order": 2 }
                ] },
                { "id": "v-b", "versionNumber": 2, "steps": [] }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_resolve_version() {
        let pipeline = pipeline();
        assert_eq!(resolve_version_id(&pipeline, "v-b").unwrap(), "v-b");
        assert_eq!(resolve_version_id(&pipeline, "1").unwrap(), "v-a");
        assert_eq!(resolve_version_id(&pipeline, "v2").unwrap(), "v-b");
        assert!(resolve_version_id(&pipeline, "7").is_err());
    }

    #[test]
    fn test_resolve_step_prefix() {
        let pipeline = pipeline();
        let version = &pipeline.versions()[0];

        assert_eq!(
            resolve_step_id(version, "3f2a").unwrap(),
            "3f2a9c10-0000-4000-8000-000000000001"
        );
        assert_eq!(resolve_step_id(version, "extract").unwrap(), "extract");
        assert!(resolve_step_id(version, "zz").is_err());

        let err = resolve_step_id(version, "3f2").unwrap_err();
        assert!(err.to_string().contains("Ambiguous"));
    }
}
