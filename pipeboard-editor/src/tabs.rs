//! Tab router
//!
//! Four mutually exclusive views. Switching tabs never touches pipeline
//! state; each view borrows only the slice of the store it renders.

use pipeboard_core::domain::data_source::DataSource;
use pipeboard_core::domain::pipeline::{Step, Version};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::str::FromStr;
use thiserror::Error;

/// A dashboard view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tab {
    #[default]
    Steps,
    DataSources,
    Analytics,
    Execution,
}

impl Tab {
    /// Tabs in display order
    pub const ALL: [Tab; 4] = [Tab::Steps, Tab::DataSources, Tab::Analytics, Tab::Execution];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Steps => "Steps",
            Tab::DataSources => "Data Sources",
            Tab::Analytics => "Analytics",
            Tab::Execution => "Execution",
        }
    }

    fn slug(&self) -> &'static str {
        match self {
            Tab::Steps => "steps",
            Tab::DataSources => "data-sources",
            Tab::Analytics => "analytics",
            Tab::Execution => "execution",
        }
    }
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// Unknown tab name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tab '{0}' (expected one of: steps, data-sources, analytics, execution)")]
pub struct ParseTabError(String);

impl FromStr for Tab {
    type Err = ParseTabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Tab::ALL
            .into_iter()
            .find(|tab| tab.slug() == wanted)
            .ok_or_else(|| ParseTabError(s.to_string()))
    }
}

/// Execution state reported by the execution view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    #[default]
    Idle,
    Running,
    Completed,
    Error,
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionStatus::Idle => write!(f, "idle"),
            ExecutionStatus::Running => write!(f, "running"),
            ExecutionStatus::Completed => write!(f, "completed"),
            ExecutionStatus::Error => write!(f, "error"),
        }
    }
}

/// The data handed to the active view
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TabView<'a> {
    Steps {
        version: Option<&'a Version>,
        editing: Option<&'a Step>,
    },
    DataSources {
        sources: &'a [DataSource],
        selected: Option<&'a DataSource>,
    },
    Analytics {
        rows: &'a [JsonValue],
    },
    Execution {
        pipeline_id: Option<&'a str>,
        status: ExecutionStatus,
    },
}

impl TabView<'_> {
    /// The tab this view belongs to
    pub fn tab(&self) -> Tab {
        match self {
            TabView::Steps { .. } => Tab::Steps,
            TabView::DataSources { .. } => Tab::DataSources,
            TabView::Analytics { .. } => Tab::Analytics,
            TabView::Execution { .. } => Tab::Execution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tab() {
        assert_eq!("steps".parse::<Tab>().unwrap(), Tab::Steps);
        assert_eq!("Data-Sources".parse::<Tab>().unwrap(), Tab::DataSources);
        assert_eq!(" execution ".parse::<Tab>().unwrap(), Tab::Execution);
        assert!("history".parse::<Tab>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for tab in Tab::ALL {
            assert_eq!(tab.to_string().parse::<Tab>().unwrap(), tab);
        }
    }

    #[test]
    fn test_execution_status_display() {
        assert_eq!(ExecutionStatus::Completed.to_string(), "completed");
        assert_eq!(ExecutionStatus::default(), ExecutionStatus::Idle);
    }
}
