//! Editor store
//!
//! Holds everything the dashboard knows about the open pipeline in one
//! object. State is private; callers go through the methods below, each of
//! which either applies its change completely or returns a [`StoreError`]
//! and leaves the state untouched.
//!
//! Invariant: when set, `current_version_id` names a version of the loaded
//! pipeline.

use pipeboard_core::domain::data_source::DataSource;
use pipeboard_core::domain::pipeline::{Pipeline, Step, Version};
use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::notification::Notification;
use crate::tabs::{ExecutionStatus, Tab, TabView};

pub const MSG_LOAD_FAILED: &str = "Failed to load pipeline data";
pub const MSG_SAVE_SUCCEEDED: &str = "Pipeline saved successfully";
pub const MSG_SAVE_FAILED: &str = "Failed to save pipeline";
pub const MSG_STEP_UPDATED: &str = "Step updated successfully";
pub const MSG_STEP_DELETED: &str = "Step deleted successfully";

type Result<T> = std::result::Result<T, StoreError>;

/// Identifies one load request
///
/// Tickets increase monotonically; only the most recently issued ticket may
/// apply its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    sequence: u64,
    pipeline_id: String,
}

impl LoadTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }
}

/// Edit state of the pipeline dashboard
#[derive(Debug, Default)]
pub struct Store {
    pipeline_id: Option<String>,
    pipeline: Option<Pipeline>,
    current_version_id: Option<String>,
    data_sources: Vec<DataSource>,
    selected_data_source_id: Option<String>,
    analytics: Vec<JsonValue>,
    execution_status: ExecutionStatus,
    active_tab: Tab,
    editing_step_id: Option<String>,
    notification: Option<Notification>,
    latest_load: u64,
    loading: bool,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // =============================================================================
    // Loading
    // =============================================================================

    /// Issue a ticket for a new load of `pipeline_id`
    ///
    /// Any ticket issued earlier becomes stale.
    pub fn start_load(&mut self, pipeline_id: &str) -> LoadTicket {
        self.latest_load += 1;
        self.loading = true;
        debug!("Load #{} started for pipeline {}", self.latest_load, pipeline_id);

        LoadTicket {
            sequence: self.latest_load,
            pipeline_id: pipeline_id.to_string(),
        }
    }

    /// Whether `ticket` is the most recent load request
    pub fn is_latest(&self, ticket: &LoadTicket) -> bool {
        ticket.sequence == self.latest_load
    }

    /// Whether the latest load is still in flight
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    fn check_latest(&self, ticket: &LoadTicket) -> Result<()> {
        if self.is_latest(ticket) {
            Ok(())
        } else {
            Err(StoreError::StaleLoad {
                ticket: ticket.sequence,
                latest: self.latest_load,
            })
        }
    }

    /// Apply the result of a successful load
    ///
    /// Pipeline and data sources are applied together; the first version
    /// becomes current and the step editor is closed.
    pub fn finish_load(
        &mut self,
        ticket: &LoadTicket,
        pipeline: Pipeline,
        data_sources: Vec<DataSource>,
    ) -> Result<()> {
        if let Err(e) = self.check_latest(ticket) {
            warn!("Discarding result of load #{}: {}", ticket.sequence, e);
            return Err(e);
        }

        info!(
            "Loaded pipeline {} ({} version(s), {} data source(s))",
            ticket.pipeline_id,
            pipeline.versions().len(),
            data_sources.len()
        );

        self.current_version_id = pipeline.first_version_id().map(str::to_string);
        self.pipeline_id = Some(ticket.pipeline_id.clone());
        self.pipeline = Some(pipeline);
        self.data_sources = data_sources;
        self.selected_data_source_id = None;
        self.editing_step_id = None;
        self.loading = false;

        Ok(())
    }

    /// Record that the load behind `ticket` failed
    ///
    /// Previously loaded state is kept as is.
    pub fn fail_load(&mut self, ticket: &LoadTicket) -> Result<()> {
        self.check_latest(ticket)?;

        self.loading = false;
        self.notify(Notification::error(MSG_LOAD_FAILED));
        Ok(())
    }

    // =============================================================================
    // Saving
    // =============================================================================

    /// The document to send on save, with the id it was loaded under
    pub fn snapshot(&self) -> Result<(String, Pipeline)> {
        match (&self.pipeline_id, &self.pipeline) {
            (Some(id), Some(pipeline)) => Ok((id.clone(), pipeline.clone())),
            _ => Err(StoreError::NoPipelineLoaded),
        }
    }

    pub fn record_save_succeeded(&mut self) {
        self.notify(Notification::success(MSG_SAVE_SUCCEEDED));
    }

    pub fn record_save_failed(&mut self) {
        self.notify(Notification::error(MSG_SAVE_FAILED));
    }

    // =============================================================================
    // Read Access
    // =============================================================================

    pub fn pipeline_id(&self) -> Option<&str> {
        self.pipeline_id.as_deref()
    }

    pub fn pipeline(&self) -> Option<&Pipeline> {
        self.pipeline.as_ref()
    }

    /// Versions of the loaded pipeline (empty when nothing is loaded)
    pub fn versions(&self) -> &[Version] {
        self.pipeline
            .as_ref()
            .map(Pipeline::versions)
            .unwrap_or_default()
    }

    pub fn current_version_id(&self) -> Option<&str> {
        self.current_version_id.as_deref()
    }

    pub fn current_version(&self) -> Option<&Version> {
        let id = self.current_version_id.as_deref()?;
        self.pipeline.as_ref()?.version(id)
    }

    pub fn data_sources(&self) -> &[DataSource] {
        &self.data_sources
    }

    pub fn selected_data_source(&self) -> Option<&DataSource> {
        let id = self.selected_data_source_id.as_deref()?;
        self.data_sources.iter().find(|ds| ds.id == id)
    }

    pub fn analytics_data(&self) -> &[JsonValue] {
        &self.analytics
    }

    pub fn execution_status(&self) -> ExecutionStatus {
        self.execution_status
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    /// The step open in the step editor, if any
    pub fn editing_step(&self) -> Option<&Step> {
        let id = self.editing_step_id.as_deref()?;
        self.current_version()?.step(id)
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Remove and return the current notification
    pub fn take_notification(&mut self) -> Option<Notification> {
        self.notification.take()
    }

    fn notify(&mut self, notification: Notification) {
        debug!("Notification: {}", notification.message);
        self.notification = Some(notification);
    }

    // =============================================================================
    // Pipeline & Versions
    // =============================================================================

    fn pipeline_mut(&mut self) -> Result<&mut Pipeline> {
        self.pipeline.as_mut().ok_or(StoreError::NoPipelineLoaded)
    }

    fn current_version_mut(&mut self) -> Result<&mut Version> {
        let current = self
            .current_version_id
            .clone()
            .ok_or(StoreError::NoCurrentVersion)?;
        self.pipeline_mut()?
            .versions_mut()
            .iter_mut()
            .find(|v| v.id == current)
            .ok_or(StoreError::VersionNotFound(current))
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.pipeline_mut()?.name = name.into();
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<()> {
        self.pipeline_mut()?.description = Some(Some(description.into()));
        Ok(())
    }

    /// Make `version_id` the current version
    ///
    /// Unknown ids are rejected and the current version stays selected.
    pub fn select_version(&mut self, version_id: &str) -> Result<()> {
        let pipeline = self.pipeline.as_ref().ok_or(StoreError::NoPipelineLoaded)?;
        if pipeline.version(version_id).is_none() {
            return Err(StoreError::VersionNotFound(version_id.to_string()));
        }

        debug!("Selected version {}", version_id);
        self.current_version_id = Some(version_id.to_string());
        self.editing_step_id = None;
        Ok(())
    }

    /// Replace the current version with `version`
    ///
    /// `version` must carry the id of the version it replaces.
    pub fn replace_current_version(&mut self, version: Version) -> Result<()> {
        let slot = self.current_version_mut()?;
        if slot.id != version.id {
            return Err(StoreError::VersionIdMismatch {
                expected: slot.id.clone(),
                found: version.id,
            });
        }

        *slot = version;
        Ok(())
    }

    // =============================================================================
    // Steps
    // =============================================================================

    /// Append a default step to the current version and open it in the editor
    ///
    /// The new step's `order` is the number of steps before it was added.
    pub fn add_step(&mut self) -> Result<Step> {
        let version = self.current_version_mut()?;
        let order = u32::try_from(version.steps().len()).unwrap_or(u32::MAX);
        let step = Step::new_custom(order);
        version.steps_mut().push(step.clone());

        debug!("Added step {} at order {}", step.id, order);
        self.editing_step_id = Some(step.id.clone());
        Ok(step)
    }

    /// Open an existing step of the current version in the editor
    pub fn open_step(&mut self, step_id: &str) -> Result<()> {
        let version = self.current_version().ok_or(StoreError::NoCurrentVersion)?;
        if version.step(step_id).is_none() {
            return Err(StoreError::StepNotFound(step_id.to_string()));
        }

        self.editing_step_id = Some(step_id.to_string());
        Ok(())
    }

    pub fn close_step_editor(&mut self) {
        self.editing_step_id = None;
    }

    /// Replace the step with the same id, keeping its position
    pub fn update_step(&mut self, step: Step) -> Result<()> {
        let version = self.current_version_mut()?;
        let slot = version
            .steps_mut()
            .iter_mut()
            .find(|s| s.id == step.id)
            .ok_or_else(|| StoreError::StepNotFound(step.id.clone()))?;
        *slot = step;

        self.editing_step_id = None;
        self.notify(Notification::success(MSG_STEP_UPDATED));
        Ok(())
    }

    /// Remove a step from the current version
    ///
    /// The `order` of the remaining steps is left as is.
    pub fn delete_step(&mut self, step_id: &str) -> Result<Step> {
        let version = self.current_version_mut()?;
        let position = version
            .step_position(step_id)
            .ok_or_else(|| StoreError::StepNotFound(step_id.to_string()))?;
        let removed = version.steps_mut().remove(position);

        if self.editing_step_id.as_deref() == Some(step_id) {
            self.editing_step_id = None;
        }
        self.notify(Notification::success(MSG_STEP_DELETED));
        Ok(removed)
    }

    // =============================================================================
    // Views
    // =============================================================================

    pub fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    /// Data for the active tab
    pub fn view(&self) -> TabView<'_> {
        match self.active_tab {
            Tab::Steps => TabView::Steps {
                version: self.current_version(),
                editing: self.editing_step(),
            },
            Tab::DataSources => TabView::DataSources {
                sources: &self.data_sources,
                selected: self.selected_data_source(),
            },
            Tab::Analytics => TabView::Analytics {
                rows: &self.analytics,
            },
            Tab::Execution => TabView::Execution {
                pipeline_id: self.pipeline_id(),
                status: self.execution_status,
            },
        }
    }

    /// Mark a data source as selected
    ///
    /// Selection is informational only: it does not link the source to any
    /// version or step.
    pub fn select_data_source(&mut self, data_source_id: &str) -> Result<()> {
        let source = self
            .data_sources
            .iter()
            .find(|ds| ds.id == data_source_id)
            .ok_or_else(|| StoreError::DataSourceNotFound(data_source_id.to_string()))?;

        info!("Selected data source: {}", source);
        self.selected_data_source_id = Some(data_source_id.to_string());
        Ok(())
    }

    /// Record a status reported by the execution view
    pub fn set_execution_status(&mut self, status: ExecutionStatus) {
        self.execution_status = status;
        let message = format!("Execution {}", status);
        let notification = if status == ExecutionStatus::Completed {
            Notification::success(message)
        } else {
            Notification::error(message)
        };
        self.notify(notification);
    }

    pub fn set_analytics_data(&mut self, rows: Vec<JsonValue>) {
        self.analytics = rows;
    }
}
