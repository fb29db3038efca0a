//! Editor error types

use pipeboard_client::ClientError;
use thiserror::Error;

/// Reasons a store operation was refused
///
/// The store never ignores a bad request: each variant leaves the state
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no pipeline is loaded")]
    NoPipelineLoaded,

    #[error("no version is selected")]
    NoCurrentVersion,

    #[error("version {0} not found")]
    VersionNotFound(String),

    #[error("replacement version {found} does not match current version {expected}")]
    VersionIdMismatch { expected: String, found: String },

    #[error("step {0} not found in the current version")]
    StepNotFound(String),

    #[error("data source {0} not found")]
    DataSourceNotFound(String),

    #[error("load #{ticket} was superseded by load #{latest}")]
    StaleLoad { ticket: u64, latest: u64 },
}

/// Errors returned by session operations that talk to the backend
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to load pipeline data: {0}")]
    Load(#[source] ClientError),

    #[error("failed to save pipeline: {0}")]
    Save(#[source] ClientError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionError {
    /// The backend error behind a failed load or save
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            Self::Load(e) | Self::Save(e) => Some(e),
            Self::Store(_) => None,
        }
    }
}
