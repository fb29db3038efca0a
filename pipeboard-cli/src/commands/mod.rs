//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod pipeline;
mod source;
mod step;

pub use pipeline::PipelineCommands;
pub use source::SourceCommands;
pub use step::StepCommands;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use pipeboard_editor::{Notification, Session, SessionError};
use std::sync::Arc;

use crate::config::Config;
use crate::id_resolver::resolve_version_id;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Pipeline inspection and metadata edits
    Pipeline {
        #[command(subcommand)]
        command: PipelineCommands,
    },
    /// Step editing within a pipeline version
    Step {
        #[command(subcommand)]
        command: StepCommands,
    },
    /// Data source registry
    Source {
        #[command(subcommand)]
        command: SourceCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Pipeline { command } => pipeline::handle_pipeline_command(command, config).await,
        Commands::Step { command } => step::handle_step_command(command, config).await,
        Commands::Source { command } => source::handle_source_command(command, config).await,
    }
}

/// Load a pipeline into a fresh session and select the requested version
///
/// Without `version`, the first version stays selected.
async fn open_session(config: &Config, pipeline_id: &str, version: Option<&str>) -> Result<Session> {
    let session = Session::new(Arc::new(config.client()?));

    let loaded = session.load(pipeline_id).await;
    print_notification(&session);
    if let Err(e) = loaded {
        let message = with_hint(format!("Failed to load pipeline {}", pipeline_id), &e);
        return Err(anyhow::Error::new(e).context(message));
    }

    if let Some(version) = version {
        let version_id = session.read(|store| {
            let pipeline = store
                .pipeline()
                .context("Pipeline disappeared from the session")?;
            resolve_version_id(pipeline, version)
        })?;
        session.update(|store| store.select_version(&version_id))?;
    }

    Ok(session)
}

/// Save the session's pipeline and report the outcome
async fn save_session(session: &Session) -> Result<()> {
    let saved = session.save().await;
    print_notification(session);
    saved.map_err(|e| {
        let message = with_hint("Failed to save pipeline".to_string(), &e);
        anyhow::Error::new(e).context(message)
    })
}

/// Append a short explanation of a backend failure to `message`
fn with_hint(message: String, error: &SessionError) -> String {
    let Some(client_error) = error.client_error() else {
        return message;
    };

    let hint = if client_error.is_not_found() {
        "no such pipeline on the backend"
    } else if client_error.is_client_error() {
        "the backend rejected the request"
    } else if client_error.is_server_error() {
        "the backend failed, try again later"
    } else {
        return message;
    };
    format!("{} ({})", message, hint)
}

/// Print and consume the pending notification, if any
fn print_notification(session: &Session) {
    if let Some(notification) = session.update(|store| store.take_notification()) {
        println!("{}", format_notification(&notification));
    }
}

fn format_notification(notification: &Notification) -> ColoredString {
    if notification.is_error() {
        format!("✗ {}", notification.message).red().bold()
    } else {
        format!("✓ {}", notification.message).green().bold()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeboard_client::ClientError;
    use pipeboard_editor::StoreError;

    #[test]
    fn test_with_hint_classifies_backend_errors() {
        let missing = SessionError::Load(ClientError::NotFound("pipeline p9".to_string()));
        assert_eq!(
            with_hint("Failed".to_string(), &missing),
            "Failed (no such pipeline on the backend)"
        );

        let rejected = SessionError::Save(ClientError::api_error(422, "bad step"));
        assert_eq!(
            with_hint("Failed".to_string(), &rejected),
            "Failed (the backend rejected the request)"
        );

        let down = SessionError::Save(ClientError::api_error(503, "maintenance"));
        assert!(with_hint("Failed".to_string(), &down).ends_with("try again later)"));

        let parse = SessionError::Load(ClientError::ParseError("bad json".to_string()));
        assert_eq!(with_hint("Failed".to_string(), &parse), "Failed");

        let store = SessionError::Store(StoreError::NoPipelineLoaded);
        assert_eq!(with_hint("Failed".to_string(), &store), "Failed");
    }
}
