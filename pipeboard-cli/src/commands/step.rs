//! Step command handlers
//!
//! Adds, edits and removes steps in one version of a pipeline. Every command
//! loads the pipeline, applies the edit through the editor store and saves
//! the whole document back.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::*;
use pipeboard_core::domain::pipeline::Step;
use pipeboard_core::dto::step::StepPatch;
use pipeboard_editor::Session;
use serde_json::Value as JsonValue;

use super::{open_session, print_notification, save_session};
use crate::config::Config;
use crate::id_resolver::resolve_step_id;

/// Step subcommands
#[derive(Subcommand)]
pub enum StepCommands {
    /// Append a new step to a version
    Add {
        /// Pipeline ID
        pipeline: String,

        /// Version ID or number (defaults to the first version)
        #[arg(short, long)]
        version: Option<String>,

        #[command(flatten)]
        fields: StepFields,
    },
    /// Edit an existing step
    Update {
        /// Pipeline ID
        pipeline: String,

        /// Step ID or unambiguous prefix
        step: String,

        /// Version ID or number (defaults to the first version)
        #[arg(short, long)]
        version: Option<String>,

        #[command(flatten)]
        fields: StepFields,
    },
    /// Remove a step
    Delete {
        /// Pipeline ID
        pipeline: String,

        /// Step ID or unambiguous prefix
        step: String,

        /// Version ID or number (defaults to the first version)
        #[arg(short, long)]
        version: Option<String>,
    },
}

/// Editable step fields
#[derive(Args)]
pub struct StepFields {
    /// Step name
    #[arg(short, long)]
    name: Option<String>,

    /// Step type
    #[arg(short = 't', long = "type")]
    step_type: Option<String>,

    /// Step description
    #[arg(short, long)]
    description: Option<String>,

    /// Step configuration as a JSON document
    #[arg(short, long, value_parser = parse_json)]
    config: Option<JsonValue>,
}

impl From<StepFields> for StepPatch {
    fn from(fields: StepFields) -> Self {
        StepPatch {
            name: fields.name,
            step_type: fields.step_type,
            description: fields.description,
            config: fields.config,
        }
    }
}

/// Parse a JSON argument
fn parse_json(s: &str) -> Result<JsonValue> {
    serde_json::from_str(s).with_context(|| format!("invalid JSON: `{}`", s))
}

/// Handle step commands
pub async fn handle_step_command(command: StepCommands, config: &Config) -> Result<()> {
    match command {
        StepCommands::Add {
            pipeline,
            version,
            fields,
        } => add_step(config, &pipeline, version.as_deref(), fields.into()).await,
        StepCommands::Update {
            pipeline,
            step,
            version,
            fields,
        } => update_step(config, &pipeline, &step, version.as_deref(), fields.into()).await,
        StepCommands::Delete {
            pipeline,
            step,
            version,
        } => delete_step(config, &pipeline, &step, version.as_deref()).await,
    }
}

/// Add a default step, fill in any provided fields, and save
async fn add_step(
    config: &Config,
    pipeline_id: &str,
    version: Option<&str>,
    patch: StepPatch,
) -> Result<()> {
    let session = open_session(config, pipeline_id, version).await?;

    let step = session.update(|store| -> Result<Step> {
        let step = store.add_step()?;
        if patch.is_empty() {
            store.close_step_editor();
            return Ok(step);
        }
        let edited = patch.apply(&step);
        store.update_step(edited.clone())?;
        Ok(edited)
    })?;
    print_notification(&session);

    save_session(&session).await?;
    print_step(&step);

    Ok(())
}

/// Apply field edits to an existing step and save
async fn update_step(
    config: &Config,
    pipeline_id: &str,
    step: &str,
    version: Option<&str>,
    patch: StepPatch,
) -> Result<()> {
    if patch.is_empty() {
        anyhow::bail!("Nothing to update: pass at least one of --name, --type, --description, --config");
    }

    let session = open_session(config, pipeline_id, version).await?;
    let step_id = resolve_in_current_version(&session, step)?;

    let edited = session.update(|store| -> Result<Step> {
        store.open_step(&step_id)?;
        let current = store
            .editing_step()
            .cloned()
            .context("Step editor did not open")?;
        let edited = patch.apply(&current);
        store.update_step(edited.clone())?;
        Ok(edited)
    })?;
    print_notification(&session);

    save_session(&session).await?;
    print_step(&edited);

    Ok(())
}

/// Remove a step and save
async fn delete_step(
    config: &Config,
    pipeline_id: &str,
    step: &str,
    version: Option<&str>,
) -> Result<()> {
    let session = open_session(config, pipeline_id, version).await?;
    let step_id = resolve_in_current_version(&session, step)?;

    let removed = session.update(|store| store.delete_step(&step_id))?;
    print_notification(&session);

    save_session(&session).await?;
    println!("  Removed: {} {}", removed.name.bold(), removed.id.dimmed());

    Ok(())
}

fn resolve_in_current_version(session: &Session, step: &str) -> Result<String> {
    session.read(|store| {
        let version = store
            .current_version()
            .context("Pipeline has no version to edit")?;
        resolve_step_id(version, step)
    })
}

fn print_step(step: &Step) {
    println!("  ID:     {}", step.id.cyan());
    println!("  Name:   {}", step.name.bold());
    println!("  Type:   {}", step.step_type);
    println!("  Order:  {}", step.order);
    if let Some(config) = step.config() {
        println!("  Config: {}", config.to_string().dimmed());
    }
}
