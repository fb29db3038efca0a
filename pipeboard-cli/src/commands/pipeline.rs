//! Pipeline command handlers
//!
//! Shows a pipeline through one of the dashboard tabs and edits its
//! name and description.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use pipeboard_core::domain::data_source::DataSource;
use pipeboard_core::domain::pipeline::{Pipeline, Step, Version};
use pipeboard_editor::{ExecutionStatus, Tab, TabView};
use serde_json::Value as JsonValue;

use super::{open_session, save_session};
use crate::config::Config;

/// Pipeline subcommands
#[derive(Subcommand)]
pub enum PipelineCommands {
    /// Show a pipeline
    Show {
        /// Pipeline ID
        id: String,

        /// Version ID or number (defaults to the first version)
        #[arg(short, long)]
        version: Option<String>,

        /// View to render: steps, data-sources, analytics, execution
        #[arg(short, long, default_value = "steps")]
        tab: Tab,

        /// Data source to mark as selected in the data-sources view
        #[arg(long)]
        source: Option<String>,

        /// JSON file with analytics rows for the analytics view
        #[arg(long)]
        analytics: Option<String>,
    },
    /// Edit pipeline name and description, then save
    Edit {
        /// Pipeline ID
        id: String,

        /// New pipeline name
        #[arg(short, long)]
        name: Option<String>,

        /// New pipeline description
        #[arg(short, long)]
        description: Option<String>,
    },
}

/// Handle pipeline commands
pub async fn handle_pipeline_command(command: PipelineCommands, config: &Config) -> Result<()> {
    match command {
        PipelineCommands::Show {
            id,
            version,
            tab,
            source,
            analytics,
        } => show_pipeline(config, &id, version.as_deref(), tab, source, analytics).await,
        PipelineCommands::Edit {
            id,
            name,
            description,
        } => edit_pipeline(config, &id, name, description).await,
    }
}

/// Load a pipeline and render the requested tab
async fn show_pipeline(
    config: &Config,
    id: &str,
    version: Option<&str>,
    tab: Tab,
    source: Option<String>,
    analytics: Option<String>,
) -> Result<()> {
    let analytics_rows = match analytics {
        Some(path) => read_analytics(&path)?,
        None => Vec::new(),
    };

    let session = open_session(config, id, version).await?;

    session.update(|store| -> Result<()> {
        store.set_analytics_data(analytics_rows);
        if let Some(source) = &source {
            store.select_data_source(source)?;
        }
        store.select_tab(tab);
        Ok(())
    })?;

    session.read(|store| {
        if let Some(pipeline) = store.pipeline() {
            print_pipeline_header(pipeline, store.current_version_id());
        }
        print_tab_bar(store.active_tab());
        print_view(store.view());
    });

    Ok(())
}

/// Update name and/or description and save the pipeline
async fn edit_pipeline(
    config: &Config,
    id: &str,
    name: Option<String>,
    description: Option<String>,
) -> Result<()> {
    if name.is_none() && description.is_none() {
        anyhow::bail!("Nothing to edit: pass --name and/or --description");
    }

    let session = open_session(config, id, None).await?;

    session.update(|store| -> Result<()> {
        if let Some(name) = name {
            store.set_name(name)?;
        }
        if let Some(description) = description {
            store.set_description(description)?;
        }
        Ok(())
    })?;

    save_session(&session).await
}

/// Read analytics rows from a JSON array file
fn read_analytics(path: &str) -> Result<Vec<JsonValue>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read analytics file: {}", path))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Analytics file {} is not a JSON array", path))
}

/// Print pipeline identity and the version selector
fn print_pipeline_header(pipeline: &Pipeline, current_version_id: Option<&str>) {
    println!("{}", pipeline.name.bold());
    println!("  ID:          {}", pipeline.id.cyan());
    if let Some(desc) = pipeline.description().filter(|d| !d.is_empty()) {
        println!("  Description: {}", desc);
    }

    let versions = pipeline
        .versions()
        .iter()
        .map(|v| {
            let label = format!("Version {}", v.version_number);
            if Some(v.id.as_str()) == current_version_id {
                format!("[{}]", label).cyan().bold().to_string()
            } else {
                label.dimmed().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    if versions.is_empty() {
        println!("  Versions:    {}", "none".yellow());
    } else {
        println!("  Versions:    {}", versions);
    }
    println!();
}

fn print_tab_bar(active: Tab) {
    let tabs = Tab::ALL
        .iter()
        .map(|tab| {
            if *tab == active {
                format!("[{}]", tab.label()).bold().to_string()
            } else {
                tab.label().dimmed().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" │ ");
    println!("{}", tabs);
    println!("{}", "─".repeat(80).dimmed());
}

fn print_view(view: TabView<'_>) {
    match view {
        TabView::Steps { version, editing } => print_steps(version, editing),
        TabView::DataSources { sources, selected } => print_data_sources(sources, selected),
        TabView::Analytics { rows } => print_analytics(rows),
        TabView::Execution {
            pipeline_id,
            status,
        } => print_execution(pipeline_id, status),
    }
}

fn print_steps(version: Option<&Version>, editing: Option<&Step>) {
    let Some(version) = version else {
        println!("{}", "No version selected.".yellow());
        return;
    };

    if version.steps().is_empty() {
        println!("{}", "No steps in this version.".yellow());
        return;
    }

    for (index, step) in version.steps().iter().enumerate() {
        let marker = if editing.is_some_and(|e| e.id == step.id) {
            "✎".yellow()
        } else {
            "▸".cyan()
        };
        println!("  {} {}. {}", marker, index + 1, step.name.bold());
        println!("    ID:     {}", step.id.dimmed());
        println!("    Type:   {}", step.step_type);
        println!("    Order:  {}", step.order.to_string().dimmed());
        if let Some(desc) = step.description().filter(|d| !d.is_empty()) {
            println!("    About:  {}", desc.dimmed());
        }
        let config = step
            .config()
            .filter(|c| c.as_object().is_none_or(|o| !o.is_empty()));
        if let Some(config) = config {
            println!("    Config: {}", config.to_string().dimmed());
        }
        println!();
    }
}

fn print_data_sources(sources: &[DataSource], selected: Option<&DataSource>) {
    if sources.is_empty() {
        println!("{}", "No data sources found.".yellow());
        return;
    }

    for source in sources {
        let marker = if selected.is_some_and(|s| s.id == source.id) {
            "●".green()
        } else {
            "○".dimmed()
        };
        println!(
            "  {} {} {} {}",
            marker,
            source.name.bold(),
            format!("[{}]", source.source_type).cyan(),
            source.id.dimmed()
        );
    }
}

fn print_analytics(rows: &[JsonValue]) {
    if rows.is_empty() {
        println!("{}", "No analytics data available.".yellow());
        return;
    }

    for row in rows {
        println!("  {}", row);
    }
}

fn print_execution(pipeline_id: Option<&str>, status: ExecutionStatus) {
    println!("  Pipeline: {}", pipeline_id.unwrap_or("-").cyan());
    let status_text = status.to_string();
    let status_text = match status {
        ExecutionStatus::Idle => status_text.dimmed(),
        ExecutionStatus::Running => status_text.yellow(),
        ExecutionStatus::Completed => status_text.green(),
        ExecutionStatus::Error => status_text.red(),
    };
    println!("  Status:   {}", status_text);
}
