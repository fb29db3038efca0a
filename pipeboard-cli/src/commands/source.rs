//! Data source command handlers

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;

use crate::config::Config;

/// Data source subcommands
#[derive(Subcommand)]
pub enum SourceCommands {
    /// List all data sources
    List,
}

/// Handle data source commands
pub async fn handle_source_command(command: SourceCommands, config: &Config) -> Result<()> {
    let client = config.client()?;

    match command {
        SourceCommands::List => {
            let sources = client
                .list_data_sources()
                .await
                .context("Failed to fetch data sources")?;

            if sources.is_empty() {
                println!("{}", "No data sources found.".yellow());
                return Ok(());
            }

            println!("{}", format!("Found {} data source(s):", sources.len()).bold());
            println!();
            for source in sources {
                println!("  {} {}", "▸".cyan(), source.name.bold());
                println!("    ID:   {}", source.id.dimmed());
                println!("    Type: {}", source.source_type);
            }
        }
    }

    Ok(())
}
