//! Pipeboard CLI
//!
//! Command-line front end for the pipeline dashboard: inspect pipelines,
//! edit their steps and save them back to the backend.

mod commands;
mod config;
mod id_resolver;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pipeboard")]
#[command(about = "Pipeline builder dashboard CLI", long_about = None)]
struct Cli {
    /// Backend API URL
    #[arg(long, env = "PIPEBOARD_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "PIPEBOARD_TIMEOUT", default_value = "30")]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "pipeboard_cli=warn,pipeboard_editor=warn,pipeboard_client=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::new(cli.api_url, Duration::from_secs(cli.timeout));
    config.validate()?;

    handle_command(cli.command, &config).await
}
