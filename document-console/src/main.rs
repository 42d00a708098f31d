use clap::Parser;
use console_core::observability::init_tracing;
use document_console::config::{get_configuration, get_configuration_from};

mod cli;
mod commands;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let configuration = match cli.config_dir.as_deref() {
        Some(directory) => get_configuration_from(directory),
        None => get_configuration(),
    }
    .map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "document-console",
        &configuration.logging.level,
        configuration.logging.otlp_endpoint.as_deref(),
    )?;

    let client = commands::build_client(&configuration)?;
    tracing::debug!(base_url = %client.base_url(), "Document API client ready");

    match cli.command {
        Command::List(args) => commands::run_list(&configuration, client, args).await,
        Command::Open(args) => commands::run_open(client, args).await,
        Command::Batch(args) => commands::run_batch(&configuration, client, args).await,
        Command::Findings(args) => commands::run_findings(client, args).await,
        Command::FindingCreate(args) => commands::run_finding_create(client, args).await,
        Command::FindingStatus(args) => commands::run_finding_status(client, args).await,
        Command::Comments(args) => commands::run_comments(client, args).await,
        Command::Comment(args) => commands::run_comment(client, args).await,
        Command::Meetings(args) => commands::run_meetings(client, args).await,
        Command::MeetingSchedule(args) => commands::run_meeting_schedule(client, args).await,
        Command::Stats => commands::run_stats(client).await,
    }
    .map_err(|e| {
        tracing::error!(error = %e, "Command failed");
        e
    })
}
