//! `invoke` command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use aws_lambda_events::event::sqs::SqsEvent;
use config_loader::ConfigLoader;
use contracts::SinkKind;
use tracing::info;

use crate::cli::InvokeArgs;
use crate::error::CliError;
use crate::handler::RelayHandler;
use crate::settings::load_config;

/// Execute the `invoke` command
pub async fn run_invoke(args: &InvokeArgs) -> Result<()> {
    let mut config = load_config(&args.config).context("Failed to load configuration")?;
    if args.dry_run {
        info!("Dry run mode - records will be logged, not sent");
        config.sink.kind = SinkKind::Log;
    }
    ConfigLoader::validate(&config).context("Invalid configuration")?;

    let event = read_event(&args.event)?;
    info!(
        event = %args.event.display(),
        messages = event.records.len(),
        "Event loaded"
    );

    let dispatcher =
        dispatcher::create_dispatcher(&config).context("Failed to create dispatcher")?;
    let handler = RelayHandler::new(dispatcher);

    let summary = handler
        .handle(event)
        .await
        .context("Batch aborted by a message that failed to decode")?;

    println!("{}", summary);
    Ok(())
}

fn read_event(path: &Path) -> Result<SqsEvent, CliError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::event_parse(path.display().to_string(), e.to_string()))?;
    serde_json::from_str(&content)
        .map_err(|e| CliError::event_parse(path.display().to_string(), e.to_string()))
}
