//! `serve` command implementation.

use std::sync::Arc;

use anyhow::{Context, Result};
use aws_lambda_events::event::sqs::SqsEvent;
use lambda_runtime::{service_fn, LambdaEvent};
use tracing::info;

use crate::cli::ServeArgs;
use crate::handler::RelayHandler;
use crate::settings::resolve_config;

/// Execute the `serve` command
///
/// Blocks in the Lambda runtime loop until the runtime API goes away.
pub async fn run_serve(args: &ServeArgs) -> Result<()> {
    let config = resolve_config(&args.config).context("Failed to resolve configuration")?;

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let dispatcher =
        dispatcher::create_dispatcher(&config).context("Failed to create dispatcher")?;

    info!(
        sink = %dispatcher.sink_name(),
        endpoint = ?config.sink.endpoint,
        max_in_flight = ?config.dispatch.max_in_flight,
        "Starting Lambda runtime"
    );

    let handler = Arc::new(RelayHandler::new(dispatcher));

    lambda_runtime::run(service_fn(move |event: LambdaEvent<SqsEvent>| {
        let handler = Arc::clone(&handler);
        async move {
            handler
                .handle(event.payload)
                .await
                .map(|summary| summary.to_string())
                .map_err(lambda_runtime::Error::from)
        }
    }))
    .await
    .map_err(|e| anyhow::anyhow!("Lambda runtime failed: {e}"))
}
