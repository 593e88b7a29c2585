//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// SQS Relay - forwards queued messages to an HTTP notification sink
#[derive(Parser, Debug)]
#[command(
    name = "sqs-relay",
    author,
    version,
    about = "Relay SQS messages to an HTTP notification sink",
    long_about = "Decodes each message of an SQS batch and POSTs it, concurrently, \n\
                  to a configured HTTP endpoint. Runs as an AWS Lambda handler \n\
                  or against a local event file."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SQS_RELAY_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "json",
        global = true,
        env = "SQS_RELAY_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run as an AWS Lambda function handling SQS events
    Serve(ServeArgs),

    /// Handle one SQS event read from a file
    Invoke(InvokeArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),
}

/// Configuration sources shared by `serve` and `invoke`
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, env = "SQS_RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the sink endpoint URL
    #[arg(long, env = "SQS_RELAY_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Override the per-request timeout in seconds
    #[arg(long, env = "SQS_RELAY_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Override the cap on concurrent sink calls per batch
    #[arg(long, env = "SQS_RELAY_MAX_IN_FLIGHT")]
    pub max_in_flight: Option<usize>,
}

/// Arguments for the `serve` command
#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "SQS_RELAY_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `invoke` command
#[derive(Parser, Debug, Clone)]
pub struct InvokeArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Path to an SQS event JSON document
    #[arg(short, long)]
    pub event: PathBuf,

    /// Log records instead of sending them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "relay.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    #[default]
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
