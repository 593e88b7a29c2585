//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Event file could not be parsed as an SQS event
    #[error("Failed to parse SQS event from {path}: {message}")]
    EventParse { path: String, message: String },

    /// Configuration error
    #[error(transparent)]
    Config(#[from] contracts::ContractError),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn event_parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EventParse {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
