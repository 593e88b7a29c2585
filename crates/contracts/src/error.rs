//! Layered error definitions
//!
//! Categorized by how they propagate:
//! - [`DecodeError`]: recoverable, returned as the batch result
//! - [`DeliveryError`]: unrecoverable, escalated to process termination
//! - [`ContractError`]: bootstrap failures (config / sink construction)

use thiserror::Error;

/// Bootstrap error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Sink Errors =====
    /// Sink could not be constructed
    #[error("sink '{sink_name}' setup error: {message}")]
    SinkSetup { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create sink setup error
    pub fn sink_setup(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkSetup {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }
}

/// A message body that is not a valid record.
///
/// Aborts the batch: no further messages are decoded and the error becomes
/// the invocation result.
#[derive(Debug, Error)]
#[error("failed to decode message body at index {index}{}: {source}", fmt_message_id(.message_id))]
pub struct DecodeError {
    /// Zero-based position of the message in its batch
    pub index: usize,
    /// Queue-assigned message id, when known
    pub message_id: Option<String>,
    #[source]
    pub source: serde_json::Error,
}

fn fmt_message_id(message_id: &Option<String>) -> String {
    match message_id {
        Some(id) => format!(" (message_id={id})"),
        None => String::new(),
    }
}

/// Failure while delivering one record.
///
/// Never reported through the batch result. Every variant is handed to the
/// dispatcher's fatal handler, which terminates the process.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Record could not be serialized for transmission
    #[error("failed to serialize record '{record_id}': {source}")]
    Serialization {
        record_id: String,
        #[source]
        source: serde_json::Error,
    },

    /// Request could not be sent or no response arrived
    #[error("sink '{sink_name}' transport error: {message}")]
    Transport { sink_name: String, message: String },

    /// Response arrived but its body could not be read
    #[error("sink '{sink_name}' response body error: {message}")]
    ResponseBody { sink_name: String, message: String },
}

impl DeliveryError {
    /// Create transport error
    pub fn transport(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Create response body error
    pub fn response_body(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ResponseBody {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("not-json").unwrap_err()
    }

    #[test]
    fn test_decode_error_names_index() {
        let err = DecodeError {
            index: 3,
            message_id: None,
            source: json_error(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("failed to decode message body at index 3: "));
    }

    #[test]
    fn test_decode_error_names_message_id() {
        let err = DecodeError {
            index: 0,
            message_id: Some("abc-123".to_string()),
            source: json_error(),
        };
        assert!(err.to_string().contains("(message_id=abc-123)"));
    }

    #[test]
    fn test_delivery_error_display() {
        let err = DeliveryError::transport("intercom", "connection refused");
        assert_eq!(
            err.to_string(),
            "sink 'intercom' transport error: connection refused"
        );
    }
}
