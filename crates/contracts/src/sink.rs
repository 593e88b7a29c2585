//! NotificationSink trait - Dispatch Task output interface
//!
//! Defines the abstract interface for Sinks.

use std::borrow::Cow;

use bytes::Bytes;

use crate::DeliveryError;

/// Fully-read response of one delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkResponse {
    /// HTTP-style status code
    pub status: u16,
    /// Response body
    pub body: Bytes,
}

impl SinkResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, replacing invalid UTF-8
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Notification output trait
///
/// One call delivers one serialized record. Implementations are shared by
/// every dispatch task of a batch, so `send` takes `&self`.
#[trait_variant::make(NotificationSink: Send)]
pub trait LocalNotificationSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Deliver a serialized record and read the whole response
    ///
    /// # Errors
    /// Transport or response-read failure. Non-2xx statuses are not errors.
    async fn send(&self, body: Vec<u8>) -> Result<SinkResponse, DeliveryError>;
}
