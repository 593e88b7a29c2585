//! LogSink - logs records via tracing instead of sending them

use contracts::{DeliveryError, NotificationSink, SinkResponse};
use tracing::{info, instrument};

/// Sink that logs record bodies for dry runs
pub struct LogSink {
    name: String,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl NotificationSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "log_sink_send", skip(self, body), fields(sink = %self.name))]
    async fn send(&self, body: Vec<u8>) -> Result<SinkResponse, DeliveryError> {
        info!(
            sink = %self.name,
            body = %String::from_utf8_lossy(&body),
            "Record received"
        );
        Ok(SinkResponse::new(200, ""))
    }
}
