//! SQS event handler wrapped around the batch dispatcher.

use std::time::Instant;

use aws_lambda_events::event::sqs::{SqsEvent, SqsMessage};
use contracts::{BatchSummary, DecodeError, NotificationSink, RawMessage};
use dispatcher::{BatchDispatcher, FatalHandler, ProcessExit};
use observability::DeliveryTotals;
use tracing::{info, instrument};

/// Handles one SQS event per invocation
pub struct RelayHandler<S, F = ProcessExit> {
    dispatcher: BatchDispatcher<S, F>,
}

impl<S, F> RelayHandler<S, F>
where
    S: NotificationSink + Sync + 'static,
    F: FatalHandler,
{
    pub fn new(dispatcher: BatchDispatcher<S, F>) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &BatchDispatcher<S, F> {
        &self.dispatcher
    }

    /// Dispatch every message of the event and summarize the batch
    #[instrument(name = "relay_handle", skip(self, event))]
    pub async fn handle(&self, event: SqsEvent) -> Result<BatchSummary, DecodeError> {
        info!(messages = event.records.len(), "Got messages");
        observability::record_batch_received(event.records.len());

        let batch: Vec<RawMessage> = event.records.into_iter().map(raw_message).collect();

        let started = Instant::now();
        let result = self.dispatcher.dispatch(&batch).await;
        observability::record_batch_result(
            result.as_ref(),
            started.elapsed().as_secs_f64() * 1000.0,
        );

        let snapshot = self.dispatcher.metrics();
        observability::record_delivery_totals(
            self.dispatcher.sink_name(),
            DeliveryTotals {
                delivered: snapshot.delivered_count,
                rejected: snapshot.rejected_count,
                in_flight: snapshot.in_flight,
            },
        );

        result
    }
}

/// A record without a body decodes as an empty string, which fails
fn raw_message(message: SqsMessage) -> RawMessage {
    RawMessage {
        message_id: message.message_id,
        body: message.body.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatcher::{DispatcherBuilder, LogSink};

    fn event(bodies: &[Option<&str>]) -> SqsEvent {
        let records: Vec<serde_json::Value> = bodies
            .iter()
            .enumerate()
            .map(|(i, body)| {
                serde_json::json!({
                    "messageId": format!("m-{i}"),
                    "body": body,
                })
            })
            .collect();
        serde_json::from_value(serde_json::json!({ "Records": records })).unwrap()
    }

    fn handler() -> RelayHandler<LogSink> {
        RelayHandler::new(DispatcherBuilder::new(LogSink::new("log")).build().unwrap())
    }

    #[tokio::test]
    async fn test_handle_counts_messages() {
        let handler = handler();
        let summary = handler
            .handle(event(&[
                Some(r#"{"id":"1","title":"a"}"#),
                Some(r#"{"id":"2","title":"b"}"#),
            ]))
            .await
            .unwrap();
        assert_eq!(summary.to_string(), "Processed 2 messages.");
        assert_eq!(handler.dispatcher().metrics().delivered_count, 2);
    }

    #[tokio::test]
    async fn test_handle_empty_event() {
        let summary = handler().handle(event(&[])).await.unwrap();
        assert_eq!(summary.processed, 0);
    }

    #[tokio::test]
    async fn test_handle_reports_message_id_of_bad_body() {
        let err = handler()
            .handle(event(&[Some(r#"{"id":"1","title":"a"}"#), Some("not-json")]))
            .await
            .unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.message_id.as_deref(), Some("m-1"));
    }

    #[tokio::test]
    async fn test_missing_body_fails_to_decode() {
        let err = handler().handle(event(&[None])).await.unwrap_err();
        assert_eq!(err.index, 0);
    }
}
