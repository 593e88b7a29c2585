//! BatchDispatcher - decode loop and fan-out/fan-in for one batch

use std::sync::Arc;
use std::time::Instant;

use contracts::{
    BatchSummary, ContractError, DecodeError, DispatchSettings, NotificationSink, RawMessage,
    Record, RelayConfig,
};
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use crate::barrier::CompletionBarrier;
use crate::error::DispatcherError;
use crate::fatal::{FatalHandler, ProcessExit};
use crate::metrics::{DispatchMetrics, MetricsSnapshot};
use crate::sinks::ConfiguredSink;
use crate::task::DispatchTask;

/// Dispatcher configuration
#[derive(Debug, Clone, Default)]
pub struct DispatcherConfig {
    /// Cap on concurrent sink calls within a batch (None = unbounded)
    pub max_in_flight: Option<usize>,
}

impl From<&DispatchSettings> for DispatcherConfig {
    fn from(settings: &DispatchSettings) -> Self {
        Self {
            max_in_flight: settings.max_in_flight,
        }
    }
}

/// Builder for creating a BatchDispatcher
pub struct DispatcherBuilder<S, F = ProcessExit> {
    config: DispatcherConfig,
    sink: S,
    fatal: F,
}

impl<S> DispatcherBuilder<S, ProcessExit>
where
    S: NotificationSink + Sync + 'static,
{
    /// Create a builder that exits the process on delivery failure
    pub fn new(sink: S) -> Self {
        Self {
            config: DispatcherConfig::default(),
            sink,
            fatal: ProcessExit::default(),
        }
    }
}

impl<S, F> DispatcherBuilder<S, F>
where
    S: NotificationSink + Sync + 'static,
    F: FatalHandler,
{
    pub fn config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_in_flight(mut self, limit: usize) -> Self {
        self.config.max_in_flight = Some(limit);
        self
    }

    /// Replace the fatal handler
    pub fn fatal_handler<G: FatalHandler>(self, fatal: G) -> DispatcherBuilder<S, G> {
        DispatcherBuilder {
            config: self.config,
            sink: self.sink,
            fatal,
        }
    }

    #[instrument(name = "dispatcher_builder_build", skip(self))]
    pub fn build(self) -> Result<BatchDispatcher<S, F>, DispatcherError> {
        match self.config.max_in_flight {
            Some(0) => {
                return Err(DispatcherError::InvalidConfig {
                    message: "max_in_flight must be > 0".to_string(),
                })
            }
            Some(limit) if limit > Semaphore::MAX_PERMITS => {
                return Err(DispatcherError::InvalidConfig {
                    message: format!(
                        "max_in_flight must be <= {}, got {limit}",
                        Semaphore::MAX_PERMITS
                    ),
                })
            }
            _ => {}
        }

        debug!(
            sink = %self.sink.name(),
            max_in_flight = ?self.config.max_in_flight,
            "Dispatcher built"
        );

        Ok(BatchDispatcher {
            sink: Arc::new(self.sink),
            fatal: Arc::new(self.fatal),
            config: self.config,
            metrics: Arc::new(DispatchMetrics::new()),
        })
    }
}

/// Fans a batch of messages out to the sink
///
/// One dispatcher serves many batches; each `dispatch` call gets its own
/// completion barrier and admission semaphore.
pub struct BatchDispatcher<S, F = ProcessExit> {
    sink: Arc<S>,
    fatal: Arc<F>,
    config: DispatcherConfig,
    metrics: Arc<DispatchMetrics>,
}

impl<S, F> BatchDispatcher<S, F>
where
    S: NotificationSink + Sync + 'static,
    F: FatalHandler,
{
    /// Sink name
    pub fn sink_name(&self) -> &str {
        self.sink.name()
    }

    /// Get cumulative metrics
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Decode every message and deliver the records concurrently.
    ///
    /// Messages are decoded in order; each decoded record is handed to its
    /// own task right away. Once all are launched, waits for every task to
    /// finish and reports how many messages decoded.
    ///
    /// The first decode failure is returned immediately. Tasks launched for
    /// earlier messages are neither awaited nor cancelled: they keep running
    /// detached, and a delivery failure among them still ends the process.
    #[instrument(
        name = "dispatcher_dispatch",
        skip(self, batch),
        fields(sink = %self.sink.name(), batch_size = batch.len())
    )]
    pub async fn dispatch(&self, batch: &[RawMessage]) -> Result<BatchSummary, DecodeError> {
        let started = Instant::now();
        self.metrics.inc_batch_count();

        let barrier = CompletionBarrier::new();
        let admission = self
            .config
            .max_in_flight
            .map(|limit| Arc::new(Semaphore::new(limit)));

        let mut processed = 0usize;

        for (index, message) in batch.iter().enumerate() {
            let record = match Record::decode(message, index) {
                Ok(record) => record,
                Err(e) => {
                    self.metrics.inc_decode_failure_count();
                    warn!(
                        index,
                        message_id = ?e.message_id,
                        abandoned = barrier.pending(),
                        error = %e,
                        "Decode failed, returning without waiting for launched tasks"
                    );
                    return Err(e);
                }
            };

            self.metrics.inc_decoded_count();
            self.launch(index, record, admission.clone(), &barrier);
            processed += 1;
        }

        barrier.wait().await;

        let summary = BatchSummary::new(processed);
        info!(
            processed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Batch complete"
        );
        Ok(summary)
    }

    fn launch(
        &self,
        index: usize,
        record: Record,
        admission: Option<Arc<Semaphore>>,
        barrier: &CompletionBarrier,
    ) {
        let task = DispatchTask::new(
            index,
            record,
            Arc::clone(&self.sink),
            Arc::clone(&self.fatal),
            admission,
            Arc::clone(&self.metrics),
            barrier.enter(),
        );
        // Detached: completion is observed through the barrier only
        drop(task.spawn());
    }
}

/// Convenience function to create a dispatcher from relay configuration
#[instrument(name = "dispatcher_create", skip(config))]
pub fn create_dispatcher(
    config: &RelayConfig,
) -> Result<BatchDispatcher<ConfiguredSink>, DispatcherError> {
    let sink = ConfiguredSink::from_settings(&config.sink).map_err(|e| match e {
        ContractError::SinkSetup { sink_name, message } => {
            DispatcherError::sink_creation(sink_name, message)
        }
        other => DispatcherError::Contract(other),
    })?;

    DispatcherBuilder::new(sink)
        .config(DispatcherConfig::from(&config.dispatch))
        .build()
}
