//! DispatchTask - delivers one record to the sink

use std::sync::Arc;

use contracts::{NotificationSink, Record, SinkResponse};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::barrier::CompletionGuard;
use crate::fatal::FatalHandler;
use crate::metrics::DispatchMetrics;

/// Per-task bookkeeping released on every exit path
struct TaskSlot {
    metrics: Arc<DispatchMetrics>,
    _completion: CompletionGuard,
}

impl TaskSlot {
    fn new(metrics: Arc<DispatchMetrics>, completion: CompletionGuard) -> Self {
        metrics.task_started();
        Self {
            metrics,
            _completion: completion,
        }
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        self.metrics.task_finished();
        // `_completion` drops after this, signalling the barrier
    }
}

/// One in-flight delivery
pub struct DispatchTask<S, F> {
    index: usize,
    record: Record,
    sink: Arc<S>,
    fatal: Arc<F>,
    admission: Option<Arc<Semaphore>>,
    slot: TaskSlot,
}

impl<S, F> DispatchTask<S, F>
where
    S: NotificationSink + Sync + 'static,
    F: FatalHandler,
{
    pub(crate) fn new(
        index: usize,
        record: Record,
        sink: Arc<S>,
        fatal: Arc<F>,
        admission: Option<Arc<Semaphore>>,
        metrics: Arc<DispatchMetrics>,
        completion: CompletionGuard,
    ) -> Self {
        Self {
            index,
            record,
            sink,
            fatal,
            admission,
            slot: TaskSlot::new(metrics, completion),
        }
    }

    /// Run detached on the tokio runtime
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Serialize, send, report.
    ///
    /// Serialization and transport failures go to the fatal handler.
    #[instrument(
        name = "dispatch_task",
        skip(self),
        fields(index = self.index, record_id = %self.record.id, sink = %self.sink.name())
    )]
    pub async fn run(self) {
        let Self {
            record,
            sink,
            fatal,
            admission,
            slot,
            ..
        } = self;
        let metrics = Arc::clone(&slot.metrics);
        let _slot = slot;

        // The semaphore is never closed, so acquiring cannot fail
        let _permit = match admission {
            Some(semaphore) => semaphore.acquire_owned().await.ok(),
            None => None,
        };

        let body = match record.to_wire() {
            Ok(body) => body,
            Err(e) => {
                metrics.inc_failure_count();
                fatal.escalate(e)
            }
        };

        debug!(bytes = body.len(), "Sending record");

        match sink.send(body).await {
            Ok(response) => report(&response, &metrics),
            Err(e) => {
                metrics.inc_failure_count();
                fatal.escalate(e)
            }
        }
    }
}

fn report(response: &SinkResponse, metrics: &DispatchMetrics) {
    if response.is_success() {
        metrics.inc_delivered_count();
        info!(
            status = response.status,
            body = %response.body_text(),
            "Sink accepted record"
        );
    } else {
        metrics.inc_rejected_count();
        warn!(
            status = response.status,
            body = %response.body_text(),
            "Sink answered with non-success status"
        );
    }
}
