//! Dispatch metrics for observability

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Cumulative counters for one dispatcher
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Batches handed to the dispatcher
    batch_count: AtomicU64,
    /// Messages that decoded into records
    decoded_count: AtomicU64,
    /// Batches aborted by a decode failure
    decode_failure_count: AtomicU64,
    /// Records the sink accepted with a 2xx status
    delivered_count: AtomicU64,
    /// Records answered with a non-2xx status
    rejected_count: AtomicU64,
    /// Records that failed fatally
    failure_count: AtomicU64,
    /// Tasks spawned but not yet finished
    in_flight: AtomicUsize,
}

impl DispatchMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batch_count(&self) -> u64 {
        self.batch_count.load(Ordering::Relaxed)
    }

    pub fn inc_batch_count(&self) {
        self.batch_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn decoded_count(&self) -> u64 {
        self.decoded_count.load(Ordering::Relaxed)
    }

    pub fn inc_decoded_count(&self) {
        self.decoded_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn decode_failure_count(&self) -> u64 {
        self.decode_failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_decode_failure_count(&self) {
        self.decode_failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn delivered_count(&self) -> u64 {
        self.delivered_count.load(Ordering::Relaxed)
    }

    pub fn inc_delivered_count(&self) {
        self.delivered_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn rejected_count(&self) -> u64 {
        self.rejected_count.load(Ordering::Relaxed)
    }

    pub fn inc_rejected_count(&self) {
        self.rejected_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    pub fn task_started(&self) {
        self.in_flight.fetch_add(1, Ordering::Relaxed);
    }

    pub fn task_finished(&self) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            batch_count: self.batch_count(),
            decoded_count: self.decoded_count(),
            decode_failure_count: self.decode_failure_count(),
            delivered_count: self.delivered_count(),
            rejected_count: self.rejected_count(),
            failure_count: self.failure_count(),
            in_flight: self.in_flight(),
        }
    }
}

/// Snapshot of dispatch metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub batch_count: u64,
    pub decoded_count: u64,
    pub decode_failure_count: u64,
    pub delivered_count: u64,
    pub rejected_count: u64,
    pub failure_count: u64,
    pub in_flight: usize,
}
