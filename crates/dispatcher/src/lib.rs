//! # Dispatcher
//!
//! Batch fan-out module.
//!
//! Responsible for:
//! - Decoding each queued message in order
//! - Launching one concurrent delivery task per record
//! - Waiting for the whole batch through a completion barrier
//! - Escalating delivery failures to process termination

pub mod barrier;
pub mod dispatcher;
pub mod error;
pub mod fatal;
pub mod metrics;
pub mod sinks;
pub mod task;

pub use barrier::{CompletionBarrier, CompletionGuard};
pub use contracts::{BatchSummary, DecodeError, NotificationSink, RawMessage, Record};
pub use dispatcher::{create_dispatcher, BatchDispatcher, DispatcherBuilder, DispatcherConfig};
pub use error::DispatcherError;
pub use fatal::{FatalHandler, ProcessExit};
pub use metrics::{DispatchMetrics, MetricsSnapshot};
pub use sinks::{ConfiguredSink, HttpSink, HttpSinkConfig, LogSink};
pub use task::DispatchTask;
