//! RelayConfig - Config Loader output
//!
//! Sink endpoint and dispatch settings. Every section is optional.

use serde::{Deserialize, Serialize};

/// Complete relay configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Where records are delivered
    #[serde(default)]
    pub sink: SinkSettings,

    /// Batch fan-out settings
    #[serde(default)]
    pub dispatch: DispatchSettings,
}

/// Sink settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinkSettings {
    /// Sink type
    #[serde(default)]
    pub kind: SinkKind,

    /// Sink name used in logs and metrics
    #[serde(default = "default_sink_name")]
    pub name: String,

    /// Target URL (required for `http`)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Per-request timeout in seconds (no timeout when absent)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for SinkSettings {
    fn default() -> Self {
        Self {
            kind: SinkKind::default(),
            name: default_sink_name(),
            endpoint: None,
            timeout_secs: None,
        }
    }
}

fn default_sink_name() -> String {
    "notification".to_string()
}

/// Sink type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    /// HTTP POST to `endpoint`
    #[default]
    Http,
    /// Log records instead of sending them
    Log,
}

/// Largest accepted `max_in_flight`, the permit ceiling of tokio's semaphore
pub const MAX_IN_FLIGHT_LIMIT: usize = usize::MAX >> 3;

/// Dispatch settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchSettings {
    /// Cap on concurrent sink calls per batch (unbounded when absent)
    #[serde(default)]
    pub max_in_flight: Option<usize>,
}
