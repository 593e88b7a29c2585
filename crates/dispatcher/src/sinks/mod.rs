//! Sink implementations
//!
//! Contains HttpSink, LogSink, and the config-selected ConfiguredSink.

mod configured;
mod http;
mod log;

pub use self::configured::ConfiguredSink;
pub use self::http::{HttpSink, HttpSinkConfig};
pub use self::log::LogSink;
