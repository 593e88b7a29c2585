//! # Contracts
//!
//! Interface contracts shared by every crate in the relay.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Message model
//! - A queue delivers a batch of [`RawMessage`] bodies
//! - Each body decodes into a [`Record`] (`{"id", "title"}`)
//! - Records are forwarded to a [`NotificationSink`]

mod batch;
mod error;
mod message;
mod relay_config;
mod sink;

pub use batch::*;
pub use error::*;
pub use message::*;
pub use relay_config::*;
pub use sink::*;
