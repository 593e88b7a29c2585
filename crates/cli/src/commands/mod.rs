//! Command implementations.

mod invoke;
mod serve;
mod validate;

pub use invoke::run_invoke;
pub use serve::run_serve;
pub use validate::run_validate;
