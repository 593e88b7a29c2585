//! Fatal escalation of per-record delivery failures
//!
//! Delivery failures are not isolated per record: the first one ends the
//! process, and the batch result never reports it.

use contracts::DeliveryError;
use tracing::error;

/// Receives delivery failures that must not be recovered from
pub trait FatalHandler: Send + Sync + 'static {
    /// Handle an unrecoverable failure. Never returns.
    fn escalate(&self, error: DeliveryError) -> !;
}

/// Logs the failure and exits the process
#[derive(Debug, Clone, Copy)]
pub struct ProcessExit {
    code: i32,
}

impl ProcessExit {
    pub fn new(code: i32) -> Self {
        Self { code }
    }

    pub fn code(&self) -> i32 {
        self.code
    }
}

impl Default for ProcessExit {
    fn default() -> Self {
        Self::new(1)
    }
}

impl FatalHandler for ProcessExit {
    fn escalate(&self, error: DeliveryError) -> ! {
        error!(error = %error, exit_code = self.code, "Fatal delivery failure, terminating");
        std::process::exit(self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_exit_default_code() {
        assert_eq!(ProcessExit::default().code(), 1);
    }
}
