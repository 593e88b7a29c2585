//! BatchSummary - Batch Dispatcher output

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result of a batch that decoded completely
///
/// `processed` counts decoded messages, not confirmed deliveries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub processed: usize,
}

impl BatchSummary {
    pub fn new(processed: usize) -> Self {
        Self { processed }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Processed {} messages.", self.processed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_display() {
        assert_eq!(BatchSummary::new(2).to_string(), "Processed 2 messages.");
        assert_eq!(BatchSummary::new(0).to_string(), "Processed 0 messages.");
    }
}
