//! Engine types
//!
//! Configuration and statistics for the poll loop.

use std::time::Duration;

/// How to treat a record whose delivery failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailurePolicy {
    /// Mark the record processed once it has failed this many times.
    /// `1` gives up on the first failure.
    pub mark_failed_after: u32,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self {
            mark_failed_after: 1,
        }
    }
}

impl FailurePolicy {
    /// Whether a record with this many failures should be given up on
    pub fn should_give_up(&self, failures: u32) -> bool {
        failures >= self.mark_failed_after.max(1)
    }
}

/// Configuration for the poll loop
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Rows fetched per cycle
    pub batch_limit: usize,
    /// Sleep between cycles
    pub poll_interval: Duration,
    /// Throttle before each send
    pub send_delay: Duration,
    /// Delivery failure handling
    pub failure_policy: FailurePolicy,
    /// Prune the processed set once it grows past this
    pub max_processed: usize,
    /// Entries kept after pruning
    pub keep_processed: usize,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            batch_limit: 10,
            poll_interval: Duration::from_secs(10),
            send_delay: Duration::from_secs(3),
            failure_policy: FailurePolicy::default(),
            max_processed: 1000,
            keep_processed: 500,
        }
    }
}

/// Statistics for one cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleStats {
    /// Rows returned by the source
    pub fetched: usize,
    /// Rows already in the processed set
    pub skipped: usize,
    /// Rows delivered
    pub delivered: usize,
    /// Rows whose delivery failed
    pub failed: usize,
    /// 429 responses waited out
    pub rate_limited: usize,
    /// A failed row stopped the cycle and will be retried
    pub deferred: bool,
    /// Shutdown was requested mid-cycle
    pub interrupted: bool,
}

impl CycleStats {
    pub fn is_empty(&self) -> bool {
        self.fetched == 0
    }
}
