//! Running RTT aggregation for a probe sequence

use crate::models::probe::duration_from_nanos;
use std::time::Duration;

/// Accumulates successful-probe RTTs and failure counts.
///
/// The average is computed on nanosecond integers with truncating division,
/// and is zero when no probe succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RttAccumulator {
    rtt_sum_nanos: u128,
    attempted: u32,
    failed: u32,
}

impl RttAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful probe and its average RTT
    pub fn record_success(&mut self, rtt: Duration) {
        self.rtt_sum_nanos += rtt.as_nanos();
        self.attempted += 1;
    }

    /// Record a failed probe; contributes nothing to the RTT sum
    pub fn record_failure(&mut self) {
        self.failed += 1;
        self.attempted += 1;
    }

    pub fn attempted(&self) -> u32 {
        self.attempted
    }

    pub fn failed(&self) -> u32 {
        self.failed
    }

    pub fn succeeded(&self) -> u32 {
        self.attempted - self.failed
    }

    /// Mean RTT over successful probes, or zero when all failed
    pub fn average(&self) -> Duration {
        match self.succeeded() {
            0 => Duration::ZERO,
            good => duration_from_nanos(self.rtt_sum_nanos / u128::from(good)),
        }
    }
}
