//! Probe sequence execution
//!
//! Runs a fixed number of probes round-robin over the destination list,
//! sleeping between consecutive probes, and folds the results into an
//! [`AggregateOutcome`]. Per-probe failures are counted, never propagated.

use crate::{
    error::{AppError, Result},
    logging::Logger,
    models::{AggregateOutcome, Config, ProbeRecord},
    probe::Prober,
    stats::RttAccumulator,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Probe count and pacing for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceConfig {
    pub probe_count: u32,
    /// Sleep between consecutive probes, never after the last one
    pub delay: Duration,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            probe_count: crate::defaults::DEFAULT_PING_COUNT,
            delay: crate::defaults::DEFAULT_DELAY,
        }
    }
}

impl From<&Config> for SequenceConfig {
    fn from(config: &Config) -> Self {
        Self {
            probe_count: config.ping_count,
            delay: config.delay(),
        }
    }
}

impl SequenceConfig {
    /// Probes that will actually run. A count of zero still runs one probe.
    pub fn effective_probe_count(&self) -> u32 {
        self.probe_count.max(1)
    }
}

/// Run the probe sequence and aggregate the results.
///
/// Probe `i` targets `destinations[i % len]`. The average RTT covers only
/// successful probes and is zero if all of them failed. An empty destination
/// list fails with a configuration error before any probe is sent.
pub async fn run_probe_sequence<P>(
    prober: &P,
    destinations: &[String],
    sequence: SequenceConfig,
    logger: &Logger,
) -> Result<AggregateOutcome>
where
    P: Prober + ?Sized,
{
    if destinations.is_empty() {
        return Err(AppError::config("no destination"));
    }

    let total = sequence.effective_probe_count() as usize;
    let started_at = Utc::now();
    let mut accumulator = RttAccumulator::new();
    let mut records = Vec::with_capacity(total);

    for index in 0..total {
        let destination = &destinations[index % destinations.len()];

        let record = match prober.probe(destination).await {
            Ok(stats) => {
                accumulator.record_success(stats.avg_rtt);
                ProbeRecord::success(index, destination, stats.avg_rtt)
            }
            Err(e) => {
                accumulator.record_failure();
                ProbeRecord::failed(index, destination, e.to_string())
            }
        };

        logger.log_probe(&record).await;
        records.push(record);

        if index + 1 < total {
            tokio::time::sleep(sequence.delay).await;
        }
    }

    Ok(AggregateOutcome {
        average_rtt: accumulator.average(),
        failure_count: accumulator.failed(),
        attempted: accumulator.attempted(),
        records,
        started_at,
        completed_at: Utc::now(),
    })
}
