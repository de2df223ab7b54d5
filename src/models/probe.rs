//! Probe statistics and aggregate outcome data models

use crate::types::ProbeStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;

/// Statistics for one successful probe (a small burst of echo requests)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeStats {
    /// Address the echoes were sent to
    pub address: Option<IpAddr>,

    pub packets_sent: u16,

    pub packets_received: u16,

    pub min_rtt: Duration,

    /// Mean over received replies only
    pub avg_rtt: Duration,

    pub max_rtt: Duration,
}

impl ProbeStats {
    /// Build statistics from the RTTs of the replies that came back
    pub fn from_rtts(address: Option<IpAddr>, packets_sent: u16, rtts: &[Duration]) -> Self {
        let packets_received = rtts.len() as u16;
        let (min_rtt, max_rtt) = match (rtts.iter().min(), rtts.iter().max()) {
            (Some(min), Some(max)) => (*min, *max),
            _ => (Duration::ZERO, Duration::ZERO),
        };
        let avg_rtt = if rtts.is_empty() {
            Duration::ZERO
        } else {
            let total: u128 = rtts.iter().map(Duration::as_nanos).sum();
            duration_from_nanos(total / rtts.len() as u128)
        };

        Self {
            address,
            packets_sent,
            packets_received,
            min_rtt,
            avg_rtt,
            max_rtt,
        }
    }
}

/// One probe as it happened inside a sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeRecord {
    /// Position in the sequence, starting at 0
    pub index: usize,

    pub destination: String,

    pub status: ProbeStatus,

    /// Average RTT when the probe succeeded
    pub rtt: Option<Duration>,

    pub error_message: Option<String>,

    pub timestamp: DateTime<Utc>,
}

impl ProbeRecord {
    pub fn success(index: usize, destination: &str, rtt: Duration) -> Self {
        Self {
            index,
            destination: destination.to_string(),
            status: ProbeStatus::Success,
            rtt: Some(rtt),
            error_message: None,
            timestamp: Utc::now(),
        }
    }

    pub fn failed(index: usize, destination: &str, error_message: String) -> Self {
        Self {
            index,
            destination: destination.to_string(),
            status: ProbeStatus::Failed,
            rtt: None,
            error_message: Some(error_message),
            timestamp: Utc::now(),
        }
    }

    pub fn is_successful(&self) -> bool {
        matches!(self.status, ProbeStatus::Success)
    }
}

/// Summary of a complete probe sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateOutcome {
    /// Mean RTT over successful probes; zero when every probe failed
    pub average_rtt: Duration,

    pub failure_count: u32,

    pub attempted: u32,

    pub records: Vec<ProbeRecord>,

    pub started_at: DateTime<Utc>,

    pub completed_at: DateTime<Utc>,
}

impl AggregateOutcome {
    pub fn success_count(&self) -> u32 {
        self.attempted - self.failure_count
    }

    pub fn all_failed(&self) -> bool {
        self.failure_count == self.attempted
    }

    /// Average RTT truncated to whole milliseconds, the value reported upstream
    pub fn average_rtt_millis(&self) -> u64 {
        (self.average_rtt.as_nanos() / 1_000_000) as u64
    }

    /// Success rate in percent
    pub fn success_rate(&self) -> f64 {
        if self.attempted == 0 {
            return 0.0;
        }
        self.success_count() as f64 / self.attempted as f64 * 100.0
    }
}

/// Saturating conversion; RTT sums never approach u64 nanoseconds in practice
pub(crate) fn duration_from_nanos(nanos: u128) -> Duration {
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}
