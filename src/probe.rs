//! Reachability probes and destination resolution

pub mod icmp;

pub use icmp::IcmpProber;

use crate::{
    error::{AppError, Result},
    models::{Config, ProbeStats},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;

/// The "do one probe" capability used by the aggregator.
///
/// A probe sends a small fixed number of echo requests to one destination
/// and blocks until they complete or time out. Resolution failures and
/// unreachable hosts are both reported as `Err`.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, destination: &str) -> Result<ProbeStats>;
}

/// Per-probe settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeSettings {
    /// Echo requests per probe
    pub echo_count: u16,
    /// Gap between consecutive echo requests
    pub echo_interval: Duration,
    /// How long to wait for each reply
    pub echo_timeout: Duration,
    /// ICMP payload size in bytes
    pub payload_size: usize,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            echo_count: crate::defaults::DEFAULT_ECHO_COUNT,
            echo_interval: crate::defaults::DEFAULT_ECHO_INTERVAL,
            echo_timeout: crate::defaults::DEFAULT_ECHO_TIMEOUT,
            payload_size: 56,
        }
    }
}

impl From<&Config> for ProbeSettings {
    fn from(config: &Config) -> Self {
        Self {
            echo_count: config.echo_count,
            echo_interval: config.echo_interval(),
            echo_timeout: config.echo_timeout(),
            ..Default::default()
        }
    }
}

impl ProbeSettings {
    /// Longest a single probe can block
    pub fn worst_case_duration(&self) -> Duration {
        let echoes = u32::from(self.echo_count);
        self.echo_timeout * echoes + self.echo_interval * echoes.saturating_sub(1)
    }
}

/// Resolve a destination to an IP address.
///
/// Literal addresses are used as-is; hostnames go through the system resolver
/// and the first address returned wins.
pub async fn resolve_host(host: &str) -> Result<IpAddr> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }

    let mut addrs = tokio::net::lookup_host(format!("{}:0", host))
        .await
        .map_err(|e| AppError::resolution(format!("cannot resolve '{}': {}", host, e)))?;

    addrs
        .next()
        .map(|addr| addr.ip())
        .ok_or_else(|| AppError::resolution(format!("no addresses found for '{}'", host)))
}
