//! Connection Check
//!
//! Pings a list of destinations round-robin, aggregates the average
//! round-trip time and failure count, and reports a single `ping` datapoint
//! to an OpenTSDB backend. Meant to be run once per invocation by an external
//! scheduler.

pub mod app;
pub mod cli;
pub mod config;
pub mod emitter;
pub mod error;
pub mod executor;
pub mod logging;
pub mod models;
pub mod output;
pub mod probe;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use executor::run_probe_sequence;
pub use models::{AggregateOutcome, Config, ProbeRecord, ProbeStats};
pub use probe::{IcmpProber, Prober};
pub use emitter::{DataPoint, MetricSink, TsdbClient};
pub use types::DestinationList;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const BUILD_TIME: Option<&str> = option_env!("BUILD_TIME");
pub const GIT_COMMIT: Option<&str> = option_env!("GIT_COMMIT");

/// `conn-check v0.1.0 (abc1234, built 2026-01-01 00:00:00 UTC)`; the
/// parenthesis lists whatever the build script could record
pub fn version_line() -> String {
    let details: Vec<String> = GIT_COMMIT
        .map(str::to_string)
        .into_iter()
        .chain(BUILD_TIME.map(|t| format!("built {}", t)))
        .collect();

    if details.is_empty() {
        format!("{} v{}", PKG_NAME, VERSION)
    } else {
        format!("{} v{} ({})", PKG_NAME, VERSION, details.join(", "))
    }
}

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_APP_NAME: &str = "wconn";
    pub const DEFAULT_PING_COUNT: u32 = 9;
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(4);
    pub const DEFAULT_PING_LIST: &str = "4.2.2.2,4.2.2.3,google.com";
    pub const DEFAULT_SAVE: bool = true;
    pub const DEFAULT_ECHO_COUNT: u16 = 3;
    pub const DEFAULT_ECHO_INTERVAL: Duration = Duration::from_secs(1);
    pub const DEFAULT_ECHO_TIMEOUT: Duration = Duration::from_secs(1);
    pub const DEFAULT_TSDB_TIMEOUT: Duration = Duration::from_secs(10);
    pub const DEFAULT_ENABLE_COLOR: bool = true;

    /// Metric name reported to the time-series backend
    pub const METRIC_NAME: &str = "ping";
}
