//! Data models and structures for the connection check

pub mod config;
pub mod probe;

// Re-export main model types
pub use config::{Config, TsdbConfig};
pub use probe::{AggregateOutcome, ProbeRecord, ProbeStats};
