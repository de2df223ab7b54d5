//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Ordered, non-empty list of ping destinations (IP addresses or hostnames)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DestinationList(Vec<String>);

impl DestinationList {
    /// Build from already-split entries. Entries are trimmed and blanks dropped.
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let hosts: Vec<String> = entries
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if hosts.is_empty() {
            return Err(AppError::config("no destination"));
        }

        Ok(Self(hosts))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl FromStr for DestinationList {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s.split(','))
    }
}

impl TryFrom<String> for DestinationList {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DestinationList> for String {
    fn from(list: DestinationList) -> Self {
        list.0.join(",")
    }
}

impl fmt::Display for DestinationList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(","))
    }
}

/// Outcome of a single probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeStatus {
    /// At least one echo reply was received
    Success,
    /// Unresolvable, unreachable or no reply before timeout
    Failed,
}

/// Latency classification used when colouring the summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyLevel {
    /// Under 50ms
    Good,
    /// 50-150ms
    Moderate,
    /// Over 150ms
    Poor,
}

impl LatencyLevel {
    pub fn from_rtt(rtt: Duration) -> Self {
        let ms = rtt.as_millis();
        if ms < 50 {
            Self::Good
        } else if ms <= 150 {
            Self::Moderate
        } else {
            Self::Poor
        }
    }
}
