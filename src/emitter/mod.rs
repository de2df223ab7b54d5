//! Metric emission to the time-series backend
//!
//! The run produces one datapoint: metric `ping`, the average RTT in whole
//! milliseconds, and a `failed` tag carrying the failure count.

pub mod tsdb;

pub use tsdb::TsdbClient;

use crate::{
    error::Result,
    models::{AggregateOutcome, Config},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One OpenTSDB sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub metric: String,
    /// Unix timestamp in seconds
    pub timestamp: i64,
    pub value: f64,
    pub tags: BTreeMap<String, String>,
}

impl DataPoint {
    pub fn new(metric: impl Into<String>, value: f64, at: DateTime<Utc>) -> Self {
        Self {
            metric: metric.into(),
            timestamp: at.timestamp(),
            value,
            tags: BTreeMap::new(),
        }
    }

    /// Add a tag; the value is reduced to the characters OpenTSDB accepts
    pub fn with_tag(mut self, key: impl Into<String>, value: impl AsRef<str>) -> Self {
        self.tags.insert(key.into(), sanitize_tag_value(value.as_ref()));
        self
    }

    /// Datapoint summarising a finished probe sequence
    pub fn from_outcome(outcome: &AggregateOutcome, config: &Config) -> Self {
        let mut point = Self::new(
            crate::defaults::METRIC_NAME,
            outcome.average_rtt_millis() as f64,
            outcome.completed_at,
        )
        .with_tag("failed", outcome.failure_count.to_string())
        .with_tag("app", &config.app_name);

        if let Some(host) = local_hostname() {
            point = point.with_tag("host", host);
        }

        point
    }
}

/// Destination for datapoints
#[async_trait]
pub trait MetricSink: Send + Sync {
    /// Submit datapoints to the backend
    async fn emit(&self, points: &[DataPoint]) -> Result<()>;

    /// Short name for logs
    fn name(&self) -> &str;
}

/// Prints datapoints instead of sending them
#[derive(Debug, Default, Clone)]
pub struct DryRunSink;

impl DryRunSink {
    pub fn render(&self, points: &[DataPoint]) -> Result<String> {
        Ok(serde_json::to_string(points)?)
    }
}

#[async_trait]
impl MetricSink for DryRunSink {
    async fn emit(&self, points: &[DataPoint]) -> Result<()> {
        println!("{}", self.render(points)?);
        Ok(())
    }

    fn name(&self) -> &str {
        "dry-run"
    }
}

/// Pick the sink for this configuration: OpenTSDB when saving to a configured
/// URL, the dry-run printer otherwise.
pub fn create_sink(config: &Config) -> Result<Box<dyn MetricSink>> {
    if config.will_submit() {
        Ok(Box::new(TsdbClient::new(&config.tsdb)?))
    } else {
        Ok(Box::new(DryRunSink))
    }
}

/// OpenTSDB tag values allow `a-z A-Z 0-9 - _ . /` and Unicode letters;
/// anything else becomes `_`
pub fn sanitize_tag_value(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c.is_alphabetic() || matches!(c, '-' | '_' | '.' | '/') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "unknown".to_string()
    } else {
        cleaned
    }
}

/// Hostname of the machine running the check, if it can be determined
pub fn local_hostname() -> Option<String> {
    std::env::var("HOSTNAME")
        .ok()
        .or_else(|| std::fs::read_to_string("/proc/sys/kernel/hostname").ok())
        .or_else(|| std::fs::read_to_string("/etc/hostname").ok())
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn outcome(avg: Duration, failed: u32, attempted: u32) -> AggregateOutcome {
        let now = Utc::now();
        AggregateOutcome {
            average_rtt: avg,
            failure_count: failed,
            attempted,
            records: Vec::new(),
            started_at: now,
            completed_at: now,
        }
    }

    #[test]
    fn test_datapoint_from_outcome() {
        let config = Config::default();
        let point = DataPoint::from_outcome(&outcome(Duration::from_micros(23_700), 2, 9), &config);

        assert_eq!(point.metric, "ping");
        assert_eq!(point.value, 23.0);
        assert_eq!(point.tags["failed"], "2");
        assert_eq!(point.tags["app"], "wconn");
    }

    #[test]
    fn test_all_failed_reports_zero() {
        let point = DataPoint::from_outcome(&outcome(Duration::ZERO, 3, 3), &Config::default());
        assert_eq!(point.value, 0.0);
        assert_eq!(point.tags["failed"], "3");
    }

    #[test]
    fn test_datapoint_json_shape() {
        let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let point = DataPoint::new("ping", 12.0, at).with_tag("failed", "0");
        let json = serde_json::to_value(&point).unwrap();

        assert_eq!(json["metric"], "ping");
        assert_eq!(json["timestamp"], 1_700_000_000);
        assert_eq!(json["value"], 12.0);
        assert_eq!(json["tags"]["failed"], "0");
    }

    #[test]
    fn test_sanitize_tag_value() {
        assert_eq!(sanitize_tag_value("web-01.example.com"), "web-01.example.com");
        assert_eq!(sanitize_tag_value("my app:1"), "my_app_1");
        assert_eq!(sanitize_tag_value(""), "unknown");
    }

    #[test]
    fn test_sanitize_keeps_letters_but_not_other_unicode() {
        assert_eq!(sanitize_tag_value("zürich"), "zürich");
        assert_eq!(sanitize_tag_value("20°C"), "20_C");
        assert_eq!(sanitize_tag_value("rack²"), "rack_");
    }

    #[test]
    fn test_dry_run_render() {
        let at = DateTime::from_timestamp(0, 0).unwrap();
        let rendered = DryRunSink
            .render(&[DataPoint::new("ping", 1.0, at)])
            .unwrap();
        assert!(rendered.starts_with("[{\"metric\":\"ping\""));
    }

    #[test]
    fn test_create_sink_selection() {
        let mut config = Config::default();
        assert_eq!(create_sink(&config).unwrap().name(), "dry-run");

        config.tsdb.url = Some("http://tsdb.local:4242".to_string());
        assert_eq!(create_sink(&config).unwrap().name(), "opentsdb");

        config.save = false;
        assert_eq!(create_sink(&config).unwrap().name(), "dry-run");
    }
}
