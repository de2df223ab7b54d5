//! Configuration data model and validation

use crate::logging::LogFormat;
use crate::types::{AppError, DestinationList, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bounds accepted by validation
const MAX_PING_COUNT: u32 = 1000;
const MAX_DELAY_SECONDS: u64 = 3600;
const MAX_ECHO_COUNT: u16 = 10;
const MAX_ECHO_TIMEOUT_SECONDS: u64 = 30;
const MAX_TSDB_TIMEOUT_SECONDS: u64 = 300;

/// OpenTSDB connection settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TsdbConfig {
    /// Base URL of the OpenTSDB HTTP API, e.g. `http://tsdb:4242`
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default, skip_serializing)]
    pub password: Option<String>,

    #[serde(default = "default_tsdb_timeout_secs")]
    pub timeout_seconds: u64,
}

impl Default for TsdbConfig {
    fn default() -> Self {
        Self {
            url: None,
            username: None,
            password: None,
            timeout_seconds: default_tsdb_timeout_secs(),
        }
    }
}

impl TsdbConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application name, reported as the `app` tag
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Comma-separated destinations to ping
    #[serde(default = "default_ping_list")]
    pub ping_list: String,

    /// Number of probes per run
    #[serde(default = "default_ping_count")]
    pub ping_count: u32,

    /// Delay between consecutive probes
    #[serde(default = "default_delay_secs")]
    pub delay_seconds: u64,

    /// Echo requests sent per probe
    #[serde(default = "default_echo_count")]
    pub echo_count: u16,

    /// Gap between echo requests inside one probe
    #[serde(default = "default_echo_interval_ms")]
    pub echo_interval_ms: u64,

    /// Per-echo reply timeout
    #[serde(default = "default_echo_timeout_secs")]
    pub echo_timeout_seconds: u64,

    /// Submit the datapoint to the metrics backend
    #[serde(default = "default_save")]
    pub save: bool,

    #[serde(default)]
    pub tsdb: TsdbConfig,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            ping_list: default_ping_list(),
            ping_count: default_ping_count(),
            delay_seconds: default_delay_secs(),
            echo_count: default_echo_count(),
            echo_interval_ms: default_echo_interval_ms(),
            echo_timeout_seconds: default_echo_timeout_secs(),
            save: default_save(),
            tsdb: TsdbConfig::default(),
            enable_color: default_enable_color(),
            log_format: LogFormat::default(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parsed destination list; fails with "no destination" when empty
    pub fn destinations(&self) -> Result<DestinationList> {
        self.ping_list.parse()
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_seconds)
    }

    pub fn echo_interval(&self) -> Duration {
        Duration::from_millis(self.echo_interval_ms)
    }

    pub fn echo_timeout(&self) -> Duration {
        Duration::from_secs(self.echo_timeout_seconds)
    }

    /// Whether a datapoint will actually be sent to the backend
    pub fn will_submit(&self) -> bool {
        self.save && self.tsdb.url.is_some()
    }

    /// Validate the configuration and return the first error found
    pub fn validate(&self) -> Result<()> {
        if self.app_name.trim().is_empty() {
            return Err(AppError::config("Application name cannot be empty"));
        }

        self.destinations()?;

        if self.ping_count == 0 {
            return Err(AppError::config("Ping count must be greater than 0"));
        }

        if self.ping_count > MAX_PING_COUNT {
            return Err(AppError::config(format!("Ping count cannot exceed {}", MAX_PING_COUNT)));
        }

        if self.delay_seconds > MAX_DELAY_SECONDS {
            return Err(AppError::config(format!("Delay cannot exceed {} seconds", MAX_DELAY_SECONDS)));
        }

        if self.echo_count == 0 || self.echo_count > MAX_ECHO_COUNT {
            return Err(AppError::config(format!("Echo count must be between 1 and {}", MAX_ECHO_COUNT)));
        }

        if self.echo_timeout_seconds == 0 || self.echo_timeout_seconds > MAX_ECHO_TIMEOUT_SECONDS {
            return Err(AppError::config(format!(
                "Echo timeout must be between 1 and {} seconds",
                MAX_ECHO_TIMEOUT_SECONDS
            )));
        }

        if let Some(ref raw) = self.tsdb.url {
            match url::Url::parse(raw) {
                Ok(parsed) => {
                    if parsed.scheme() != "http" && parsed.scheme() != "https" {
                        return Err(AppError::config(format!("TSDB URL must use http or https: {}", raw)));
                    }
                }
                Err(e) => {
                    return Err(AppError::config(format!("Invalid TSDB URL '{}': {}", raw, e)));
                }
            }
        }

        if self.tsdb.timeout_seconds == 0 || self.tsdb.timeout_seconds > MAX_TSDB_TIMEOUT_SECONDS {
            return Err(AppError::config(format!(
                "TSDB timeout must be between 1 and {} seconds",
                MAX_TSDB_TIMEOUT_SECONDS
            )));
        }

        Ok(())
    }

    /// Merge settings from a key lookup (process environment, `.env` entries)
    pub fn merge_from_source<F>(&mut self, source: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = source("CONNCHECK_NAME") {
            self.app_name = name;
        }

        if let Some(list) = source("PING_LIST") {
            self.ping_list = list;
        }

        if let Some(count) = source("PING_COUNT") {
            self.ping_count = count.parse()
                .map_err(|e| AppError::config(format!("Invalid PING_COUNT value '{}': {}", count, e)))?;
        }

        if let Some(delay) = source("DELAY_SECONDS") {
            self.delay_seconds = delay.parse()
                .map_err(|e| AppError::config(format!("Invalid DELAY_SECONDS value '{}': {}", delay, e)))?;
        }

        if let Some(echoes) = source("ECHO_COUNT") {
            self.echo_count = echoes.parse()
                .map_err(|e| AppError::config(format!("Invalid ECHO_COUNT value '{}': {}", echoes, e)))?;
        }

        if let Some(timeout) = source("ECHO_TIMEOUT_SECONDS") {
            self.echo_timeout_seconds = timeout.parse()
                .map_err(|e| AppError::config(format!("Invalid ECHO_TIMEOUT_SECONDS value '{}': {}", timeout, e)))?;
        }

        if let Some(save) = source("SAVE") {
            self.save = save.parse()
                .map_err(|e| AppError::config(format!("Invalid SAVE value '{}': {}", save, e)))?;
        }

        if let Some(url) = source("TSDB_URL") {
            let url = url.trim();
            self.tsdb.url = if url.is_empty() { None } else { Some(url.to_string()) };
        }

        if let Some(user) = source("TSDB_USERNAME") {
            self.tsdb.username = Some(user);
        }

        if let Some(password) = source("TSDB_PASSWORD") {
            self.tsdb.password = Some(password);
        }

        if let Some(timeout) = source("TSDB_TIMEOUT_SECONDS") {
            self.tsdb.timeout_seconds = timeout.parse()
                .map_err(|e| AppError::config(format!("Invalid TSDB_TIMEOUT_SECONDS value '{}': {}", timeout, e)))?;
        }

        if let Some(enable_color) = source("ENABLE_COLOR") {
            self.enable_color = enable_color.parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        if let Some(format) = source("LOG_FORMAT") {
            self.log_format = format.parse()?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_app_name() -> String {
    crate::defaults::DEFAULT_APP_NAME.to_string()
}

fn default_ping_list() -> String {
    crate::defaults::DEFAULT_PING_LIST.to_string()
}

fn default_ping_count() -> u32 {
    crate::defaults::DEFAULT_PING_COUNT
}

fn default_delay_secs() -> u64 {
    crate::defaults::DEFAULT_DELAY.as_secs()
}

fn default_echo_count() -> u16 {
    crate::defaults::DEFAULT_ECHO_COUNT
}

fn default_echo_interval_ms() -> u64 {
    crate::defaults::DEFAULT_ECHO_INTERVAL.as_millis() as u64
}

fn default_echo_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_ECHO_TIMEOUT.as_secs()
}

fn default_save() -> bool {
    crate::defaults::DEFAULT_SAVE
}

fn default_tsdb_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_TSDB_TIMEOUT.as_secs()
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.app_name, "wconn");
        assert_eq!(config.ping_count, 9);
        assert_eq!(config.delay(), Duration::from_secs(4));
        assert_eq!(config.echo_count, 3);
        assert!(config.save);
        assert_eq!(
            config.destinations().unwrap().as_slice(),
            &["4.2.2.2", "4.2.2.3", "google.com"]
        );
    }

    #[test]
    fn test_empty_ping_list_invalid() {
        let config = Config {
            ping_list: " , ".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("no destination"));
    }

    #[test]
    fn test_zero_ping_count_invalid() {
        let config = Config {
            ping_count: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ping_count_upper_bound() {
        let mut config = Config::default();
        config.ping_count = 1000;
        assert!(config.validate().is_ok());
        config.ping_count = 1001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_delay_is_allowed() {
        let config = Config {
            delay_seconds: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.delay(), Duration::ZERO);
    }

    #[test]
    fn test_echo_bounds() {
        let mut config = Config::default();
        config.echo_count = 0;
        assert!(config.validate().is_err());
        config.echo_count = 11;
        assert!(config.validate().is_err());
        config.echo_count = 3;
        config.echo_timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tsdb_url_validation() {
        let mut config = Config::default();
        config.tsdb.url = Some("http://tsdb.local:4242".to_string());
        assert!(config.validate().is_ok());

        config.tsdb.url = Some("not a url".to_string());
        assert!(config.validate().is_err());

        config.tsdb.url = Some("ftp://tsdb.local".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_will_submit_requires_save_and_url() {
        let mut config = Config::default();
        assert!(!config.will_submit());

        config.tsdb.url = Some("http://tsdb.local:4242".to_string());
        assert!(config.will_submit());

        config.save = false;
        assert!(!config.will_submit());
    }

    #[test]
    fn test_password_not_serialized() {
        let mut config = Config::default();
        config.tsdb.password = Some("hunter2".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hunter2"));
    }

    #[test]
    fn test_merge_from_source() {
        let vars: std::collections::HashMap<&str, &str> = [
            ("CONNCHECK_NAME", "branch-office"),
            ("PING_LIST", "1.1.1.1, 9.9.9.9"),
            ("PING_COUNT", "4"),
            ("DELAY_SECONDS", "0"),
            ("SAVE", "false"),
            ("TSDB_URL", "  "),
            ("LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .merge_from_source(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.app_name, "branch-office");
        assert_eq!(config.destinations().unwrap().as_slice(), &["1.1.1.1", "9.9.9.9"]);
        assert_eq!(config.ping_count, 4);
        assert_eq!(config.delay_seconds, 0);
        assert!(!config.save);
        assert_eq!(config.tsdb.url, None);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_merge_rejects_malformed_numbers() {
        let mut config = Config::default();
        let err = config
            .merge_from_source(|key| (key == "PING_COUNT").then(|| "nine".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("Invalid PING_COUNT value 'nine'"));
    }
}
