//! Structured logging for the connection check
//!
//! Every entry carries the run's session id plus any context fields set on
//! the logger. Entries render as console text, JSON lines or a compact form.
//! WARN and above go to stderr so that stdout keeps only the run summary.

use crate::error::AppError;
use crate::models::{Config, ProbeRecord};
use chrono::{DateTime, Utc};
use colored::{Color, Colorize};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Severity threshold; `Off` silences a logger entirely
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    /// Threshold for a run: `--debug` shows everything, `--verbose` adds
    /// progress, otherwise only problems are printed
    pub fn for_config(config: &Config) -> Self {
        if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        }
    }

    fn label(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Off => "OFF",
        }
    }

    fn color(self) -> Color {
        match self {
            LogLevel::Debug => Color::Cyan,
            LogLevel::Info => Color::Green,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error | LogLevel::Off => Color::Red,
        }
    }
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console format
    #[default]
    Console,
    /// One JSON object per line, for log shippers
    Json,
    /// `HH:MM:SS L name: message`
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" => Ok(LogFormat::Console),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(AppError::config(format!(
                "Invalid log format '{}': expected console, json or compact",
                s
            ))),
        }
    }
}

/// One rendered log event
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub logger: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub fields: BTreeMap<String, Value>,
}

pub struct Logger {
    name: String,
    threshold: LogLevel,
    format: LogFormat,
    use_color: bool,
    session_id: Option<String>,
    context: Arc<RwLock<BTreeMap<String, Value>>>,
}

impl Logger {
    /// Logger with the threshold, format and colour taken from the config
    pub fn new(name: impl Into<String>, config: &Config) -> Self {
        Self {
            name: name.into(),
            threshold: LogLevel::for_config(config),
            format: config.log_format,
            use_color: config.enable_color,
            session_id: None,
            context: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn set_level(&mut self, level: LogLevel) {
        self.threshold = level;
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level != LogLevel::Off && level >= self.threshold
    }

    /// Attach a field to every later entry from this logger
    pub async fn add_context_field<T: Serialize>(&self, key: &str, value: T) {
        if let Ok(value) = serde_json::to_value(value) {
            self.context.write().await.insert(key.to_string(), value);
        }
    }

    pub fn debug(&self, message: &str) -> Event<'_> {
        Event::new(self, LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> Event<'_> {
        Event::new(self, LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> Event<'_> {
        Event::new(self, LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> Event<'_> {
        Event::new(self, LogLevel::Error, message)
    }

    /// Log a finished probe: DEBUG on success, WARN on failure
    pub async fn log_probe(&self, record: &ProbeRecord) {
        let event = match record.error_message.as_deref() {
            None => self.debug(&format!("Probe {} to {} succeeded", record.index, record.destination)),
            Some(reason) => self.warn(&format!(
                "Probe {} to {} failed: {}",
                record.index, record.destination, reason
            )),
        };

        event.probe(record).log().await;
    }

    /// Log an error with its category and exit code at ERROR
    pub async fn log_error(&self, error: &AppError, context: Option<&str>) {
        let message = match context {
            Some(ctx) => format!("{}: {}", ctx, error),
            None => error.to_string(),
        };

        self.error(&message).error_info(error).log().await;
    }

    async fn write(&self, mut entry: LogEntry) {
        if !self.enabled(entry.level) {
            return;
        }

        for (key, value) in self.context.read().await.iter() {
            entry.fields.entry(key.clone()).or_insert_with(|| value.clone());
        }

        let line = self.render(&entry);
        if entry.level >= LogLevel::Warn {
            let _ = writeln!(io::stderr(), "{}", line);
        } else {
            let _ = writeln!(io::stdout(), "{}", line);
        }
    }

    fn render(&self, entry: &LogEntry) -> String {
        match self.format {
            LogFormat::Console => self.render_console(entry),
            LogFormat::Json => serde_json::to_string(entry)
                .unwrap_or_else(|e| format!("{{\"message\":\"unserializable log entry: {}\"}}", e)),
            LogFormat::Compact => format!(
                "{} {} {}: {}",
                entry.timestamp.format("%H:%M:%S"),
                &entry.level.label()[..1],
                entry.logger,
                entry.message
            ),
        }
    }

    fn render_console(&self, entry: &LogEntry) -> String {
        let level = format!("{:>5}", entry.level.label());
        let level = if self.use_color {
            level.color(entry.level.color()).to_string()
        } else {
            level
        };

        let mut line = format!(
            "{} {} [{}] {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            level,
            entry.logger,
            entry.message
        );

        if !entry.fields.is_empty() {
            let fields: Vec<String> = entry.fields.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            line.push_str(&format!(" {{{}}}", fields.join(", ")));
        }

        line
    }
}

/// A log entry under construction
pub struct Event<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> Event<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: &str) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                logger: logger.name.clone(),
                message: message.to_string(),
                session_id: logger.session_id.clone(),
                fields: BTreeMap::new(),
            },
        }
    }

    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), value);
        }
        self
    }

    pub fn probe(self, record: &ProbeRecord) -> Self {
        self.field("probe_index", record.index)
            .field("destination", &record.destination)
            .field("rtt_ms", record.rtt.map(|d| d.as_secs_f64() * 1000.0))
            .field("success", record.is_successful())
    }

    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_recoverable", error.is_recoverable())
            .field("error_exit_code", error.exit_code())
    }

    pub async fn log(self) {
        self.logger.write(self.entry).await;
    }
}

/// Hands out loggers that share one session id per run
pub struct LoggerFactory {
    config: Config,
    session_id: String,
}

impl LoggerFactory {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn create_logger(&self, name: &str) -> Logger {
        Logger::new(name, &self.config).with_session_id(self.session_id.clone())
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}
