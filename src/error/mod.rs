//! Error type for a check run
//!
//! Configuration errors stop the run before the first probe. Probe-side
//! errors are folded into the failure count by the executor. Emission errors
//! are logged after the outcome is already known.

use colored::{Color, Colorize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    /// Unusable settings, including an empty destination list
    #[error("Configuration error: {0}")]
    Config(String),

    /// ICMP socket could not be opened or used
    #[error("Network error: {0}")]
    Network(String),

    #[error("Resolution error: {0}")]
    Resolution(String),

    /// A probe got no usable reply
    #[error("Probe error: {0}")]
    Probe(String),

    #[error("Timeout error: {0}")]
    Timeout(String),

    /// The datapoint did not reach the metrics backend
    #[error("Metric emission error: {0}")]
    MetricEmission(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn resolution(message: impl Into<String>) -> Self {
        Self::Resolution(message.into())
    }

    pub fn probe(message: impl Into<String>) -> Self {
        Self::Probe(message.into())
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(message.into())
    }

    pub fn metric_emission(message: impl Into<String>) -> Self {
        Self::MetricEmission(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Short tag used in console output and log fields
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Network(_) => "NETWORK",
            Self::Resolution(_) => "RESOLVE",
            Self::Probe(_) => "PROBE",
            Self::Timeout(_) => "TIMEOUT",
            Self::MetricEmission(_) => "METRIC",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Whether the run carries on after this error
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Config(_) | Self::Internal(_))
    }

    /// Process exit status when this error ends the run
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 1,
            Self::Network(_) | Self::Resolution(_) | Self::Probe(_) => 2,
            Self::Timeout(_) => 3,
            Self::MetricEmission(_) => 4,
            Self::Internal(_) => 99,
        }
    }

    fn hint(&self) -> &'static str {
        match self {
            Self::Config(_) => "Check PING_LIST and the other settings in .env, the environment or the command line.",
            Self::Network(_) => "ICMP sockets need CAP_NET_RAW, or net.ipv4.ping_group_range must include your group.",
            Self::Resolution(_) => "Check the destination spelling or use an IP address.",
            Self::Probe(_) => "The host may be down or filtering ICMP echo requests.",
            Self::Timeout(_) => "Raise --echo-timeout or TSDB_TIMEOUT_SECONDS.",
            Self::MetricEmission(_) => "Check TSDB_URL and that the OpenTSDB HTTP API is reachable.",
            Self::Internal(_) => "This is a bug; please report it with the message above.",
        }
    }

    fn console_color(&self) -> Color {
        match self {
            Self::Config(_) => Color::Red,
            Self::Network(_) | Self::Resolution(_) | Self::Probe(_) => Color::Yellow,
            Self::Timeout(_) => Color::Blue,
            Self::MetricEmission(_) => Color::Magenta,
            Self::Internal(_) => Color::BrightRed,
        }
    }

    /// The error followed by a hint on what to check
    pub fn user_friendly_message(&self) -> String {
        format!("{}\n\nHint: {}", self, self.hint())
    }

    /// `[CATEGORY] message`, coloured by category when asked
    pub fn format_for_console(&self, use_color: bool) -> String {
        let tag = format!("[{}]", self.category());
        let message = self.to_string();
        if !use_color {
            return format!("{} {}", tag, message);
        }

        let color = self.console_color();
        format!("{} {}", tag.color(color).bold(), message.color(color))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::timeout(error.to_string())
        } else {
            Self::metric_emission(error.to_string())
        }
    }
}

impl From<surge_ping::SurgeError> for AppError {
    fn from(error: surge_ping::SurgeError) -> Self {
        match error {
            surge_ping::SurgeError::Timeout { .. } => Self::timeout(error.to_string()),
            other => Self::probe(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::internal(format!("JSON encoding failed: {}", error))
    }
}

/// Prints the error that ended the run to stderr
pub struct ErrorReporter {
    use_color: bool,
    verbose: bool,
}

impl ErrorReporter {
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// Console line, plus the hint in verbose mode
    pub fn render(&self, error: &AppError) -> String {
        let mut text = error.format_for_console(self.use_color);
        if self.verbose {
            text.push_str("\n\n");
            text.push_str(&error.user_friendly_message());
        }
        text
    }

    pub fn report_error(&self, error: &AppError) {
        eprintln!("{}", self.render(error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_and_exit_codes() {
        let cases = [
            (AppError::config("x"), "CONFIG", 1),
            (AppError::network("x"), "NETWORK", 2),
            (AppError::resolution("x"), "RESOLVE", 2),
            (AppError::probe("x"), "PROBE", 2),
            (AppError::timeout("x"), "TIMEOUT", 3),
            (AppError::metric_emission("x"), "METRIC", 4),
            (AppError::internal("x"), "INTERNAL", 99),
        ];

        for (error, category, code) in cases {
            assert_eq!(error.category(), category);
            assert_eq!(error.exit_code(), code, "{}", category);
        }
    }

    #[test]
    fn test_only_config_and_internal_end_the_run() {
        assert!(!AppError::config("no destination").is_recoverable());
        assert!(!AppError::internal("bug").is_recoverable());

        assert!(AppError::probe("100% packet loss").is_recoverable());
        assert!(AppError::resolution("nxdomain").is_recoverable());
        assert!(AppError::metric_emission("HTTP 500").is_recoverable());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            AppError::config("no destination").to_string(),
            "Configuration error: no destination"
        );
    }

    #[test]
    fn test_console_formatting() {
        let error = AppError::config("no destination");
        assert_eq!(
            error.format_for_console(false),
            "[CONFIG] Configuration error: no destination"
        );
        assert!(error.format_for_console(true).contains("no destination"));
    }

    #[test]
    fn test_hint_for_socket_errors() {
        let message = AppError::network("permission denied").user_friendly_message();
        assert!(message.starts_with("Network error: permission denied"));
        assert!(message.contains("CAP_NET_RAW"));
    }

    #[test]
    fn test_reporter_adds_hint_when_verbose() {
        let error = AppError::metric_emission("HTTP 400");

        let quiet = ErrorReporter::new(false, false).render(&error);
        assert_eq!(quiet, "[METRIC] Metric emission error: HTTP 400");

        let verbose = ErrorReporter::new(false, true).render(&error);
        assert!(verbose.starts_with(&quiet));
        assert!(verbose.contains("Hint: Check TSDB_URL"));
    }

    #[test]
    fn test_surge_timeout_conversion() {
        let error: AppError = surge_ping::SurgeError::Timeout { seq: surge_ping::PingSequence(0) }.into();
        assert_eq!(error.category(), "TIMEOUT");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<u32>("nope").unwrap_err();
        let error: AppError = json_error.into();
        assert_eq!(error.category(), "INTERNAL");
    }
}
