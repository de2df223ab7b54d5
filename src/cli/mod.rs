//! Command-line interface

use clap::Parser;
use std::path::PathBuf;

/// Connectivity check - pings a list of destinations and reports the average
/// round-trip time to OpenTSDB
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "conncheck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Application name, reported as the `app` tag [env: CONNCHECK_NAME]
    #[arg(short = 'n', long = "name")]
    pub name: Option<String>,

    /// Comma-separated destinations to ping [env: PING_LIST]
    #[arg(short = 'd', long = "destinations", value_name = "LIST")]
    pub destinations: Option<String>,

    /// Number of probes to run, 0 keeps the configured value [env: PING_COUNT]
    #[arg(short = 'c', long)]
    pub count: Option<u32>,

    /// Seconds to wait between probes, 0 keeps the configured value [env: DELAY_SECONDS]
    #[arg(long = "delay", visible_alias = "ds", value_name = "SECONDS")]
    pub delay: Option<u64>,

    /// Echo requests per probe [env: ECHO_COUNT]
    #[arg(long = "echoes")]
    pub echoes: Option<u16>,

    /// Per-echo reply timeout in seconds [env: ECHO_TIMEOUT_SECONDS]
    #[arg(long = "echo-timeout", value_name = "SECONDS")]
    pub echo_timeout: Option<u64>,

    /// Print the datapoint instead of sending it to OpenTSDB
    #[arg(long)]
    pub no_save: bool,

    /// OpenTSDB base URL, e.g. http://tsdb:4242 [env: TSDB_URL]
    #[arg(long = "tsdb-url", value_name = "URL")]
    pub tsdb_url: Option<String>,

    /// Log output format: console, json or compact [env: LOG_FORMAT]
    #[arg(long = "log-format", value_name = "FORMAT")]
    pub log_format: Option<String>,

    /// Read settings from this file instead of ./.env
    #[arg(long = "env-file", value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts
    pub fn validate(&self) -> Result<(), String> {
        if let (Some(_), true) = (&self.tsdb_url, self.no_save) {
            return Err("Cannot specify both --tsdb-url and --no-save".to_string());
        }

        if let Some(ref name) = self.name {
            if name.trim().is_empty() {
                return Err("--name cannot be empty".to_string());
            }
        }

        Ok(())
    }

    /// Probe count override; zero counts as not given
    pub fn count_override(&self) -> Option<u32> {
        self.count.filter(|&n| n > 0)
    }

    /// Delay override; zero counts as not given
    pub fn delay_override(&self) -> Option<u64> {
        self.delay.filter(|&n| n > 0)
    }

    pub fn echoes_override(&self) -> Option<u16> {
        self.echoes.filter(|&n| n > 0)
    }

    pub fn echo_timeout_override(&self) -> Option<u64> {
        self.echo_timeout.filter(|&n| n > 0)
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        !self.no_color && supports_color()
    }
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
