//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    config::env::EnvManager,
    error::Result,
    models::Config,
};
use std::collections::HashMap;
use std::path::PathBuf;

/// Configuration parser that combines defaults, the .env file, the process
/// environment and CLI arguments, in increasing order of precedence
pub struct ConfigParser {
    cli: Cli,
    env_file: PathBuf,
}

impl ConfigParser {
    /// Create a new configuration parser reading `.env` from the working directory
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            env_file: PathBuf::from(".env"),
        }
    }

    /// Use a different .env file
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = path.into();
        self
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        self.parse_with_env(|key| std::env::var(key).ok())
    }

    /// Read the .env file, then resolve with `env` standing in for the
    /// process environment
    pub fn parse_with_env<F>(&self, env: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file_vars = EnvManager::read_env_file(&self.env_file, self.cli.debug)?;
        self.parse_with(env, &file_vars)
    }

    /// Build the configuration from an explicit environment lookup. Variables
    /// found in `env` win over entries from the .env file.
    pub fn parse_with<F>(&self, env: F, file_vars: &HashMap<String, String>) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        config.merge_from_source(|key| env(key).or_else(|| file_vars.get(key).cloned()))?;

        self.apply_cli_overrides(&mut config)?;

        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) -> Result<()> {
        if let Some(ref name) = self.cli.name {
            config.app_name = name.clone();
        }

        if let Some(ref destinations) = self.cli.destinations {
            config.ping_list = destinations.clone();
        }

        if let Some(count) = self.cli.count_override() {
            config.ping_count = count;
        }

        if let Some(delay) = self.cli.delay_override() {
            config.delay_seconds = delay;
        }

        if let Some(echoes) = self.cli.echoes_override() {
            config.echo_count = echoes;
        }

        if let Some(timeout) = self.cli.echo_timeout_override() {
            config.echo_timeout_seconds = timeout;
        }

        if self.cli.no_save {
            config.save = false;
        }

        if let Some(ref url) = self.cli.tsdb_url {
            config.tsdb.url = Some(url.trim().to_string());
        }

        if let Some(ref format) = self.cli.log_format {
            config.log_format = format.parse()?;
        }

        if !self.cli.use_colors() {
            config.enable_color = false;
        }

        // CLI-only flags
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        if config.debug {
            println!("Applied CLI overrides to configuration");
            println!(
                "Final config: ping_count={}, delay={}s, destinations={}",
                config.ping_count, config.delay_seconds, config.ping_list
            );
        }

        Ok(())
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    match cli.env_file.clone() {
        Some(path) => ConfigParser::new(cli).with_env_file(path).parse(),
        None => ConfigParser::new(cli).parse(),
    }
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("App Name: {}", config.app_name));
    summary.push(format!("Destinations: {}", config.ping_list));
    summary.push(format!("Probe Count: {}", config.ping_count));
    summary.push(format!("Delay: {}s", config.delay_seconds));
    summary.push(format!(
        "Echoes: {} x {}s timeout",
        config.echo_count, config.echo_timeout_seconds
    ));
    summary.push(format!("Save: {}", config.save));
    summary.push(format!(
        "TSDB URL: {}",
        config.tsdb.url.as_deref().unwrap_or("(not set)")
    ));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogFormat;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(args: &[&str], env: &[(&str, &str)], file: &[(&str, &str)]) -> Result<Config> {
        let mut argv = vec!["conncheck"];
        argv.extend_from_slice(args);
        let cli = Cli::parse_from(argv);

        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let file: HashMap<String, String> = file
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        ConfigParser::new(cli).parse_with(|key| env.get(key).cloned(), &file)
    }

    #[test]
    fn test_defaults_without_any_input() {
        let config = parse(&[], &[], &[]).unwrap();

        assert_eq!(config.app_name, "wconn");
        assert_eq!(config.ping_count, 9);
        assert_eq!(config.delay_seconds, 4);
        assert!(config.save);
        assert!(config.tsdb.url.is_none());
    }

    #[test]
    fn test_env_overrides_file() {
        let config = parse(&[], &[("PING_COUNT", "5")], &[("PING_COUNT", "3"), ("DELAY_SECONDS", "1")]).unwrap();

        assert_eq!(config.ping_count, 5);
        assert_eq!(config.delay_seconds, 1);
    }

    #[test]
    fn test_cli_overrides_env() {
        let config = parse(
            &["-c", "12", "-d", "10.0.0.1", "-n", "lab"],
            &[("PING_COUNT", "8"), ("PING_LIST", "1.1.1.1"), ("CONNCHECK_NAME", "office")],
            &[],
        )
        .unwrap();

        assert_eq!(config.ping_count, 12);
        assert_eq!(config.ping_list, "10.0.0.1");
        assert_eq!(config.app_name, "lab");
    }

    #[test]
    fn test_cli_zero_keeps_configured_value() {
        let config = parse(&["-c", "0", "--ds", "0"], &[("PING_COUNT", "6"), ("DELAY_SECONDS", "2")], &[]).unwrap();

        assert_eq!(config.ping_count, 6);
        assert_eq!(config.delay_seconds, 2);
    }

    #[test]
    fn test_empty_destination_list_rejected() {
        let err = parse(&["-d", " , "], &[], &[]).unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("no destination"));
    }

    #[test]
    fn test_invalid_env_value_rejected() {
        let err = parse(&[], &[("PING_COUNT", "lots")], &[]).unwrap_err();
        assert_eq!(err.category(), "CONFIG");
    }

    #[test]
    fn test_no_save_and_tsdb_flags() {
        let config = parse(&["--no-save"], &[("TSDB_URL", "http://tsdb:4242")], &[]).unwrap();
        assert!(!config.save);
        assert!(!config.will_submit());

        let config = parse(&["--tsdb-url", "http://cli:4242"], &[("TSDB_URL", "http://env:4242")], &[]).unwrap();
        assert_eq!(config.tsdb.url.as_deref(), Some("http://cli:4242"));
        assert!(config.will_submit());
    }

    #[test]
    fn test_flags_and_log_format() {
        let config = parse(&["--verbose", "--no-color", "--log-format", "compact"], &[], &[]).unwrap();
        assert!(config.verbose);
        assert!(!config.debug);
        assert!(!config.enable_color);
        assert_eq!(config.log_format, LogFormat::Compact);

        assert!(parse(&["--log-format", "yaml"], &[], &[]).is_err());
    }

    #[test]
    fn test_parse_reads_configured_env_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "CONNCHECK_NAME=from-dotenv-file").unwrap();
        writeln!(file, "PING_COUNT=4").unwrap();

        let cli = Cli::parse_from(["conncheck", "-c", "6"]);
        let config = ConfigParser::new(cli)
            .with_env_file(file.path())
            .parse_with_env(|key| (key == "PING_COUNT").then(|| "5".to_string()))
            .unwrap();

        assert_eq!(config.app_name, "from-dotenv-file");
        assert_eq!(config.ping_count, 6);
    }

    #[test]
    fn test_missing_env_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigParser::new(Cli::parse_from(["conncheck"]))
            .with_env_file(dir.path().join(".env"))
            .parse_with_env(|_| None)
            .unwrap();

        assert_eq!(config.app_name, "wconn");
    }

    #[test]
    fn test_bad_value_in_env_file_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "PING_LIST=,").unwrap();

        let err = ConfigParser::new(Cli::parse_from(["conncheck"]))
            .with_env_file(file.path())
            .parse_with_env(|_| None)
            .unwrap_err();

        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("no destination"));
    }

    #[test]
    fn test_config_summary() {
        let summary = display_config_summary(&Config::default());

        assert!(summary.contains("Destinations: 4.2.2.2,4.2.2.3,google.com"));
        assert!(summary.contains("Probe Count: 9"));
        assert!(summary.contains("TSDB URL: (not set)"));
    }
}
