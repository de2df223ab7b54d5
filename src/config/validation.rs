//! Configuration validation utilities and rules

use crate::{
    error::Result,
    executor::SequenceConfig,
    models::Config,
    probe::ProbeSettings,
};
use std::collections::HashSet;
use std::net::IpAddr;
use std::time::Duration;

/// Worst-case run time above which a warning is raised
const LONG_RUN_THRESHOLD: Duration = Duration::from_secs(300);

/// Configuration validator producing non-fatal warnings on top of
/// [`Config::validate`]
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration with comprehensive checks
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        config.validate()?;

        let mut warnings = Vec::new();
        warnings.extend(Self::validate_destinations(config)?);
        warnings.extend(Self::validate_run_time(config));
        warnings.extend(Self::validate_submission(config));

        Ok(warnings)
    }

    fn validate_destinations(config: &Config) -> Result<Vec<ValidationWarning>> {
        let destinations = config.destinations()?;
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for host in destinations.iter() {
            if !seen.insert(host.to_ascii_lowercase()) {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("Destination '{}' is listed more than once and will be probed more often", host),
                ));
            }

            if let Ok(ip) = host.parse::<IpAddr>() {
                let local = match ip {
                    IpAddr::V4(v4) => v4.is_private() || v4.is_loopback() || v4.is_link_local(),
                    IpAddr::V6(v6) => v6.is_loopback(),
                };
                if local {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Info,
                        format!("Destination {} is on a private or local network", ip),
                    ));
                }
            }
        }

        if destinations.len() as u32 > config.ping_count {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Only {} of {} destinations will be probed with a probe count of {}",
                    config.ping_count,
                    destinations.len(),
                    config.ping_count
                ),
            ));
        }

        Ok(warnings)
    }

    fn validate_run_time(config: &Config) -> Vec<ValidationWarning> {
        let worst = worst_case_run_time(config);
        if worst > LONG_RUN_THRESHOLD {
            vec![ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "A run can take up to {}s; make sure the scheduling interval is longer",
                    worst.as_secs()
                ),
            )]
        } else {
            Vec::new()
        }
    }

    fn validate_submission(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.save && config.tsdb.url.is_none() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                "Saving is enabled but TSDB_URL is not set; the datapoint will only be printed".to_string(),
            ));
        }

        if let Some(ref raw) = config.tsdb.url {
            let plain_http = raw.starts_with("http://");
            if plain_http && config.tsdb.password.is_some() {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("TSDB credentials will be sent over plain HTTP to {}", raw),
                ));
            }
        }

        warnings
    }
}

/// Upper bound on the wall-clock time of one run
pub fn worst_case_run_time(config: &Config) -> Duration {
    let sequence = SequenceConfig::from(config);
    let probes = sequence.effective_probe_count();
    ProbeSettings::from(config).worst_case_duration() * probes + sequence.delay * (probes - 1)
}

/// Validation warning levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(warnings: &[ValidationWarning]) -> Vec<&str> {
        warnings.iter().map(|w| w.message.as_str()).collect()
    }

    #[test]
    fn test_default_config_only_warns_about_missing_url() {
        let warnings = validate_config(&Config::default()).unwrap();

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, ValidationLevel::Warning);
        assert!(warnings[0].message.contains("TSDB_URL is not set"));
    }

    #[test]
    fn test_invalid_config_is_error() {
        let config = Config {
            ping_list: ",".to_string(),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_duplicate_destinations() {
        let config = Config {
            ping_list: "4.2.2.2,Google.com,google.com".to_string(),
            save: false,
            ..Default::default()
        };
        let warnings = validate_config(&config).unwrap();

        assert!(messages(&warnings)
            .iter()
            .any(|m| m.contains("'google.com' is listed more than once")));
    }

    #[test]
    fn test_private_destination_info() {
        let config = Config {
            ping_list: "192.168.1.1".to_string(),
            save: false,
            ..Default::default()
        };
        let warnings = validate_config(&config).unwrap();

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, ValidationLevel::Info);
    }

    #[test]
    fn test_more_destinations_than_probes() {
        let config = Config {
            ping_count: 2,
            save: false,
            ..Default::default()
        };
        let warnings = validate_config(&config).unwrap();

        assert!(messages(&warnings)
            .iter()
            .any(|m| m.contains("Only 2 of 3 destinations")));
    }

    #[test]
    fn test_worst_case_run_time() {
        // 9 probes x (3 x 1s + 2 x 1s) + 8 x 4s
        assert_eq!(worst_case_run_time(&Config::default()), Duration::from_secs(77));

        let config = Config {
            ping_count: 100,
            save: false,
            ..Default::default()
        };
        let warnings = validate_config(&config).unwrap();
        assert!(messages(&warnings).iter().any(|m| m.contains("can take up to")));
    }

    #[test]
    fn test_credentials_over_http() {
        let mut config = Config::default();
        config.tsdb.url = Some("http://tsdb:4242".to_string());
        config.tsdb.password = Some("secret".to_string());

        let warnings = validate_config(&config).unwrap();
        assert!(messages(&warnings).iter().any(|m| m.contains("plain HTTP")));
    }
}
