//! Output formatting and display system
//!
//! Renders the run banner, the aggregate summary and, in verbose mode, the
//! per-probe table, either colored or as plain text.

mod colored;
mod formatter;

pub use colored::{ColorScheme, ColoredFormatter};
pub use formatter::{
    format_duration, format_percentage, Alignment, Column, FormattingOptions, OutputFormatter,
    PlainFormatter, RowData,
};

use crate::{
    emitter::DataPoint,
    error::Result,
    models::{AggregateOutcome, Config},
};

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
            show_individual_results: verbose,
            ..Default::default()
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }
}

/// Main output coordinator that handles all result display
pub struct OutputCoordinator {
    formatter: Box<dyn OutputFormatter>,
    show_records: bool,
}

impl OutputCoordinator {
    /// Create a new output coordinator with the specified formatter
    pub fn new(formatter: Box<dyn OutputFormatter>, show_records: bool) -> Self {
        Self {
            formatter,
            show_records,
        }
    }

    /// Coordinator matching the configured color and verbosity
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            OutputFormatterFactory::create_formatter(config.enable_color, config.verbose),
            config.verbose,
        )
    }

    pub fn formatter(&self) -> &dyn OutputFormatter {
        self.formatter.as_ref()
    }

    /// Banner printed before the first probe
    pub fn display_start(&self, app_name: &str, destinations: &[String]) -> Result<String> {
        let mut output = self
            .formatter
            .format_header(&format!("Connectivity Check: {}", app_name))?;
        output.push('\n');
        output.push_str(
            &self
                .formatter
                .format_run_start(chrono::Utc::now(), destinations)?,
        );
        Ok(output)
    }

    /// Summary printed after the sequence completes
    pub fn display_outcome(&self, outcome: &AggregateOutcome) -> Result<String> {
        let mut output = String::new();

        if self.show_records && !outcome.records.is_empty() {
            output.push_str(&self.formatter.format_probe_records(&outcome.records)?);
            output.push_str("\n\n");
        }

        output.push_str(&self.formatter.format_outcome_summary(outcome)?);
        Ok(output)
    }

    pub fn display_datapoint(&self, point: &DataPoint, sink: &str) -> Result<String> {
        self.formatter.format_datapoint(point, sink)
    }

    /// Status line for the datapoint submission
    pub fn display_emission(&self, sink: &str, result: &Result<()>) -> Result<String> {
        match result {
            Ok(()) => self.formatter.format_success(&format!("Datapoint submitted via {}", sink)),
            Err(e) => self
                .formatter
                .format_error(&format!("Datapoint not submitted via {}: {}", sink, e)),
        }
    }
}
