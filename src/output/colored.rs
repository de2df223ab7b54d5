//! Colored formatter implementation with terminal color support

use super::formatter::{
    fmt_err, format_duration, format_percentage, run_duration, FormattingOptions, OutputFormatter,
    PlainFormatter, RECORD_COLUMNS,
};
use crate::{
    emitter::DataPoint,
    error::Result,
    models::{AggregateOutcome, ProbeRecord},
    types::LatencyLevel,
};
use chrono::{DateTime, Utc};
use colored::*;
use std::fmt::Write as _;
use std::time::Duration;

impl LatencyLevel {
    /// Get color for this latency level
    pub fn color(&self) -> Color {
        match self {
            Self::Good => Color::Green,
            Self::Moderate => Color::Yellow,
            Self::Poor => Color::Red,
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub muted: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,
            muted: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    plain_formatter: PlainFormatter,
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self::with_color_scheme(options, ColorScheme::default())
    }

    /// Create a colored formatter with custom color scheme
    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        Self {
            plain_formatter: PlainFormatter::new(options.clone()),
            options,
            color_scheme,
        }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    /// Apply bold formatting if colors are enabled
    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    /// Format an RTT colored by latency level
    fn format_rtt_colored(&self, rtt: Duration) -> ColoredString {
        self.colorize(&format_duration(rtt), LatencyLevel::from_rtt(rtt).color())
    }

    /// Format percentage with color coding based on value
    fn format_percentage_colored(&self, percentage: f64) -> ColoredString {
        let color = if percentage >= 95.0 {
            self.color_scheme.success
        } else if percentage >= 50.0 {
            self.color_scheme.warning
        } else {
            self.color_scheme.error
        };
        self.colorize(&format_percentage(percentage), color)
    }

    /// Create a colored section header
    fn create_section_header(&self, title: &str) -> String {
        if self.options.enable_color {
            title.bold().color(self.color_scheme.header).to_string()
        } else {
            title.to_string()
        }
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "═".repeat(title.chars().count() + 4);

        writeln!(output, "{}", self.colorize(&border, self.color_scheme.muted)).map_err(fmt_err)?;
        writeln!(output, "  {}  ", self.create_section_header(title)).map_err(fmt_err)?;
        write!(output, "{}", self.colorize(&border, self.color_scheme.muted)).map_err(fmt_err)?;

        Ok(output)
    }

    fn format_run_start(&self, started_at: DateTime<Utc>, destinations: &[String]) -> Result<String> {
        let mut output = String::new();
        let hosts: Vec<String> = destinations
            .iter()
            .map(|d| self.colorize(d, self.color_scheme.info).to_string())
            .collect();

        writeln!(output, "Start:        {}", started_at.to_rfc3339()).map_err(fmt_err)?;
        write!(output, "Destinations: {}", hosts.join(", ")).map_err(fmt_err)?;

        Ok(output)
    }

    fn format_outcome_summary(&self, outcome: &AggregateOutcome) -> Result<String> {
        let mut output = String::new();

        let average = if outcome.all_failed() {
            self.colorize("0ms (all probes failed)", self.color_scheme.error)
        } else {
            let level = LatencyLevel::from_rtt(outcome.average_rtt);
            self.colorize(&format!("{}ms", outcome.average_rtt_millis()), level.color())
        };

        let failures_color = if outcome.failure_count == 0 {
            self.color_scheme.success
        } else {
            self.color_scheme.error
        };

        writeln!(output, "{}", self.create_section_header("Run Summary")).map_err(fmt_err)?;
        writeln!(output, "Average RTT:  {}", average).map_err(fmt_err)?;
        writeln!(output, "Probes:       {}", outcome.attempted).map_err(fmt_err)?;
        writeln!(
            output,
            "Failures:     {}",
            self.colorize(&outcome.failure_count.to_string(), failures_color)
        )
        .map_err(fmt_err)?;
        writeln!(output, "Success Rate: {}", self.format_percentage_colored(outcome.success_rate()))
            .map_err(fmt_err)?;
        write!(output, "Duration:     {}", format_duration(run_duration(outcome))).map_err(fmt_err)?;

        Ok(output)
    }

    fn format_probe_records(&self, records: &[ProbeRecord]) -> Result<String> {
        if records.is_empty() {
            return Ok(String::new());
        }

        // Column widths are computed on plain text, then each line is colored
        let table = self
            .plain_formatter
            .create_table(&RECORD_COLUMNS, &PlainFormatter::record_rows(records));
        let mut output = String::new();

        for line in table.lines() {
            let colored_line = if line.starts_with('+') {
                self.colorize(line, self.color_scheme.muted).to_string()
            } else if line.contains(" failed ") {
                self.colorize(line, self.color_scheme.error).to_string()
            } else {
                line.to_string()
            };
            writeln!(output, "{}", colored_line).map_err(fmt_err)?;
        }

        Ok(output.trim_end().to_string())
    }

    fn format_datapoint(&self, point: &DataPoint, sink: &str) -> Result<String> {
        let tags: Vec<String> = point.tags.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        let value = self.format_rtt_colored(Duration::from_millis(point.value as u64));
        Ok(format!(
            "Metric:       {} {} {} {} ({})",
            self.bold(&point.metric),
            point.timestamp,
            value,
            tags.join(" "),
            self.colorize(sink, self.color_scheme.muted)
        ))
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("{} {}", self.colorize("✗ ERROR:", self.color_scheme.error), error))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("{} {}", self.colorize("✓", self.color_scheme.success), message))
    }
}
