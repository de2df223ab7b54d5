//! Core formatting traits and implementations
//!
//! This module defines the output formatting interface and provides
//! a plain text implementation with table formatting capabilities.

use crate::{
    emitter::DataPoint,
    error::{AppError, Result},
    models::{AggregateOutcome, ProbeRecord},
};
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::time::Duration;

/// Main trait for output formatting
pub trait OutputFormatter {
    /// Format a header section
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format the start-of-run banner: start time and destination list
    fn format_run_start(&self, started_at: DateTime<Utc>, destinations: &[String]) -> Result<String>;

    /// Format the aggregate outcome
    fn format_outcome_summary(&self, outcome: &AggregateOutcome) -> Result<String>;

    /// Format individual probe records as a table
    fn format_probe_records(&self, records: &[ProbeRecord]) -> Result<String>;

    /// Format the datapoint about to be submitted
    fn format_datapoint(&self, point: &DataPoint, sink: &str) -> Result<String>;

    /// Format a failure status line
    fn format_error(&self, error: &str) -> Result<String>;

    /// Format a success status line
    fn format_success(&self, message: &str) -> Result<String>;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Enable verbose mode with detailed information
    pub verbose_mode: bool,
    /// Show individual probe records
    pub show_individual_results: bool,
    /// Show table borders
    pub table_borders: bool,
    /// Maximum width of a table cell
    pub max_cell_width: usize,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
            show_individual_results: false,
            table_borders: true,
            max_cell_width: 60,
        }
    }
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    pub header: &'static str,
    pub alignment: Alignment,
}

impl Column {
    pub const fn left(header: &'static str) -> Self {
        Self { header, alignment: Alignment::Left }
    }

    pub const fn right(header: &'static str) -> Self {
        Self { header, alignment: Alignment::Right }
    }
}

/// Text alignment options
#[derive(Debug, Clone, Copy)]
pub enum Alignment {
    Left,
    Right,
}

/// Row data for table formatting
pub type RowData = Vec<String>;

/// Columns of the probe record table
pub(crate) const RECORD_COLUMNS: [Column; 5] = [
    Column::right("#"),
    Column::left("Destination"),
    Column::left("Status"),
    Column::right("RTT"),
    Column::left("Error"),
];

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    /// Create a new plain formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormattingOptions {
        &self.options
    }

    /// Create a table with the given columns and data
    pub(crate) fn create_table(&self, columns: &[Column], rows: &[RowData]) -> String {
        if rows.is_empty() {
            return String::new();
        }

        let widths = self.calculate_column_widths(columns, rows);
        let borders = self.options.table_borders;
        let mut output = String::new();

        if borders {
            output.push_str(&create_horizontal_border(&widths));
            output.push('\n');
        }

        let headers: Vec<String> = columns.iter().map(|c| c.header.to_string()).collect();
        output.push_str(&self.create_row(&headers, &widths, columns));
        output.push('\n');

        if borders {
            output.push_str(&create_horizontal_border(&widths));
            output.push('\n');
        }

        for row in rows {
            output.push_str(&self.create_row(row, &widths, columns));
            output.push('\n');
        }

        if borders {
            output.push_str(&create_horizontal_border(&widths));
        }

        output
    }

    /// Calculate column widths from headers and content
    fn calculate_column_widths(&self, columns: &[Column], rows: &[RowData]) -> Vec<usize> {
        columns
            .iter()
            .enumerate()
            .map(|(idx, col)| {
                rows.iter()
                    .filter_map(|r| r.get(idx))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(col.header.len()))
                    .max()
                    .unwrap_or(0)
                    .min(self.options.max_cell_width)
            })
            .collect()
    }

    /// Create a table row
    fn create_row(&self, data: &[String], widths: &[usize], columns: &[Column]) -> String {
        let borders = self.options.table_borders;
        let mut row = String::new();

        if borders {
            row.push('|');
        }

        for ((cell, &width), col) in data.iter().zip(widths).zip(columns) {
            if borders {
                row.push(' ');
            }
            row.push_str(&align_text(cell, width, col.alignment));
            if borders {
                row.push_str(" |");
            } else {
                row.push_str("  ");
            }
        }

        row.trim_end().to_string()
    }

    pub(crate) fn record_rows(records: &[ProbeRecord]) -> Vec<RowData> {
        records
            .iter()
            .map(|r| {
                vec![
                    (r.index + 1).to_string(),
                    r.destination.clone(),
                    if r.is_successful() { "ok" } else { "failed" }.to_string(),
                    r.rtt.map(format_duration).unwrap_or_else(|| "-".to_string()),
                    r.error_message.clone().unwrap_or_default(),
                ]
            })
            .collect()
    }
}

/// Create horizontal border for table
fn create_horizontal_border(widths: &[usize]) -> String {
    let mut border = String::from("+");
    for &width in widths {
        border.push_str(&"-".repeat(width + 2));
        border.push('+');
    }
    border
}

/// Align text within specified width, truncating when too long
fn align_text(text: &str, width: usize, alignment: Alignment) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.chars().take(width).collect();
    }

    let padding = " ".repeat(width - len);
    match alignment {
        Alignment::Left => format!("{}{}", text, padding),
        Alignment::Right => format!("{}{}", padding, text),
    }
}

/// Format duration in human-readable format
pub fn format_duration(duration: Duration) -> String {
    let ms = duration.as_secs_f64() * 1000.0;
    if ms < 1.0 {
        format!("{:.0}µs", ms * 1000.0)
    } else if ms < 1000.0 {
        format!("{:.1}ms", ms)
    } else if ms < 60000.0 {
        format!("{:.2}s", ms / 1000.0)
    } else {
        let minutes = (ms / 60000.0) as u32;
        let seconds = (ms % 60000.0) / 1000.0;
        format!("{}m{:.1}s", minutes, seconds)
    }
}

/// Format percentage with appropriate precision
pub fn format_percentage(percentage: f64) -> String {
    if percentage >= 99.95 {
        "100.0%".to_string()
    } else if percentage < 0.05 {
        "0.0%".to_string()
    } else {
        format!("{:.1}%", percentage)
    }
}

pub(crate) fn fmt_err(e: std::fmt::Error) -> AppError {
    AppError::internal(format!("Failed to format output: {}", e))
}

/// Run wall-clock time
pub(crate) fn run_duration(outcome: &AggregateOutcome) -> Duration {
    (outcome.completed_at - outcome.started_at)
        .to_std()
        .unwrap_or_default()
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(title.len() + 4);

        writeln!(output, "{}", border).map_err(fmt_err)?;
        writeln!(output, "  {}  ", title).map_err(fmt_err)?;
        write!(output, "{}", border).map_err(fmt_err)?;

        Ok(output)
    }

    fn format_run_start(&self, started_at: DateTime<Utc>, destinations: &[String]) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "Start:        {}", started_at.to_rfc3339()).map_err(fmt_err)?;
        write!(output, "Destinations: {}", destinations.join(", ")).map_err(fmt_err)?;

        Ok(output)
    }

    fn format_outcome_summary(&self, outcome: &AggregateOutcome) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "Run Summary:").map_err(fmt_err)?;
        writeln!(output, "------------").map_err(fmt_err)?;
        writeln!(output, "Average RTT:  {}ms", outcome.average_rtt_millis()).map_err(fmt_err)?;
        writeln!(output, "Probes:       {}", outcome.attempted).map_err(fmt_err)?;
        writeln!(output, "Failures:     {}", outcome.failure_count).map_err(fmt_err)?;
        writeln!(output, "Success Rate: {}", format_percentage(outcome.success_rate())).map_err(fmt_err)?;
        write!(output, "Duration:     {}", format_duration(run_duration(outcome))).map_err(fmt_err)?;

        Ok(output)
    }

    fn format_probe_records(&self, records: &[ProbeRecord]) -> Result<String> {
        Ok(self.create_table(&RECORD_COLUMNS, &Self::record_rows(records)))
    }

    fn format_datapoint(&self, point: &DataPoint, sink: &str) -> Result<String> {
        let tags: Vec<String> = point.tags.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        Ok(format!(
            "Metric:       {} {} {} {} ({})",
            point.metric,
            point.timestamp,
            point.value,
            tags.join(" "),
            sink
        ))
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("ERROR: {}", error))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("SUCCESS: {}", message))
    }
}
