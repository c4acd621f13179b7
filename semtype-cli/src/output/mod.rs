//! Output formatting for semtype CLI
//!
//! Two formats: `text` prints the bare next version (what release scripts
//! capture), `json` prints the whole run report. An optional change summary
//! is written to stderr so stdout stays machine-readable.

use clap::ValueEnum;
use std::io::IsTerminal;
use std::str::FromStr;

mod json;
mod text;

pub use self::json::JsonOutput;
pub use self::text::TextOutput;

use semtype_core::RunReport;

/// Output format for CLI results
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// The next version on a single line (default)
    #[default]
    Text,
    /// JSON report for machine consumption
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: '{}'", s)),
        }
    }
}

/// Configuration for output rendering
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// The output format to use
    pub format: OutputFormat,
}

impl OutputConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Create an OutputConfig with TTY detection and optional color override.
    ///
    /// Summaries go to stderr, so that is the stream checked. `Some(true)`
    /// forces colors on, `Some(false)` forces them off.
    pub fn auto_detect_with_color_override(
        format: OutputFormat,
        color_override: Option<bool>,
    ) -> Self {
        let use_color = color_override.unwrap_or_else(|| std::io::stderr().is_terminal());
        colored::control::set_override(use_color);
        Self::new(format)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::new(OutputFormat::Text)
    }
}

/// Render the primary stdout output of a run.
pub fn render_report(report: &RunReport, config: &OutputConfig) -> anyhow::Result<String> {
    match config.format {
        OutputFormat::Text => Ok(TextOutput::version_line(report)),
        OutputFormat::Json => JsonOutput::format(report),
    }
}
