//! JSON output formatting for machine-readable output.
//!
//! Reports are always pretty-printed.

use anyhow::Context;
use serde::Serialize;

/// JSON output formatter
pub struct JsonOutput;

impl JsonOutput {
    /// Format data as a JSON string
    pub fn format<T: Serialize + ?Sized>(data: &T) -> anyhow::Result<String> {
        serde_json::to_string_pretty(data).context("Failed to serialize report")
    }
}
