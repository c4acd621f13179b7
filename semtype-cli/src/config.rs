//! semtype configuration loading from `.semtype.toml`.
//!
//! Configuration is optional. Without a config file semtype scans only the
//! top level of the source directory, skips test files and keeps its state in
//! `semtype.json` next to the sources.
//!
//! # Example Configuration
//!
//! ```toml
//! [scanner]
//! recursive = false
//! include_tests = false
//! ignore = ["gen_*.go"]
//!
//! [state]
//! file = ".release/semtype.json"
//!
//! [output]
//! format = "text"
//! color = true
//! ```

use anyhow::{bail, Context};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use semtype_core::ScanOptions;

use crate::output::OutputFormat;

/// Config file name, looked up in the source directory.
pub const CONFIG_FILE: &str = ".semtype.toml";

/// Root configuration structure loaded from `.semtype.toml`.
///
/// All sections are optional and use defaults if not specified.
#[derive(Debug, Deserialize, Default)]
pub struct SemtypeConfig {
    /// File scanning configuration.
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Where the recorded version lives.
    #[serde(default)]
    pub state: StateConfig,

    /// Output formatting preferences.
    #[serde(default)]
    pub output: OutputSettings,
}

/// Scanner configuration controlling file discovery.
#[derive(Debug, Deserialize, Default)]
pub struct ScannerConfig {
    /// Descend into subdirectories.
    ///
    /// A Go package is a single directory, so this is off by default. Turn it
    /// on to version a module whose public surface spans several packages.
    #[serde(default)]
    pub recursive: bool,

    /// Treat `*_test.go` files as part of the API.
    #[serde(default)]
    pub include_tests: bool,

    /// Additional glob patterns to ignore during scanning.
    ///
    /// Combined with the built-in defaults (`vendor/`, `testdata/`) and any
    /// `.gitignore` rules.
    #[serde(default)]
    pub ignore: Vec<String>,
}

/// State file configuration.
#[derive(Debug, Deserialize, Default)]
pub struct StateConfig {
    /// State file path. Relative paths are resolved against the source
    /// directory.
    #[serde(default)]
    pub file: Option<String>,
}

/// Output formatting preferences. Command-line flags override these.
#[derive(Debug, Deserialize, Default)]
pub struct OutputSettings {
    /// Default output format: `text` or `json`.
    #[serde(default)]
    pub format: Option<String>,

    /// Whether to use colored output in change summaries.
    #[serde(default)]
    pub color: Option<bool>,
}

impl SemtypeConfig {
    /// Load configuration from `.semtype.toml` in the given directory.
    ///
    /// A missing file yields defaults. An unreadable or invalid file is
    /// logged and replaced by defaults, unless `strict` is set, in which case
    /// it is an error.
    pub fn load(root: &Path, strict: bool) -> anyhow::Result<Self> {
        let config_path = root.join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let parsed = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))
            .and_then(|content| {
                toml::from_str::<Self>(&content)
                    .with_context(|| format!("Failed to parse {}", config_path.display()))
            })
            .and_then(|config| {
                config
                    .validate()
                    .with_context(|| format!("Invalid {}", config_path.display()))?;
                Ok(config)
            });

        match parsed {
            Ok(config) => {
                tracing::debug!(path = %config_path.display(), "Loaded configuration");
                Ok(config)
            }
            Err(e) if strict => Err(e),
            Err(e) => {
                tracing::warn!("{:#}, using defaults", e);
                Ok(Self::default())
            }
        }
    }

    /// Scanner options, before command-line overrides.
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            recursive: self.scanner.recursive,
            include_tests: self.scanner.include_tests,
            ignore: self.scanner.ignore.clone(),
        }
    }

    /// Configured state path, resolved against `root`.
    pub fn state_path(&self, root: &Path) -> Option<PathBuf> {
        self.state.file.as_ref().map(|file| root.join(file))
    }

    /// Get the default output format, if configured.
    ///
    /// Unknown names are rejected by [`validate`](Self::validate) on load.
    pub fn default_format(&self) -> Option<OutputFormat> {
        self.output.format.as_deref().and_then(|f| f.parse().ok())
    }

    /// Returns the configured value, or `None` to use auto-detection.
    pub fn use_color(&self) -> Option<bool> {
        self.output.color
    }

    /// Reject values that parse as TOML but make no sense.
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(file) = &self.state.file {
            if file.trim().is_empty() {
                bail!("[state].file must not be empty");
            }
        }
        if let Some(format) = &self.output.format {
            if let Err(e) = format.parse::<OutputFormat>() {
                bail!("[output].format: {}, expected `text` or `json`", e);
            }
        }
        Ok(())
    }
}
