//! semtype CLI - semantic versioning from exported API changes
//!
//! Compares the exported declarations of a Go package with the snapshot
//! recorded on the previous run and prints the next semantic version.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod output;

use config::SemtypeConfig;
use output::{OutputConfig, OutputFormat, TextOutput};
use semtype_core::{Pipeline, PipelineOptions, TracingDiagnostics};

/// Infer the next semantic version from changes to a package's exported API.
///
/// Each run snapshots the exported types and functions, compares them with
/// the recorded snapshot, prints the next version and records it.
#[derive(Parser)]
#[command(name = "semtype")]
#[command(author, version)]
#[command(about = "Infer the next semantic version from exported API changes")]
#[command(after_help = "Version rules:
  Breaking   exported declaration removed or changed   -> MAJOR+1.0.0
  Additive   exported declaration added                -> MAJOR.MINOR+1.0
  NoChange   nothing exported changed                  -> MAJOR.MINOR.PATCH+1

Examples:
  semtype                         Version the package in the current directory
  semtype --dir ./pkg --dry-run   Preview without recording
  semtype --format json           Full report with itemized changes")]
pub struct Cli {
    /// Source directory to analyze
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// State file (default: <DIR>/semtype.json)
    #[arg(short, long)]
    state: Option<PathBuf>,

    /// Compute and print the next version without recording it
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Output format (overrides config default)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Print a summary of API changes to stderr
    #[arg(short, long)]
    explain: bool,

    /// Scan subdirectories as well
    #[arg(short, long)]
    recursive: bool,

    /// Treat *_test.go files as part of the API
    #[arg(long)]
    include_tests: bool,

    /// Enable verbose output (debug logging)
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Emit log lines as JSON
    #[arg(long)]
    log_json: bool,

    /// Fail on .semtype.toml errors instead of using defaults
    #[arg(long)]
    strict_config: bool,
}

fn setup_logging(verbose: bool, quiet: bool, json: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs share stderr with diagnostics; stdout carries only the result
    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = SemtypeConfig::load(&cli.dir, cli.strict_config)?;

    // Resolve output format: CLI flag > config default > Text
    let format = cli
        .format
        .or_else(|| config.default_format())
        .unwrap_or_default();
    let output_config = OutputConfig::auto_detect_with_color_override(format, config.use_color());

    // Flags can only turn scanner options on
    let mut scan = config.scan_options();
    scan.recursive |= cli.recursive;
    scan.include_tests |= cli.include_tests;

    let options = PipelineOptions {
        state_path: cli.state.or_else(|| config.state_path(&cli.dir)),
        scan,
        dry_run: cli.dry_run,
        ..PipelineOptions::new(&cli.dir)
    };

    let diagnostics = TracingDiagnostics;
    let report = Pipeline::new(options, &diagnostics)
        .run()
        .with_context(|| format!("Failed to version {}", cli.dir.display()))?;

    if cli.explain {
        eprint!("{}", TextOutput::summary(&report));
    }
    println!("{}", output::render_report(&report, &output_config)?);

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet, cli.log_json);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
