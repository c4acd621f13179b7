//! semtype core - semantic version inference from exported API changes.
//!
//! This crate snapshots the exported surface of a Go package, compares it
//! with the snapshot recorded on the previous run, and derives the next
//! semantic version from the comparison.
//!
//! # Features
//!
//! - **Canonical signatures**: formatting, comments and private members never
//!   affect a declaration's signature
//! - **Precedence-ordered classification**: Breaking over Additive over
//!   NoChange, across types and functions alike
//! - **Crash-safe state**: the recorded version and snapshot are replaced
//!   atomically
//!
//! # Usage
//!
//! ```no_run
//! use semtype_core::{Pipeline, PipelineOptions, TracingDiagnostics};
//!
//! let diagnostics = TracingDiagnostics;
//! let report = Pipeline::new(PipelineOptions::new("./pkg"), &diagnostics).run()?;
//! println!("{}", report.next);
//! # Ok::<(), semtype_core::SemtypeError>(())
//! ```

pub mod diagnostics;
pub mod differ;
pub mod error;
pub mod normalizer;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod scanner;
pub mod snapshot;
pub mod store;
pub mod types;
pub mod version;

pub use diagnostics::{Diagnostic, Diagnostics, MemoryDiagnostics, TracingDiagnostics};
pub use differ::{ApiChange, ApiDiff, ChangeKind, Classification};
pub use error::{Result, SemtypeError};
pub use pipeline::{Pipeline, PipelineOptions, RunReport};
pub use scanner::ScanOptions;
pub use snapshot::{Partition, Snapshot, SnapshotBuilder};
pub use store::{StateOrigin, StateStore, DEFAULT_STATE_FILE};
pub use version::{Version, VersionOverflow};
