//! Diagnostics sink.
//!
//! Components never log through a global; they receive a `&dyn Diagnostics`
//! at construction time and report recoverable anomalies through it. The
//! default [`TracingDiagnostics`] forwards everything to `tracing`;
//! [`MemoryDiagnostics`] records events for inspection in tests.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::differ::ApiChange;
use crate::render::RenderError;

/// Receiver for non-fatal events raised during a run.
pub trait Diagnostics {
    /// A declaration could not be rendered and was left out of the snapshot.
    fn declaration_skipped(&self, name: &str, error: &RenderError);

    /// No state file exists yet; the baseline is used.
    fn state_missing(&self, path: &Path);

    /// The state file exists but is unusable; the baseline is used.
    fn state_corrupt(&self, path: &Path, reason: &str);

    /// One itemized API change found by the classifier.
    fn api_change(&self, change: &ApiChange);
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn declaration_skipped(&self, name: &str, error: &RenderError) {
        tracing::warn!(declaration = name, error = %error, "Failed to format declaration, skipping");
    }

    fn state_missing(&self, path: &Path) {
        tracing::debug!(path = %path.display(), "No state file, starting from 0.0.0");
    }

    fn state_corrupt(&self, path: &Path, reason: &str) {
        tracing::warn!(path = %path.display(), reason, "Ignoring corrupt state file, starting from 0.0.0");
    }

    fn api_change(&self, change: &ApiChange) {
        tracing::info!(
            kind = change.kind.as_str(),
            partition = change.partition.as_str(),
            name = %change.name,
            "API change"
        );
    }
}

/// A recorded diagnostic event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    DeclarationSkipped { name: String, error: RenderError },
    StateMissing { path: PathBuf },
    StateCorrupt { path: PathBuf, reason: String },
    ApiChange(ApiChange),
}

/// Collects diagnostics in memory.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    events: RefCell<Vec<Diagnostic>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<Diagnostic> {
        self.events.borrow().clone()
    }

    fn record(&self, event: Diagnostic) {
        self.events.borrow_mut().push(event);
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn declaration_skipped(&self, name: &str, error: &RenderError) {
        self.record(Diagnostic::DeclarationSkipped {
            name: name.to_string(),
            error: error.clone(),
        });
    }

    fn state_missing(&self, path: &Path) {
        self.record(Diagnostic::StateMissing {
            path: path.to_path_buf(),
        });
    }

    fn state_corrupt(&self, path: &Path, reason: &str) {
        self.record(Diagnostic::StateCorrupt {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        });
    }

    fn api_change(&self, change: &ApiChange) {
        self.record(Diagnostic::ApiChange(change.clone()));
    }
}
