//! One end-to-end run: load state, snapshot the sources, classify, bump, save.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::diagnostics::Diagnostics;
use crate::differ::{self, ApiChange, Classification};
use crate::error::Result;
use crate::scanner::{self, ScanOptions};
use crate::snapshot::{Snapshot, SnapshotBuilder};
use crate::store::{StateOrigin, StateStore};
use crate::version::Version;

/// Inputs for a run.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Package directory to inspect.
    pub source_dir: PathBuf,
    /// State file location. Defaults to `semtype.json` in `source_dir`.
    pub state_path: Option<PathBuf>,
    pub scan: ScanOptions,
    /// Compute the next version without writing state.
    pub dry_run: bool,
}

impl PipelineOptions {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            ..Default::default()
        }
    }

    fn store(&self) -> StateStore {
        match &self.state_path {
            Some(path) => StateStore::new(path.clone()),
            None => StateStore::in_dir(&self.source_dir),
        }
    }
}

/// Outcome of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub previous: Version,
    pub next: Version,
    pub classification: Classification,
    pub changes: Vec<ApiChange>,
    pub state_path: PathBuf,
    pub state_origin: StateOrigin,
    /// False in dry-run mode.
    pub persisted: bool,
    #[serde(skip)]
    pub snapshot: Snapshot,
}

pub struct Pipeline<'a> {
    options: PipelineOptions,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> Pipeline<'a> {
    pub fn new(options: PipelineOptions, diagnostics: &'a dyn Diagnostics) -> Self {
        Self {
            options,
            diagnostics,
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.options.source_dir
    }

    /// Execute the run. Nothing is written unless every step succeeds.
    pub fn run(&self) -> Result<RunReport> {
        let store = self.options.store();
        let prior = store.load(self.diagnostics)?;

        let paths = scanner::scan_directory(&self.options.source_dir, &self.options.scan)?;
        let sources = scanner::read_sources(&paths)?;
        let current = SnapshotBuilder::new(self.diagnostics).build_from_sources(&sources)?;

        let api_diff = differ::diff(&prior.snapshot, &current);
        for change in &api_diff.changes {
            self.diagnostics.api_change(change);
        }
        let classification = api_diff.classification();
        let next = prior.version.bump(classification)?;

        tracing::info!(
            previous = %prior.version,
            next = %next,
            classification = %classification,
            files = sources.len(),
            declarations = current.len(),
            "Computed version"
        );

        let persisted = if self.options.dry_run {
            tracing::debug!("Dry run, state not written");
            false
        } else {
            store.save(next, &current)?;
            true
        };

        Ok(RunReport {
            previous: prior.version,
            next,
            classification,
            changes: api_diff.changes,
            state_path: store.path().to_path_buf(),
            state_origin: prior.origin,
            persisted,
            snapshot: current,
        })
    }
}
