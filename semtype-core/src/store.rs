//! Persisted state: the last computed version and its snapshot.
//!
//! # Format
//!
//! The state is a JSON file, `semtype.json` in the source directory by
//! default:
//!
//! ```json
//! {
//!   "version": "0.2.0",
//!   "exported": {
//!     "types": { "Test": "struct {}" },
//!     "functions": { "Exported": "func()" }
//!   }
//! }
//! ```
//!
//! A missing file means "first run". An unreadable JSON document or a
//! malformed version string is treated as corrupt and replaced by the
//! baseline; only I/O failures are fatal.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::diagnostics::Diagnostics;
use crate::error::{Result, SemtypeError};
use crate::snapshot::Snapshot;
use crate::version::Version;

/// Default state file name, relative to the source directory.
pub const DEFAULT_STATE_FILE: &str = "semtype.json";

/// On-disk record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    pub version: String,
    #[serde(default)]
    pub exported: Snapshot,
}

/// Where the prior state came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateOrigin {
    /// No state file existed.
    Missing,
    /// The state file was read successfully.
    Loaded,
    /// The state file was unusable and the baseline was substituted.
    Corrupt,
}

/// Prior state as seen by the rest of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorState {
    pub version: Version,
    pub snapshot: Snapshot,
    pub origin: StateOrigin,
}

impl PriorState {
    /// Version 0.0.0 with an empty snapshot.
    pub fn baseline(origin: StateOrigin) -> Self {
        Self {
            version: Version::BASELINE,
            snapshot: Snapshot::new(),
            origin,
        }
    }
}

/// Loads and saves the state file.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location inside `source_dir`.
    pub fn in_dir(source_dir: &Path) -> Self {
        Self::new(source_dir.join(DEFAULT_STATE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the prior state, degrading to the baseline when absent or corrupt.
    pub fn load(&self, diagnostics: &dyn Diagnostics) -> Result<PriorState> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                diagnostics.state_missing(&self.path);
                return Ok(PriorState::baseline(StateOrigin::Missing));
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                // Not UTF-8: not ours
                diagnostics.state_corrupt(&self.path, &e.to_string());
                return Ok(PriorState::baseline(StateOrigin::Corrupt));
            }
            Err(e) => return Err(SemtypeError::io(&self.path, e)),
        };

        let state: PersistedState = match serde_json::from_str(&content) {
            Ok(state) => state,
            Err(e) => {
                diagnostics.state_corrupt(&self.path, &format!("failed to decode state: {}", e));
                return Ok(PriorState::baseline(StateOrigin::Corrupt));
            }
        };

        let (version, err) = Version::parse_or_baseline(&state.version);
        if let Some(err) = err {
            diagnostics.state_corrupt(&self.path, &err.to_string());
            return Ok(PriorState::baseline(StateOrigin::Corrupt));
        }

        tracing::debug!(
            path = %self.path.display(),
            version = %version,
            declarations = state.exported.len(),
            "Loaded state"
        );

        Ok(PriorState {
            version,
            snapshot: state.exported,
            origin: StateOrigin::Loaded,
        })
    }

    /// Replace the state file with `version` and `snapshot`.
    ///
    /// The record is written to a temporary file next to the target and
    /// renamed over it, so readers see either the old or the new state.
    pub fn save(&self, version: Version, snapshot: &Snapshot) -> Result<()> {
        let state = PersistedState {
            version: version.to_string(),
            exported: snapshot.clone(),
        };
        let content = serde_json::to_string_pretty(&state)?;

        let write_err = |source: std::io::Error| SemtypeError::StateWrite {
            path: self.path.clone(),
            source,
        };

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(write_err)?;

        let mut tmp = NamedTempFile::new_in(&parent).map_err(write_err)?;
        tmp.write_all(content.as_bytes()).map_err(write_err)?;
        tmp.write_all(b"\n").map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        tracing::debug!(
            path = %self.path.display(),
            version = %version,
            "Saved state"
        );

        Ok(())
    }
}
