//! Exported-API snapshots.
//!
//! A snapshot maps every exported declaration name to its normalized
//! signature, split into two independent namespaces: types and functions
//! (methods live with functions under `Receiver.Method`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::normalizer::Normalizer;
use crate::parser;
use crate::types::{ParsedFile, SourceFile};

/// Which namespace of a snapshot a declaration belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    Type,
    Function,
}

impl Partition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::Type => "type",
            Partition::Function => "function",
        }
    }
}

/// The exported API of a package at one point in time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub types: BTreeMap<String, String>,
    #[serde(default)]
    pub functions: BTreeMap<String, String>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn partition(&self, partition: Partition) -> &BTreeMap<String, String> {
        match partition {
            Partition::Type => &self.types,
            Partition::Function => &self.functions,
        }
    }

    pub fn partition_mut(&mut self, partition: Partition) -> &mut BTreeMap<String, String> {
        match partition {
            Partition::Type => &mut self.types,
            Partition::Function => &mut self.functions,
        }
    }

    /// Insert a declaration, replacing any previous entry with the same name.
    pub fn insert(&mut self, partition: Partition, name: String, signature: String) {
        self.partition_mut(partition).insert(name, signature);
    }

    /// Total number of exported declarations.
    pub fn len(&self) -> usize {
        self.types.len() + self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.functions.is_empty()
    }
}

/// Builds snapshots from parsed files.
pub struct SnapshotBuilder<'a> {
    normalizer: Normalizer<'a>,
}

impl<'a> SnapshotBuilder<'a> {
    pub fn new(diagnostics: &'a dyn Diagnostics) -> Self {
        Self {
            normalizer: Normalizer::new(diagnostics),
        }
    }

    /// Build a snapshot from already parsed files.
    ///
    /// When two declarations share a name within a partition, the one
    /// processed last wins.
    pub fn build(&self, files: &[ParsedFile]) -> Snapshot {
        let mut snapshot = Snapshot::new();

        for file in files {
            for decl in &file.declarations {
                if let Some(normalized) = self.normalizer.normalize(decl) {
                    snapshot.insert(normalized.partition, normalized.name, normalized.signature);
                }
            }
            tracing::debug!(
                path = %file.path.display(),
                declarations = file.declarations.len(),
                "Processed file"
            );
        }

        snapshot
    }

    /// Parse and build in one step. Any parse failure fails the whole build.
    pub fn build_from_sources(&self, sources: &[SourceFile]) -> Result<Snapshot> {
        let parsed = parser::parse_files(sources)?;
        Ok(self.build(&parsed))
    }
}
