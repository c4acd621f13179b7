//! Change types and result structures for API diffs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::snapshot::Partition;

/// Type of change detected for one declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Removed => "removed",
            ChangeKind::Modified => "modified",
        }
    }

    /// How much this kind of change bumps the version.
    pub fn classification(&self) -> Classification {
        match self {
            ChangeKind::Added => Classification::Additive,
            ChangeKind::Removed | ChangeKind::Modified => Classification::Breaking,
        }
    }
}

/// Overall outcome of comparing two snapshots.
///
/// Ordered by precedence: `NoChange < Additive < Breaking`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    #[default]
    NoChange,
    Additive,
    Breaking,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::NoChange => "no_change",
            Classification::Additive => "additive",
            Classification::Breaking => "breaking",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single change to an exported declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiChange {
    pub kind: ChangeKind,
    pub partition: Partition,
    pub name: String,

    /// Signature before the change (absent for additions)
    pub old_signature: Option<String>,

    /// Signature after the change (absent for removals)
    pub new_signature: Option<String>,
}

impl ApiChange {
    pub fn added(partition: Partition, name: &str, signature: &str) -> Self {
        Self {
            kind: ChangeKind::Added,
            partition,
            name: name.to_string(),
            old_signature: None,
            new_signature: Some(signature.to_string()),
        }
    }

    pub fn removed(partition: Partition, name: &str, signature: &str) -> Self {
        Self {
            kind: ChangeKind::Removed,
            partition,
            name: name.to_string(),
            old_signature: Some(signature.to_string()),
            new_signature: None,
        }
    }

    pub fn modified(partition: Partition, name: &str, old: &str, new: &str) -> Self {
        Self {
            kind: ChangeKind::Modified,
            partition,
            name: name.to_string(),
            old_signature: Some(old.to_string()),
            new_signature: Some(new.to_string()),
        }
    }

    pub fn is_breaking(&self) -> bool {
        self.kind.classification() == Classification::Breaking
    }
}

/// Every change between two snapshots, sorted by partition then name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiDiff {
    pub changes: Vec<ApiChange>,
}

impl ApiDiff {
    /// The highest-precedence classification over all changes.
    pub fn classification(&self) -> Classification {
        self.changes
            .iter()
            .map(|c| c.kind.classification())
            .max()
            .unwrap_or(Classification::NoChange)
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn breaking_changes(&self) -> impl Iterator<Item = &ApiChange> {
        self.changes.iter().filter(|c| c.is_breaking())
    }

    /// Count of changes of one kind.
    pub fn count(&self, kind: ChangeKind) -> usize {
        self.changes.iter().filter(|c| c.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_order() {
        assert!(Classification::NoChange < Classification::Additive);
        assert!(Classification::Additive < Classification::Breaking);
        assert_eq!(Classification::default(), Classification::NoChange);
    }

    #[test]
    fn test_diff_classification_takes_max() {
        let diff = ApiDiff {
            changes: vec![
                ApiChange::added(Partition::Function, "New", "func()"),
                ApiChange::removed(Partition::Function, "Old", "func()"),
            ],
        };
        assert_eq!(diff.classification(), Classification::Breaking);
        assert_eq!(diff.breaking_changes().count(), 1);
        assert_eq!(diff.count(ChangeKind::Added), 1);

        assert_eq!(ApiDiff::default().classification(), Classification::NoChange);
    }

    #[test]
    fn test_serialized_names() {
        let change = ApiChange::modified(Partition::Type, "Test", "struct {}", "struct { Name string }");
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["kind"], "modified");
        assert_eq!(json["partition"], "type");
        assert_eq!(
            serde_json::to_value(Classification::NoChange).unwrap(),
            "no_change"
        );
    }
}
