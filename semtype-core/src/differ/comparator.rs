//! Comparator logic for diffing snapshots.
//!
//! Comparison is keyed: set difference over names, equality over
//! signatures. Map iteration order only affects the order changes are
//! reported in, and the result is sorted anyway.

use std::collections::BTreeMap;

use crate::differ::changes::{ApiChange, ApiDiff, Classification};
use crate::snapshot::{Partition, Snapshot};

/// Diff one partition.
fn diff_partition(
    partition: Partition,
    previous: &BTreeMap<String, String>,
    current: &BTreeMap<String, String>,
    changes: &mut Vec<ApiChange>,
) {
    // Removed or modified: anything previously public must survive unchanged
    for (name, old) in previous {
        match current.get(name) {
            None => changes.push(ApiChange::removed(partition, name, old)),
            Some(new) if new != old => {
                changes.push(ApiChange::modified(partition, name, old, new))
            }
            Some(_) => {}
        }
    }

    // Added
    for (name, new) in current {
        if !previous.contains_key(name) {
            changes.push(ApiChange::added(partition, name, new));
        }
    }
}

/// Compute every change between two snapshots.
pub fn diff(previous: &Snapshot, current: &Snapshot) -> ApiDiff {
    let mut changes = Vec::new();

    for partition in [Partition::Type, Partition::Function] {
        diff_partition(
            partition,
            previous.partition(partition),
            current.partition(partition),
            &mut changes,
        );
    }

    changes.sort_by(|a, b| {
        a.partition
            .cmp(&b.partition)
            .then_with(|| a.name.cmp(&b.name))
    });

    ApiDiff { changes }
}

/// Classify the difference between two snapshots.
///
/// Breaking if anything previously exported is gone or changed, otherwise
/// Additive if anything new is exported, otherwise NoChange.
pub fn classify(previous: &Snapshot, current: &Snapshot) -> Classification {
    let mut result = Classification::NoChange;

    for partition in [Partition::Type, Partition::Function] {
        let prev = previous.partition(partition);
        let curr = current.partition(partition);

        if prev.iter().any(|(name, old)| curr.get(name) != Some(old)) {
            return Classification::Breaking;
        }
        if curr.keys().any(|name| !prev.contains_key(name)) {
            result = Classification::Additive;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::differ::ChangeKind;

    fn snapshot(types: &[(&str, &str)], functions: &[(&str, &str)]) -> Snapshot {
        let mut s = Snapshot::new();
        for (name, sig) in types {
            s.insert(Partition::Type, name.to_string(), sig.to_string());
        }
        for (name, sig) in functions {
            s.insert(Partition::Function, name.to_string(), sig.to_string());
        }
        s
    }

    fn assert_both(previous: &Snapshot, current: &Snapshot, expected: Classification) {
        assert_eq!(classify(previous, current), expected);
        assert_eq!(diff(previous, current).classification(), expected);
    }

    #[test]
    fn test_empty_snapshots_are_no_change() {
        assert_both(&Snapshot::new(), &Snapshot::new(), Classification::NoChange);
    }

    #[test]
    fn test_identical_snapshots_are_no_change() {
        let s = snapshot(&[("Test", "struct {}")], &[("Exported", "func()")]);
        assert_both(&s, &s.clone(), Classification::NoChange);
        assert!(diff(&s, &s).is_empty());
    }

    #[test]
    fn test_addition_is_additive() {
        let prev = snapshot(&[("Test", "struct {}")], &[]);
        let curr = snapshot(&[("Test", "struct {}")], &[("Exported", "func()")]);
        assert_both(&prev, &curr, Classification::Additive);
    }

    #[test]
    fn test_removal_is_breaking() {
        let prev = snapshot(&[], &[("Exported", "func()")]);
        assert_both(&prev, &Snapshot::new(), Classification::Breaking);
    }

    #[test]
    fn test_modification_is_breaking() {
        let prev = snapshot(&[], &[("Exported", "func(a int)")]);
        let curr = snapshot(&[], &[("Exported", "func(a int, b int)")]);
        assert_both(&prev, &curr, Classification::Breaking);

        let d = diff(&prev, &curr);
        assert_eq!(d.changes.len(), 1);
        assert_eq!(d.changes[0].kind, ChangeKind::Modified);
        assert_eq!(d.changes[0].old_signature.as_deref(), Some("func(a int)"));
    }

    #[test]
    fn test_breaking_dominates_additive_across_partitions() {
        // An addition in types must not hide a removal in functions
        let prev = snapshot(&[], &[("Old", "func()")]);
        let curr = snapshot(&[("New", "struct {}")], &[]);
        assert_both(&prev, &curr, Classification::Breaking);

        // A rename is a removal plus an addition
        let prev = snapshot(&[], &[("Old", "func()")]);
        let curr = snapshot(&[], &[("New", "func()")]);
        assert_both(&prev, &curr, Classification::Breaking);
    }

    #[test]
    fn test_partitions_are_independent() {
        let prev = snapshot(&[("Option", "int")], &[]);
        let curr = snapshot(&[], &[("Option", "int")]);
        assert_both(&prev, &curr, Classification::Breaking);
    }

    #[test]
    fn test_changes_are_sorted() {
        let prev = snapshot(&[("B", "int")], &[("z", "func()")]);
        let curr = snapshot(&[("A", "int"), ("B", "string")], &[("a", "func()")]);
        let d = diff(&prev, &curr);
        let order: Vec<(Partition, &str)> = d
            .changes
            .iter()
            .map(|c| (c.partition, c.name.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                (Partition::Type, "A"),
                (Partition::Type, "B"),
                (Partition::Function, "a"),
                (Partition::Function, "z"),
            ]
        );
    }
}
