//! API diff engine for comparing snapshots.
//!
//! # Features
//!
//! - **Classification**: NoChange, Additive or Breaking, with breaking
//!   changes always taking precedence
//! - **Itemized changes**: every added, removed and modified declaration,
//!   with old and new signatures

pub mod changes;
pub mod comparator;

pub use changes::{ApiChange, ApiDiff, ChangeKind, Classification};
pub use comparator::{classify, diff};
