//! Append-only ledger of evaluated identifiers

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Identifiers already evaluated by the classifier in any run
///
/// There is no removal API: once an identifier is recorded it stays, which is
/// what makes rejection permanent across runs. Backed by a sorted set so the
/// persisted form is stable for diffs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeenSet(BTreeSet<String>);

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an identifier. Returns `false` if it was already present.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.0.insert(id.into())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Identifiers in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Whether every identifier in `other` is also recorded here
    pub fn is_superset(&self, other: &SeenSet) -> bool {
        self.0.is_superset(&other.0)
    }
}

impl<S: Into<String>> FromIterator<S> for SeenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
