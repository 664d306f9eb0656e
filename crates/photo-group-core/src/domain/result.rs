//! Snapshot, result, and checkpoint types.

use std::collections::{BTreeMap, HashSet};

use super::PhotoGroup;

/// Display label used for the catch-all list in summaries.
pub const OTHERS_LABEL: &str = "OTHER";

/// An immutable value copy of grouping state.
///
/// Every group in [`PhotoGroup::ALL`] is present, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSnapshot {
    /// Item ids per group, in processing order.
    pub groups: BTreeMap<PhotoGroup, Vec<String>>,
    /// Item ids that matched no group, in processing order.
    pub others: Vec<String>,
}

/// Final grouping of a completed run. Same shape as a snapshot.
pub type ScanResult = GroupSnapshot;

impl GroupSnapshot {
    /// Creates a snapshot with every group present and empty.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            groups: PhotoGroup::ALL.into_iter().map(|g| (g, Vec::new())).collect(),
            others: Vec::new(),
        }
    }

    /// Returns the ids assigned to `group`.
    #[must_use]
    pub fn group(&self, group: PhotoGroup) -> &[String] {
        self.groups.get(&group).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total number of ids across all groups and others.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum::<usize>() + self.others.len()
    }

    /// Returns true if no id has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over every recorded id, groups first in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.groups
            .values()
            .flatten()
            .chain(self.others.iter())
            .map(String::as_str)
    }

    /// Non-empty groups with their counts, followed by others when non-empty.
    ///
    /// Group labels are upper-cased; others use [`OTHERS_LABEL`].
    #[must_use]
    pub fn summary(&self) -> Vec<(String, usize)> {
        let mut rows: Vec<(String, usize)> = self
            .groups
            .iter()
            .filter(|(_, ids)| !ids.is_empty())
            .map(|(group, ids)| (group.as_str().to_uppercase(), ids.len()))
            .collect();
        if !self.others.is_empty() {
            rows.push((OTHERS_LABEL.to_string(), self.others.len()));
        }
        rows
    }

    /// Drops ids that are not in `known`, preserving order.
    ///
    /// Returns the number of ids removed.
    pub fn retain_known(&mut self, known: &HashSet<&str>) -> usize {
        let before = self.len();
        for ids in self.groups.values_mut() {
            ids.retain(|id| known.contains(id.as_str()));
        }
        self.others.retain(|id| known.contains(id.as_str()));
        before - self.len()
    }
}

impl Default for GroupSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// State of an in-flight run, persisted at every cadence point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    /// Number of items processed so far.
    pub processed_count: usize,
    /// Item count captured when the run started.
    pub total_count: usize,
    /// Fingerprint of the ordered id list, when recorded.
    pub fingerprint: Option<String>,
    /// Grouping state at the time of the checkpoint.
    pub snapshot: GroupSnapshot,
}

impl Checkpoint {
    /// Returns true if the recorded state is internally consistent.
    ///
    /// The processed count must not exceed the total and must equal the
    /// number of recorded ids.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.processed_count <= self.total_count && self.snapshot.len() == self.processed_count
    }
}
