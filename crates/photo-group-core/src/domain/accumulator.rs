//! In-memory grouping state owned by a single run.

use super::{GroupSnapshot, PhotoGroup};

/// Mutable grouping state for the run in progress.
///
/// Only the scan coordinator mutates an accumulator. Everything it hands to
/// other components goes through [`Accumulator::snapshot`], which performs a
/// deep copy.
#[derive(Debug, Default)]
pub struct Accumulator {
    state: GroupSnapshot,
}

impl Accumulator {
    /// Creates an accumulator with every group present and empty.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: GroupSnapshot::empty(),
        }
    }

    /// Restores an accumulator from a persisted snapshot.
    ///
    /// Groups missing from the snapshot are filled in empty.
    #[must_use]
    pub fn restore(snapshot: GroupSnapshot) -> Self {
        let mut state = snapshot;
        for group in PhotoGroup::ALL {
            state.groups.entry(group).or_default();
        }
        Self { state }
    }

    /// Records an item id under `group`, or under others when `None`.
    pub fn record(&mut self, id: String, group: Option<PhotoGroup>) {
        match group {
            Some(group) => self.state.groups.entry(group).or_default().push(id),
            None => self.state.others.push(id),
        }
    }

    /// Number of ids recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Takes an immutable value copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> GroupSnapshot {
        self.state.clone()
    }

    /// Consumes the accumulator, returning the final state.
    #[must_use]
    pub fn into_result(self) -> GroupSnapshot {
        self.state
    }
}
