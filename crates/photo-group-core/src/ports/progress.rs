//! Progress reporting port for UI integration.

use crate::domain::{GroupSnapshot, ScanResult};

/// Events emitted during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// Items processed so far.
    Progress {
        /// Items processed, including restored ones.
        processed: usize,
        /// Items in this run.
        total: usize,
    },
    /// Partial grouping at a cadence point.
    Snapshot(GroupSnapshot),
    /// The run finished. Always the last event of a completed run.
    Completed(ScanResult),
    /// The run was cancelled. Always the last event of a cancelled run.
    Cancelled {
        /// Items processed before cancellation was observed.
        processed: usize,
        /// Items in this run.
        total: usize,
    },
}

impl ScanEvent {
    /// Returns true for events that end a run.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed(_) | Self::Cancelled { .. })
    }
}

/// Port for receiving scan events.
pub trait ProgressSink: Send + Sync {
    /// Called when a scan event occurs.
    fn on_event(&self, event: ScanEvent);
}
