//! Serializes coordinator runs within one test binary.

use std::sync::{Mutex, MutexGuard, PoisonError};

static RUNS: Mutex<()> = Mutex::new(());

/// Blocks until no other test in this binary holds the run lock.
///
/// At most one grouping run is active per process. Tests that start a run
/// hold this guard until the run has returned, otherwise a run from a test
/// on another thread sees [`photo_group_core::RunOutcome::Busy`].
#[must_use]
pub fn exclusive_runs() -> MutexGuard<'static, ()> {
    RUNS.lock().unwrap_or_else(PoisonError::into_inner)
}
