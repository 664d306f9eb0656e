//! Scan coordinator: runs one resumable grouping pass over an item source.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use crate::domain::{fingerprint, Accumulator, Checkpoint, Item, ScanResult};
use crate::ports::{Classifier, ItemSource, ProgressSink, RecordStore, ScanEvent};
use crate::reporter::ProgressReporter;
use crate::store::CheckpointStore;

/// Items processed between two checkpoints.
pub const CHECKPOINT_INTERVAL: usize = 10;

/// Options for a single run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Continue from a valid checkpoint instead of starting over.
    pub resume_if_possible: bool,
}

/// How a call to [`ScanCoordinator::run`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every item was processed; the result has been persisted.
    Completed(ScanResult),
    /// Cancellation was observed; the last checkpoint is kept for resume.
    Cancelled {
        /// Items processed before cancellation was observed.
        processed: usize,
        /// Items in this run.
        total: usize,
    },
    /// Another run was active. Nothing happened.
    Busy,
    /// The run could not start. No events were delivered.
    Aborted(String),
}

/// Shared flag asking a run to stop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns true once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Set while any run in this process is active.
static RUN_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Holds the process-wide run flag; clears it on every exit path.
struct ActiveGuard;

impl ActiveGuard {
    fn acquire() -> Option<Self> {
        RUN_ACTIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
            .then_some(Self)
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        RUN_ACTIVE.store(false, Ordering::Release);
    }
}

/// Orchestrates grouping runs.
///
/// Owns the accumulator for the duration of a run. At most one run is
/// active per process, across all coordinators; a concurrent call to
/// [`ScanCoordinator::run`] returns [`RunOutcome::Busy`] without side effects.
pub struct ScanCoordinator {
    source: Arc<dyn ItemSource>,
    classifier: Arc<dyn Classifier>,
    store: CheckpointStore,
}

impl ScanCoordinator {
    /// Creates a coordinator over the given ports.
    #[must_use]
    pub fn new(
        source: Arc<dyn ItemSource>,
        classifier: Arc<dyn Classifier>,
        records: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            source,
            classifier,
            store: CheckpointStore::new(records),
        }
    }

    /// Returns true while a run is active anywhere in this process.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn is_running(&self) -> bool {
        RUN_ACTIVE.load(Ordering::Acquire)
    }

    /// Returns true if an interrupted run left a checkpoint behind.
    #[must_use]
    pub fn has_pending_checkpoint(&self) -> bool {
        self.store.has_pending_checkpoint()
    }

    /// Loads the pending checkpoint, if any.
    #[must_use]
    pub fn load_checkpoint(&self) -> Option<Checkpoint> {
        self.store.load_checkpoint()
    }

    /// Persists a completed result.
    ///
    /// # Errors
    ///
    /// Returns an error if the result record cannot be written.
    pub fn save_persisted_result(&self, result: &ScanResult) -> anyhow::Result<()> {
        self.store.save_persisted_result(result)
    }

    /// Loads the result of the most recently completed run.
    #[must_use]
    pub fn load_persisted_result(&self) -> Option<ScanResult> {
        self.store.load_persisted_result()
    }

    /// Deletes both the checkpoint and the persisted result.
    ///
    /// Returns false without touching anything while a run is active.
    pub fn clear_persisted_state(&self) -> bool {
        if self.is_running() {
            return false;
        }
        self.store.clear_checkpoint();
        self.store.clear_persisted_result();
        true
    }

    /// Runs a grouping pass on the calling thread.
    ///
    /// Events are delivered to `sink` on a separate reporting thread, in
    /// order; all of them have been delivered when this returns.
    pub fn run(
        &self,
        options: RunOptions,
        sink: Arc<dyn ProgressSink>,
        cancel: &CancelToken,
    ) -> RunOutcome {
        let Some(_guard) = ActiveGuard::acquire() else {
            debug!("Scan already running, ignoring request");
            return RunOutcome::Busy;
        };

        let items = match self.source.items() {
            Ok(items) => items,
            Err(e) => {
                warn!("Failed to enumerate items: {e:#}");
                return RunOutcome::Aborted(format!("{e:#}"));
            }
        };

        let reporter = match ProgressReporter::start(sink) {
            Ok(reporter) => reporter,
            Err(e) => {
                warn!("Failed to start progress reporter: {e:#}");
                return RunOutcome::Aborted(format!("{e:#}"));
            }
        };

        info!(
            "Grouping {} items with {} classifier",
            items.len(),
            self.classifier.name()
        );
        let outcome = self.execute(options, &items, &reporter, cancel);
        reporter.finish();
        outcome
    }

    /// Runs a grouping pass on a new work thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(
        self: &Arc<Self>,
        options: RunOptions,
        sink: Arc<dyn ProgressSink>,
        cancel: CancelToken,
    ) -> anyhow::Result<JoinHandle<RunOutcome>> {
        let coordinator = Arc::clone(self);
        let handle = thread::Builder::new()
            .name("photo-group-scan".into())
            .spawn(move || coordinator.run(options, sink, &cancel))?;
        Ok(handle)
    }

    fn execute(
        &self,
        options: RunOptions,
        items: &[Item],
        reporter: &ProgressReporter,
        cancel: &CancelToken,
    ) -> RunOutcome {
        let total = items.len();
        let fingerprint = fingerprint(items);
        let (mut accumulator, start) = self.resume_point(options, total, &fingerprint);

        if start > 0 {
            reporter.report(ScanEvent::Progress {
                processed: start,
                total,
            });
            reporter.report(ScanEvent::Snapshot(accumulator.snapshot()));
        }

        if start >= total {
            return self.finalize(accumulator, reporter);
        }

        for (index, item) in items.iter().enumerate().skip(start) {
            if cancel.is_cancelled() {
                info!("Scan cancelled at {index}/{total}");
                reporter.report(ScanEvent::Cancelled {
                    processed: index,
                    total,
                });
                return RunOutcome::Cancelled {
                    processed: index,
                    total,
                };
            }

            let group = match self.classifier.classify(item) {
                Ok(group) => group,
                Err(e) => {
                    warn!("Classifier failed for {}: {e:#}", item.id);
                    None
                }
            };
            accumulator.record(item.id.clone(), group);

            let processed = index + 1;
            if processed % CHECKPOINT_INTERVAL == 0 || processed == total {
                let snapshot = accumulator.snapshot();
                let checkpoint = Checkpoint {
                    processed_count: processed,
                    total_count: total,
                    fingerprint: Some(fingerprint.clone()),
                    snapshot: snapshot.clone(),
                };
                if let Err(e) = self.store.save_checkpoint(&checkpoint) {
                    warn!("Failed to save checkpoint at {processed}/{total}: {e:#}");
                } else {
                    debug!("Checkpoint at {processed}/{total}");
                }

                reporter.report(ScanEvent::Progress { processed, total });
                reporter.report(ScanEvent::Snapshot(snapshot));
            }
        }

        self.finalize(accumulator, reporter)
    }

    /// Decides where the run starts.
    ///
    /// Anything other than a valid, matching checkpoint is discarded.
    fn resume_point(
        &self,
        options: RunOptions,
        total: usize,
        fingerprint: &str,
    ) -> (Accumulator, usize) {
        if options.resume_if_possible {
            match self.store.load_checkpoint() {
                Some(checkpoint) if is_resumable(&checkpoint, total, fingerprint) => {
                    info!(
                        "Resuming scan at {}/{}",
                        checkpoint.processed_count, checkpoint.total_count
                    );
                    let start = checkpoint.processed_count;
                    return (Accumulator::restore(checkpoint.snapshot), start);
                }
                Some(checkpoint) => {
                    info!(
                        "Discarding stale checkpoint ({}/{}, {} items now)",
                        checkpoint.processed_count, checkpoint.total_count, total
                    );
                }
                None => debug!("No checkpoint to resume"),
            }
        }

        self.store.clear_checkpoint();
        (Accumulator::new(), 0)
    }

    fn finalize(&self, accumulator: Accumulator, reporter: &ProgressReporter) -> RunOutcome {
        let result = accumulator.into_result();
        if let Err(e) = self.store.save_persisted_result(&result) {
            warn!("Failed to save scan result: {e:#}");
        }
        self.store.clear_checkpoint();

        info!(
            "Scan complete: {} items, {} unmatched",
            result.len(),
            result.others.len()
        );
        reporter.report(ScanEvent::Completed(result.clone()));
        RunOutcome::Completed(result)
    }
}

/// A checkpoint is resumable when it was taken over the same collection.
///
/// The item count must match. When the checkpoint carries a fingerprint of
/// the ordered ids, that must match too.
fn is_resumable(checkpoint: &Checkpoint, total: usize, fingerprint: &str) -> bool {
    checkpoint.total_count == total
        && checkpoint.is_consistent()
        && checkpoint
            .fingerprint
            .as_deref()
            .map_or(true, |stored| stored == fingerprint)
}
