//! Delivery of scan events on a dedicated reporting thread.

use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{trace, warn};

use crate::ports::{ProgressSink, ScanEvent};

/// Forwards scan events to a [`ProgressSink`] from its own thread.
///
/// [`ProgressReporter::report`] never blocks the caller. Events reach the
/// sink one at a time, in the order they were reported.
pub struct ProgressReporter {
    sender: Option<Sender<ScanEvent>>,
    worker: Option<JoinHandle<()>>,
}

impl ProgressReporter {
    /// Starts a reporting thread delivering to `sink`.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn start(sink: Arc<dyn ProgressSink>) -> anyhow::Result<Self> {
        let (sender, receiver) = mpsc::channel::<ScanEvent>();
        let worker = thread::Builder::new()
            .name("photo-group-progress".into())
            .spawn(move || {
                for event in receiver {
                    trace!("Delivering {event:?}");
                    sink.on_event(event);
                }
            })?;

        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
        })
    }

    /// Queues an event for delivery.
    pub fn report(&self, event: ScanEvent) {
        let Some(sender) = &self.sender else {
            return;
        };
        if sender.send(event).is_err() {
            warn!("Progress sink is gone, dropping event");
        }
    }

    /// Waits until every queued event has been delivered.
    pub fn finish(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Dropping the sender ends the worker's receive loop.
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Progress sink panicked");
            }
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;

    #[derive(Default)]
    struct SlowSink {
        seen: Mutex<Vec<(usize, thread::ThreadId)>>,
    }

    impl ProgressSink for SlowSink {
        fn on_event(&self, event: ScanEvent) {
            thread::sleep(Duration::from_millis(2));
            if let ScanEvent::Progress { processed, .. } = event {
                if let Ok(mut seen) = self.seen.lock() {
                    seen.push((processed, thread::current().id()));
                }
            }
        }
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_delivers_in_order_on_reporting_thread() {
        let sink = Arc::new(SlowSink::default());
        let reporter = ProgressReporter::start(sink.clone()).unwrap();

        for processed in 1..=20 {
            reporter.report(ScanEvent::Progress {
                processed,
                total: 20,
            });
        }
        reporter.finish();

        let seen = sink.seen.lock().unwrap();
        let order: Vec<usize> = seen.iter().map(|(p, _)| *p).collect();
        assert_eq!(order, (1..=20).collect::<Vec<_>>());
        assert!(seen.iter().all(|(_, id)| *id != thread::current().id()));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_drop_flushes_pending_events() {
        let sink = Arc::new(SlowSink::default());
        {
            let reporter = ProgressReporter::start(sink.clone()).unwrap();
            reporter.report(ScanEvent::Progress {
                processed: 1,
                total: 1,
            });
        }
        assert_eq!(sink.seen.lock().unwrap().len(), 1);
    }
}
