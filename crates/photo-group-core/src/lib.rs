//! Photo Group Core - Domain logic for resumable photo grouping.
//!
//! This crate contains the domain types, port traits, and the scan pipeline:
//! the accumulator, the checkpoint store, the progress reporter, and the
//! scan coordinator that ties them together.

pub mod classifiers;
pub mod coordinator;
pub mod domain;
pub mod ports;
pub mod reporter;
pub mod store;

pub use classifiers::{fraction_from_digest, hash_fraction, IdHashClassifier};
pub use coordinator::{CancelToken, RunOptions, RunOutcome, ScanCoordinator, CHECKPOINT_INTERVAL};
pub use domain::{Accumulator, Checkpoint, GroupSnapshot, Item, PhotoGroup, ScanResult};
pub use ports::{AccessGate, Classifier, ItemSource, ProgressSink, RecordName, RecordStore, ScanEvent};
pub use reporter::ProgressReporter;
pub use store::CheckpointStore;
