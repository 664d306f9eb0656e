//! Test support utilities for photo-group.
//!
//! Provides mocks of every core port and item builders for testing the
//! grouping pipeline.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use photo_group_core::{IdHashClassifier, RunOptions, CancelToken, ScanCoordinator};
//! use photo_group_test_support::{ItemBuilder, MemoryRecordStore, MockItemSource, RecordingSink};
//!
//! let source = MockItemSource::new(ItemBuilder::numbered(25));
//! let coordinator = ScanCoordinator::new(
//!     Arc::new(source),
//!     Arc::new(IdHashClassifier),
//!     Arc::new(MemoryRecordStore::new()),
//! );
//!
//! let sink = Arc::new(RecordingSink::new());
//! coordinator.run(RunOptions::default(), sink.clone(), &CancelToken::new());
//! assert_eq!(sink.progress_points(), vec![10, 20, 25]);
//! ```

mod builders;
mod mocks;
mod runs;

pub use builders::ItemBuilder;
pub use mocks::{
    MemoryRecordStore, MockAccessGate, MockItemSource, RecordingSink, ScriptedClassifier,
};
pub use runs::exclusive_runs;
