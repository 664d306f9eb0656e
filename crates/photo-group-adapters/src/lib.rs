//! Photo Group Adapters - External adapters for photo-group.
//!
//! This crate provides adapters for:
//! - Filesystem item source and access check
//! - Content-hash classification
//! - Durable record storage with atomic writes

pub mod classify;
pub mod fs;
pub mod store;

pub use classify::ContentHashClassifier;
pub use fs::{FsAccessGate, FsItemSource};
pub use store::{state_dir, FsRecordStore};
