//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the grouping core and external adapters.

mod access;
mod classifier;
mod item_source;
mod progress;
mod record_store;

pub use access::AccessGate;
pub use classifier::Classifier;
pub use item_source::ItemSource;
pub use progress::{ProgressSink, ScanEvent};
pub use record_store::{RecordName, RecordStore};
