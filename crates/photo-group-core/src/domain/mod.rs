//! Core domain types for photo grouping.

mod accumulator;
mod group;
mod item;
mod result;

pub use accumulator::Accumulator;
pub use group::{PhotoGroup, UnknownGroup};
pub use item::{fingerprint, Item};
pub use result::{Checkpoint, GroupSnapshot, ScanResult, OTHERS_LABEL};
