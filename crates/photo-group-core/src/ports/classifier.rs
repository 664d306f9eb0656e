//! Classification port.

use crate::domain::{Item, PhotoGroup};

/// Port for the deterministic per-item classifier.
///
/// The same item must always map to the same answer.
pub trait Classifier: Send + Sync {
    /// Returns the name of this classifier.
    fn name(&self) -> &'static str;

    /// Classifies an item into a group, or `None` when no group matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the item cannot be inspected. The scan pipeline
    /// treats an error as "no match".
    fn classify(&self, item: &Item) -> anyhow::Result<Option<PhotoGroup>>;
}
