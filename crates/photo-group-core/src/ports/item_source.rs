//! Item source port for enumerating the collection to group.

use crate::domain::Item;

/// Port for enumerating items in a stable order.
pub trait ItemSource: Send + Sync {
    /// Returns the full ordered item list.
    ///
    /// Two calls against an unchanged collection must return the same items
    /// in the same order.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be enumerated.
    fn items(&self) -> anyhow::Result<Vec<Item>>;

    /// Re-resolves stored identifiers to items, dropping ids that no longer
    /// exist. Order of `ids` is preserved.
    fn resolve(&self, ids: &[String]) -> Vec<Item>;
}
