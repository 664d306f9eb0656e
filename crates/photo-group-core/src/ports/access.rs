//! Access authorization port.

/// Port for the one-time capability check performed before a run.
pub trait AccessGate: Send + Sync {
    /// Returns true if the caller may read the item collection.
    ///
    /// A `false` answer is terminal for the run attempt; no work is done.
    fn authorize(&self) -> bool;
}
