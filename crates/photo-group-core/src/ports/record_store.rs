//! Named-record storage port.

use std::fmt;

/// The fixed set of records the pipeline persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordName {
    /// In-progress run checkpoint.
    Progress,
    /// Result of the most recently completed run.
    Result,
}

impl RecordName {
    /// Returns the stable record name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Progress => "scanProgress",
            Self::Result => "scanResult",
        }
    }
}

impl fmt::Display for RecordName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Port for whole-document persistence of named records.
///
/// Implementations must make `put` atomic: a concurrent or later `get`
/// observes either the previous document or the new one, never a mix.
pub trait RecordStore: Send + Sync {
    /// Reads a record. Returns `Ok(None)` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be read.
    fn get(&self, name: RecordName) -> anyhow::Result<Option<Vec<u8>>>;

    /// Replaces a record with `bytes`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; the previous document is kept.
    fn put(&self, name: RecordName, bytes: &[u8]) -> anyhow::Result<()>;

    /// Deletes a record. Deleting a missing record is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be removed.
    fn delete(&self, name: RecordName) -> anyhow::Result<()>;

    /// Returns true if the record exists.
    fn contains(&self, name: RecordName) -> bool;
}
