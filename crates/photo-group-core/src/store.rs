//! Checkpoint and result persistence on top of a [`RecordStore`].
//!
//! Documents are JSON with the field names below; they are shared with any
//! existing persisted data, so they must not change:
//!
//! ```text
//! scanProgress: { processedCount, totalCount, fingerprint?, buckets, others }
//! scanResult:   { buckets, others }
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{Checkpoint, GroupSnapshot, PhotoGroup, ScanResult};
use crate::ports::{RecordName, RecordStore};

/// On-disk form of a checkpoint.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedProgress {
    processed_count: usize,
    total_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fingerprint: Option<String>,
    buckets: BTreeMap<String, Vec<String>>,
    others: Vec<String>,
}

/// On-disk form of a completed result.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedResult {
    buckets: BTreeMap<String, Vec<String>>,
    others: Vec<String>,
}

/// Typed access to the checkpoint and result records.
///
/// Loads never fail: a missing, unreadable, or unparseable record is
/// reported as absent and logged.
#[derive(Clone)]
pub struct CheckpointStore {
    records: Arc<dyn RecordStore>,
}

impl CheckpointStore {
    /// Creates a store over the given record backend.
    #[must_use]
    pub fn new(records: Arc<dyn RecordStore>) -> Self {
        Self { records }
    }

    /// Overwrites the checkpoint record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be encoded or written.
    pub fn save_checkpoint(&self, checkpoint: &Checkpoint) -> anyhow::Result<()> {
        let persisted = PersistedProgress {
            processed_count: checkpoint.processed_count,
            total_count: checkpoint.total_count,
            fingerprint: checkpoint.fingerprint.clone(),
            buckets: encode_groups(&checkpoint.snapshot),
            others: checkpoint.snapshot.others.clone(),
        };
        let bytes = serde_json::to_vec(&persisted)?;
        self.records.put(RecordName::Progress, &bytes)
    }

    /// Loads the checkpoint record, if present and readable.
    #[must_use]
    pub fn load_checkpoint(&self) -> Option<Checkpoint> {
        let persisted: PersistedProgress = self.load_record(RecordName::Progress)?;
        Some(Checkpoint {
            processed_count: persisted.processed_count,
            total_count: persisted.total_count,
            fingerprint: persisted.fingerprint,
            snapshot: decode_groups(persisted.buckets, persisted.others),
        })
    }

    /// Deletes the checkpoint record. Failures are logged.
    pub fn clear_checkpoint(&self) {
        if let Err(e) = self.records.delete(RecordName::Progress) {
            warn!("Failed to clear {}: {e:#}", RecordName::Progress);
        }
    }

    /// Returns true if a checkpoint record exists.
    #[must_use]
    pub fn has_pending_checkpoint(&self) -> bool {
        self.records.contains(RecordName::Progress)
    }

    /// Overwrites the result record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be encoded or written.
    pub fn save_persisted_result(&self, result: &ScanResult) -> anyhow::Result<()> {
        let persisted = PersistedResult {
            buckets: encode_groups(result),
            others: result.others.clone(),
        };
        let bytes = serde_json::to_vec(&persisted)?;
        self.records.put(RecordName::Result, &bytes)
    }

    /// Loads the result record, if present and readable.
    #[must_use]
    pub fn load_persisted_result(&self) -> Option<ScanResult> {
        let persisted: PersistedResult = self.load_record(RecordName::Result)?;
        Some(decode_groups(persisted.buckets, persisted.others))
    }

    /// Deletes the result record. Failures are logged.
    pub fn clear_persisted_result(&self) {
        if let Err(e) = self.records.delete(RecordName::Result) {
            warn!("Failed to clear {}: {e:#}", RecordName::Result);
        }
    }

    fn load_record<T: for<'de> Deserialize<'de>>(&self, name: RecordName) -> Option<T> {
        let bytes = match self.records.get(name) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("No {name} record");
                return None;
            }
            Err(e) => {
                warn!("Failed to read {name}: {e:#}");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring unreadable {name} record: {e}");
                None
            }
        }
    }
}

fn encode_groups(snapshot: &GroupSnapshot) -> BTreeMap<String, Vec<String>> {
    snapshot
        .groups
        .iter()
        .map(|(group, ids)| (group.as_str().to_string(), ids.clone()))
        .collect()
}

fn decode_groups(buckets: BTreeMap<String, Vec<String>>, others: Vec<String>) -> GroupSnapshot {
    let mut snapshot = GroupSnapshot::empty();
    for (key, ids) in buckets {
        match key.parse::<PhotoGroup>() {
            Ok(group) => {
                snapshot.groups.insert(group, ids);
            }
            Err(e) => warn!("Skipping {} stored ids: {e}", ids.len()),
        }
    }
    snapshot.others = others;
    snapshot
}
