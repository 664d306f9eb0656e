//! Mock implementations of core port traits.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use photo_group_core::{
    AccessGate, CancelToken, Classifier, GroupSnapshot, IdHashClassifier, Item, ItemSource,
    PhotoGroup, ProgressSink, RecordName, RecordStore, ScanEvent, ScanResult,
};

/// Mock implementation of `ItemSource` for testing.
///
/// Yields a replaceable item list and tracks enumeration for assertions.
pub struct MockItemSource {
    items: Mutex<Vec<Item>>,
    fail: AtomicBool,
    enumeration_count: AtomicUsize,
}

impl MockItemSource {
    /// Creates a new mock source with the given items.
    #[must_use]
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items: Mutex::new(items),
            fail: AtomicBool::new(false),
            enumeration_count: AtomicUsize::new(0),
        }
    }

    /// Creates an empty mock source.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Creates a source whose enumeration always fails.
    #[must_use]
    pub fn failing() -> Self {
        let source = Self::empty();
        source.fail.store(true, Ordering::Relaxed);
        source
    }

    /// Replaces the collection, as if the library changed between runs.
    pub fn set_items(&self, items: Vec<Item>) {
        *self.items.lock().unwrap_or_else(PoisonError::into_inner) = items;
    }

    /// Returns the number of times the source has been enumerated.
    #[must_use]
    pub fn enumeration_count(&self) -> usize {
        self.enumeration_count.load(Ordering::Relaxed)
    }
}

impl ItemSource for MockItemSource {
    fn items(&self) -> anyhow::Result<Vec<Item>> {
        self.enumeration_count.fetch_add(1, Ordering::Relaxed);
        if self.fail.load(Ordering::Relaxed) {
            anyhow::bail!("mock source unavailable");
        }
        Ok(self
            .items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn resolve(&self, ids: &[String]) -> Vec<Item> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        let known: HashSet<&str> = items.iter().map(|i| i.id.as_str()).collect();
        ids.iter()
            .filter(|id| known.contains(id.as_str()))
            .map(|id| Item::new(id.clone()))
            .collect()
    }
}

/// Classifier with scripted answers.
///
/// Assigned ids return their group, failing ids return an error, and every
/// other id falls back to either "no match" or the id-hash classifier.
pub struct ScriptedClassifier {
    assignments: HashMap<String, PhotoGroup>,
    failures: HashSet<String>,
    hash_fallback: bool,
    cancel_after: Option<(usize, CancelToken)>,
    calls: AtomicUsize,
}

impl ScriptedClassifier {
    /// Creates a classifier where unassigned ids match nothing.
    #[must_use]
    pub fn new() -> Self {
        Self {
            assignments: HashMap::new(),
            failures: HashSet::new(),
            hash_fallback: false,
            cancel_after: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Creates a classifier where unassigned ids are hashed.
    #[must_use]
    pub fn hashing() -> Self {
        Self {
            hash_fallback: true,
            ..Self::new()
        }
    }

    /// Assigns `id` to `group`.
    #[must_use]
    pub fn assign(mut self, id: &str, group: PhotoGroup) -> Self {
        self.assignments.insert(id.to_string(), group);
        self
    }

    /// Makes classification of `id` fail.
    #[must_use]
    pub fn fail_on(mut self, id: &str) -> Self {
        self.failures.insert(id.to_string());
        self
    }

    /// Cancels `token` once `calls` items have been classified.
    #[must_use]
    pub fn cancel_after(mut self, calls: usize, token: CancelToken) -> Self {
        self.cancel_after = Some((calls, token));
        self
    }

    /// Returns the number of classify calls so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Default for ScriptedClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for ScriptedClassifier {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn classify(&self, item: &Item) -> anyhow::Result<Option<PhotoGroup>> {
        let calls = self.calls.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some((limit, token)) = &self.cancel_after {
            if calls >= *limit {
                token.cancel();
            }
        }

        if self.failures.contains(&item.id) {
            anyhow::bail!("scripted failure for {}", item.id);
        }
        if let Some(group) = self.assignments.get(&item.id) {
            return Ok(Some(*group));
        }
        if self.hash_fallback {
            return IdHashClassifier.classify(item);
        }
        Ok(None)
    }
}

/// In-memory `RecordStore` with fault injection.
pub struct MemoryRecordStore {
    records: Mutex<HashMap<RecordName, Vec<u8>>>,
    writes: Mutex<Vec<(RecordName, Vec<u8>)>>,
    fail_writes: AtomicBool,
}

impl MemoryRecordStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            writes: Mutex::new(Vec::new()),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent `put` fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    /// Stores raw bytes under `name`, bypassing fault injection.
    pub fn insert_raw(&self, name: RecordName, bytes: &[u8]) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, bytes.to_vec());
    }

    /// Returns the raw bytes currently stored under `name`.
    #[must_use]
    pub fn raw(&self, name: RecordName) -> Option<Vec<u8>> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&name)
            .cloned()
    }

    /// Returns the number of successful writes to `name`.
    #[must_use]
    pub fn write_count(&self, name: RecordName) -> usize {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(n, _)| *n == name)
            .count()
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryRecordStore {
    fn get(&self, name: RecordName) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.raw(name))
    }

    fn put(&self, name: RecordName, bytes: &[u8]) -> anyhow::Result<()> {
        if self.fail_writes.load(Ordering::Relaxed) {
            anyhow::bail!("injected write failure for {name}");
        }
        self.insert_raw(name, bytes);
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((name, bytes.to_vec()));
        Ok(())
    }

    fn delete(&self, name: RecordName) -> anyhow::Result<()> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&name);
        Ok(())
    }

    fn contains(&self, name: RecordName) -> bool {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&name)
    }
}

/// Access gate with a fixed answer.
pub struct MockAccessGate {
    granted: bool,
    checks: AtomicUsize,
}

impl MockAccessGate {
    /// Creates a gate that answers `granted`.
    #[must_use]
    pub const fn new(granted: bool) -> Self {
        Self {
            granted,
            checks: AtomicUsize::new(0),
        }
    }

    /// Returns the number of times access was checked.
    #[must_use]
    pub fn check_count(&self) -> usize {
        self.checks.load(Ordering::Relaxed)
    }
}

impl AccessGate for MockAccessGate {
    fn authorize(&self) -> bool {
        self.checks.fetch_add(1, Ordering::Relaxed);
        self.granted
    }
}

/// Mock implementation of `ProgressSink` for testing.
///
/// Captures events for later assertions.
pub struct RecordingSink {
    events: Arc<Mutex<Vec<ScanEvent>>>,
}

impl RecordingSink {
    /// Creates a new recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ScanEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the `processed` value of every `Progress` event.
    #[must_use]
    pub fn progress_points(&self) -> Vec<usize> {
        self.events()
            .iter()
            .filter_map(|e| match e {
                ScanEvent::Progress { processed, .. } => Some(*processed),
                _ => None,
            })
            .collect()
    }

    /// Returns every `Snapshot` payload.
    #[must_use]
    pub fn snapshots(&self) -> Vec<GroupSnapshot> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ScanEvent::Snapshot(snapshot) => Some(snapshot),
                _ => None,
            })
            .collect()
    }

    /// Returns every `Completed` payload.
    #[must_use]
    pub fn completions(&self) -> Vec<ScanResult> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ScanEvent::Completed(result) => Some(result),
                _ => None,
            })
            .collect()
    }

    /// Returns the number of `Cancelled` events.
    #[must_use]
    pub fn cancelled_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ScanEvent::Cancelled { .. }))
            .count()
    }

    /// Returns the last captured event, if any.
    #[must_use]
    pub fn last_event(&self) -> Option<ScanEvent> {
        self.events().pop()
    }

    /// Discards captured events.
    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for RecordingSink {
    fn on_event(&self, event: ScanEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
