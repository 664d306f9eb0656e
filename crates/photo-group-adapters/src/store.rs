//! Filesystem record storage.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use photo_group_core::{RecordName, RecordStore};
use tempfile::NamedTempFile;
use tracing::debug;

/// File extension of stored records.
const RECORD_EXTENSION: &str = "json";

/// Returns the default state directory.
///
/// Uses `XDG_DATA_HOME/photo-group` or `~/.local/share/photo-group`.
#[must_use]
pub fn state_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("photo-group")
}

/// Stores each record as one JSON file in a directory.
///
/// Writes go to a temporary file in the same directory which is then
/// renamed over the record, so readers see either the old or the new
/// document.
#[derive(Debug, Clone)]
pub struct FsRecordStore {
    dir: PathBuf,
}

impl FsRecordStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the directory records are stored in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file path of a record.
    #[must_use]
    pub fn record_path(&self, name: RecordName) -> PathBuf {
        self.dir
            .join(format!("{}.{RECORD_EXTENSION}", name.as_str()))
    }
}

impl RecordStore for FsRecordStore {
    fn get(&self, name: RecordName) -> Result<Option<Vec<u8>>> {
        let path = self.record_path(name);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn put(&self, name: RecordName, bytes: &[u8]) -> Result<()> {
        let path = self.record_path(name);
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let mut temp = NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("Failed to create temp file in {}", self.dir.display()))?;
        temp.write_all(bytes)
            .with_context(|| format!("Failed to write {name}"))?;
        temp.as_file()
            .sync_all()
            .with_context(|| format!("Failed to sync {name}"))?;
        temp.persist(&path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    fn delete(&self, name: RecordName) -> Result<()> {
        let path = self.record_path(name);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }

    fn contains(&self, name: RecordName) -> bool {
        self.record_path(name).is_file()
    }
}
