//! Filesystem adapter for enumerating photos.

use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Result;
use photo_group_core::{AccessGate, Item, ItemSource};
use tracing::{debug, warn};

/// Supported image extensions.
const RASTER_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "tiff", "tif", "webp", "bmp", "gif", "heic", "heif",
];
const RAW_EXTENSIONS: &[&str] = &["cr2", "cr3", "nef", "arw", "raf", "dng", "orf", "rw2"];

/// Filesystem item source adapter.
///
/// Item ids are file paths. Enumeration order is the sorted path order, so
/// it is stable across runs over an unchanged tree. Paths that are not valid
/// UTF-8 have no lossless id and are skipped with a warning.
///
/// `resolve` keeps the ids that the configured roots still enumerate.
pub struct FsItemSource {
    paths: Vec<PathBuf>,
    recursive: bool,
}

impl FsItemSource {
    /// Creates a new filesystem item source.
    ///
    /// # Arguments
    ///
    /// * `paths` - Files or directories to scan
    /// * `recursive` - Whether to recurse into subdirectories
    #[must_use]
    pub const fn new(paths: Vec<PathBuf>, recursive: bool) -> Self {
        Self { paths, recursive }
    }

    /// Collects all image files from the configured paths, sorted and deduplicated.
    fn collect_files(&self) -> BTreeSet<PathBuf> {
        let mut files = BTreeSet::new();

        for path in &self.paths {
            if path.is_file() {
                if is_supported_image(path) {
                    files.insert(path.clone());
                } else {
                    warn!("Unsupported file type: {}", path.display());
                }
            } else if path.is_dir() {
                self.collect_from_dir(path, &mut files);
            } else {
                warn!("Path does not exist: {}", path.display());
            }
        }

        files
    }

    fn collect_from_dir(&self, dir: &Path, files: &mut BTreeSet<PathBuf>) {
        let entries = match std::fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                warn!("Failed to read directory {}: {e}", dir.display());
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && is_supported_image(&path) {
                files.insert(path);
            } else if path.is_dir() && self.recursive {
                self.collect_from_dir(&path, files);
            }
        }
    }

    /// Ids of all enumerated files, in path order.
    fn collect_ids(&self) -> Vec<String> {
        self.collect_files()
            .into_iter()
            .filter_map(|path| match path.into_os_string().into_string() {
                Ok(id) => Some(id),
                Err(raw) => {
                    warn!("Skipping non-UTF-8 path: {}", Path::new(&raw).display());
                    None
                }
            })
            .collect()
    }
}

impl ItemSource for FsItemSource {
    fn items(&self) -> Result<Vec<Item>> {
        let ids = self.collect_ids();
        debug!("Found {} image files", ids.len());

        Ok(ids.into_iter().map(Item::new).collect())
    }

    fn resolve(&self, ids: &[String]) -> Vec<Item> {
        let present: HashSet<String> = self.collect_ids().into_iter().collect();
        ids.iter()
            .filter(|id| present.contains(id.as_str()))
            .map(|id| Item::new(id.clone()))
            .collect()
    }
}

/// Access check for a set of filesystem roots.
///
/// Grants access when every existing root can be opened for reading.
/// Missing roots are left to the item source, which warns about them.
pub struct FsAccessGate {
    roots: Vec<PathBuf>,
}

impl FsAccessGate {
    /// Creates a gate over the given roots.
    #[must_use]
    pub const fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }
}

impl AccessGate for FsAccessGate {
    fn authorize(&self) -> bool {
        self.roots.iter().all(|root| {
            let readable = if root.is_dir() {
                std::fs::read_dir(root).map(drop)
            } else if root.is_file() {
                File::open(root).map(drop)
            } else {
                return true;
            };
            if let Err(e) = &readable {
                warn!("Access denied to {}: {e}", root.display());
            }
            readable.is_ok()
        })
    }
}

/// Checks if a path has a supported image extension.
fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .is_some_and(|e| {
            RASTER_EXTENSIONS.contains(&e.as_str()) || RAW_EXTENSIONS.contains(&e.as_str())
        })
}
