//! Content-hash classifier for files on disk.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use photo_group_core::{fraction_from_digest, Classifier, Item, PhotoGroup};
use sha2::{Digest, Sha256};

/// Classifies photos by the SHA-256 of their file contents.
///
/// Item ids are treated as file paths. Identical files land in the same
/// group no matter where they live.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentHashClassifier;

impl Classifier for ContentHashClassifier {
    fn name(&self) -> &'static str {
        "content-hash"
    }

    fn classify(&self, item: &Item) -> Result<Option<PhotoGroup>> {
        let digest = digest_file(Path::new(&item.id))?;
        Ok(PhotoGroup::for_hash(fraction_from_digest(&digest)))
    }
}

/// Streams a file through SHA-256.
fn digest_file(path: &Path) -> Result<Vec<u8>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(hasher.finalize().to_vec())
}
