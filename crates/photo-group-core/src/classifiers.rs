//! Built-in classifiers.
//!
//! Grouping is driven by a hash value in `[0.0, 1.0)` derived with SHA-256,
//! mapped to a group by [`PhotoGroup::for_hash`].

use sha2::{Digest, Sha256};

use crate::domain::{Item, PhotoGroup};
use crate::ports::Classifier;

/// Maps arbitrary bytes to a stable value in `[0.0, 1.0)`.
#[must_use]
pub fn hash_fraction(bytes: &[u8]) -> f64 {
    fraction_from_digest(&Sha256::digest(bytes))
}

/// Maps a digest to a value in `[0.0, 1.0)`.
///
/// Uses the top 53 bits of the first eight bytes so every value is exactly
/// representable as an `f64`. Digests shorter than eight bytes are
/// zero-padded.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn fraction_from_digest(digest: &[u8]) -> f64 {
    let mut head = [0u8; 8];
    let len = digest.len().min(8);
    head[..len].copy_from_slice(&digest[..len]);
    let bits = u64::from_be_bytes(head) >> 11;
    bits as f64 / (1u64 << 53) as f64
}

/// Classifies items by hashing their identifier.
///
/// Cheap and independent of item content; useful when ids are already
/// content-derived or for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdHashClassifier;

impl Classifier for IdHashClassifier {
    fn name(&self) -> &'static str {
        "id-hash"
    }

    fn classify(&self, item: &Item) -> anyhow::Result<Option<PhotoGroup>> {
        Ok(PhotoGroup::for_hash(hash_fraction(item.id.as_bytes())))
    }
}
