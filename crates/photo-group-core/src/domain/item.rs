//! Items enumerated by an item source.

use sha2::{Digest, Sha256};

/// A single item to classify.
///
/// Only the identifier matters to the pipeline; its position in the
/// enumerated list is its ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item {
    /// Stable, unique identifier.
    pub id: String,
}

impl Item {
    /// Creates an item from its identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Computes the content fingerprint of an ordered item list.
///
/// Hex SHA-256 over every id followed by a newline. Any insertion, removal,
/// rename, or reordering changes the fingerprint.
#[must_use]
pub fn fingerprint(items: &[Item]) -> String {
    let mut hasher = Sha256::new();
    for item in items {
        hasher.update(item.id.as_bytes());
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(ids: &[&str]) -> Vec<Item> {
        ids.iter().map(|id| Item::new(*id)).collect()
    }

    #[test]
    fn test_fingerprint_is_stable() {
        assert_eq!(fingerprint(&items(&["a", "b"])), fingerprint(&items(&["a", "b"])));
    }

    #[test]
    fn test_fingerprint_depends_on_order() {
        assert_ne!(fingerprint(&items(&["a", "b"])), fingerprint(&items(&["b", "a"])));
    }

    #[test]
    fn test_fingerprint_separates_ids() {
        assert_ne!(fingerprint(&items(&["ab", "c"])), fingerprint(&items(&["a", "bc"])));
    }

    #[test]
    fn test_fingerprint_of_empty_list() {
        // SHA-256 of the empty input.
        assert_eq!(
            fingerprint(&[]),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
