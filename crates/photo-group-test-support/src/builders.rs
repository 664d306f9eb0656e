//! Item builders for testing.

use photo_group_core::Item;

/// Builder for creating item lists.
pub struct ItemBuilder;

impl ItemBuilder {
    /// Creates `count` items with ids `IMG_0000.jpg`, `IMG_0001.jpg`, ...
    #[must_use]
    pub fn numbered(count: usize) -> Vec<Item> {
        Self::with_prefix("IMG_", count)
    }

    /// Creates `count` items with ids `{prefix}0000.jpg`, ...
    #[must_use]
    pub fn with_prefix(prefix: &str, count: usize) -> Vec<Item> {
        (0..count)
            .map(|i| Item::new(format!("{prefix}{i:04}.jpg")))
            .collect()
    }

    /// Creates items from literal ids.
    #[must_use]
    pub fn from_ids(ids: &[&str]) -> Vec<Item> {
        ids.iter().map(|id| Item::new(*id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_ids_are_unique_and_ordered() {
        let items = ItemBuilder::numbered(12);
        assert_eq!(items.len(), 12);
        assert_eq!(items[0].id, "IMG_0000.jpg");
        assert_eq!(items[11].id, "IMG_0011.jpg");
    }

    #[test]
    fn test_from_ids() {
        let items = ItemBuilder::from_ids(&["a", "b"]);
        assert_eq!(items, vec![Item::new("a"), Item::new("b")]);
    }
}
