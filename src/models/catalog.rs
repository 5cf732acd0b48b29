use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::ItemId;

/// One row of the movie catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub item_id: ItemId,
    pub title: String,
}

impl CatalogEntry {
    pub fn new(item_id: ItemId, title: impl Into<String>) -> Self {
        Self {
            item_id,
            title: title.into(),
        }
    }
}

/// Two-way lookup between item ids and canonical titles
///
/// Collisions are resolved by input order: a repeated id keeps its last
/// title, and a title shared by several ids maps back to the last of those
/// ids that still carries it. Earlier ids sharing that title stay reachable
/// by id but not by title.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    titles: HashMap<ItemId, String>,
    ids: HashMap<String, ItemId>,
}

impl Catalog {
    pub fn new(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let entries: Vec<CatalogEntry> = entries.into_iter().collect();

        let mut titles: HashMap<ItemId, String> = HashMap::new();
        for entry in &entries {
            titles.insert(entry.item_id, entry.title.clone());
        }

        // Reverse only the surviving (id, title) pairs
        let mut ids: HashMap<String, ItemId> = HashMap::new();
        for entry in entries {
            if titles.get(&entry.item_id) == Some(&entry.title) {
                ids.insert(entry.title, entry.item_id);
            }
        }

        Self { titles, ids }
    }

    /// Canonical title for an item id
    pub fn title(&self, item_id: ItemId) -> Option<&str> {
        self.titles.get(&item_id).map(String::as_str)
    }

    /// Item id for an exact canonical title
    pub fn id_for(&self, title: &str) -> Option<ItemId> {
        self.ids.get(title).copied()
    }

    /// Every (title, id) pair reachable through the reverse mapping
    pub fn titles(&self) -> impl Iterator<Item = (&str, ItemId)> {
        self.ids.iter().map(|(title, id)| (title.as_str(), *id))
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}
