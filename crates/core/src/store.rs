//! The item store: the single owning collection of bucket items.
//!
//! The radar reads it, the route planner reads and writes-by-replace, and
//! direct user actions mutate it. Last-writer-wins is acceptable for the
//! single-user scope; every implementation must still be internally
//! thread-safe because radar callbacks and user edits can race.

use crate::error::{CoreError, Result};
use crate::model::BucketItem;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// The owning collection of bucket items.
///
/// `update` replaces the stored item with the same id wholesale.
pub trait ItemStore: Send + Sync {
    /// All items in insertion order.
    fn all(&self) -> Vec<BucketItem>;

    /// One item by id.
    fn get(&self, id: &str) -> Option<BucketItem>;

    /// Adds a new item. Fails on a duplicate id.
    fn insert(&self, item: BucketItem) -> Result<()>;

    /// Replaces the item with the same id. Fails if the id is unknown.
    fn update(&self, item: BucketItem) -> Result<()>;

    /// Removes an item by id. Fails if the id is unknown.
    fn remove(&self, id: &str) -> Result<()>;
}

/// In-memory store used by tests and as the base of [`JsonStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<Vec<BucketItem>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with items.
    #[must_use]
    pub fn with_items(items: Vec<BucketItem>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }
}

impl ItemStore for MemoryStore {
    fn all(&self) -> Vec<BucketItem> {
        self.items.read().unwrap().clone()
    }

    fn get(&self, id: &str) -> Option<BucketItem> {
        self.items.read().unwrap().iter().find(|i| i.id == id).cloned()
    }

    fn insert(&self, item: BucketItem) -> Result<()> {
        let mut items = self.items.write().unwrap();
        if items.iter().any(|i| i.id == item.id) {
            return Err(CoreError::DuplicateItem(item.id));
        }
        items.push(item);
        Ok(())
    }

    fn update(&self, item: BucketItem) -> Result<()> {
        let mut items = self.items.write().unwrap();
        match items.iter_mut().find(|i| i.id == item.id) {
            Some(slot) => {
                *slot = item;
                Ok(())
            }
            None => Err(CoreError::ItemNotFound(item.id)),
        }
    }

    fn remove(&self, id: &str) -> Result<()> {
        let mut items = self.items.write().unwrap();
        let before = items.len();
        items.retain(|i| i.id != id);
        if items.len() == before {
            return Err(CoreError::ItemNotFound(id.to_string()));
        }
        Ok(())
    }
}

/// File-backed store persisting the item list as pretty-printed JSON.
///
/// Writes go through a temp file in the same directory followed by an
/// atomic rename, so a crash mid-write never truncates the list.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonStore {
    /// Opens (or creates) a store at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let items = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            Vec::new()
        };
        Ok(Self {
            path,
            inner: MemoryStore::with_items(items),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        let items = self.inner.all();
        let json = serde_json::to_string_pretty(&items)?;

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(&self.path)
            .map_err(|e| CoreError::Io(e.error))?;

        tracing::debug!(path = %self.path.display(), count = items.len(), "Store persisted");
        Ok(())
    }
}

impl ItemStore for JsonStore {
    fn all(&self) -> Vec<BucketItem> {
        self.inner.all()
    }

    fn get(&self, id: &str) -> Option<BucketItem> {
        self.inner.get(id)
    }

    fn insert(&self, item: BucketItem) -> Result<()> {
        self.inner.insert(item)?;
        self.persist()
    }

    fn update(&self, item: BucketItem) -> Result<()> {
        self.inner.update(item)?;
        self.persist()
    }

    fn remove(&self, id: &str) -> Result<()> {
        self.inner.remove(id)?;
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str) -> BucketItem {
        BucketItem::new(title).unwrap()
    }

    #[test]
    fn test_memory_insert_get_update_remove() {
        let store = MemoryStore::new();
        let mut it = item("Hike Patagonia");
        let id = it.id.clone();

        store.insert(it.clone()).unwrap();
        assert!(store.get(&id).is_some());
        assert!(matches!(
            store.insert(it.clone()),
            Err(CoreError::DuplicateItem(_))
        ));

        it.description = "Torres del Paine".into();
        store.update(it).unwrap();
        assert_eq!(store.get(&id).unwrap().description, "Torres del Paine");

        store.remove(&id).unwrap();
        assert!(store.get(&id).is_none());
        assert!(matches!(store.remove(&id), Err(CoreError::ItemNotFound(_))));
    }

    #[test]
    fn test_update_unknown_id_fails() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.update(item("ghost")),
            Err(CoreError::ItemNotFound(_))
        ));
    }

    #[test]
    fn test_json_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");

        let store = JsonStore::open(&path).unwrap();
        let it = item("Ride the Trans-Siberian");
        let id = it.id.clone();
        store.insert(it).unwrap();

        // Reopen from disk
        let reopened = JsonStore::open(&path).unwrap();
        assert_eq!(reopened.all().len(), 1);
        assert_eq!(reopened.get(&id).unwrap().title, "Ride the Trans-Siberian");
    }

    #[test]
    fn test_json_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("absent.json")).unwrap();
        assert!(store.all().is_empty());
    }
}
