//! In-memory store implementation for testing.
//!
//! Provides [`MemoryStore`] for unit testing the content stores without
//! filesystem access.

use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::store::{KvStore, StoreError};

/// In-memory store for testing.
///
/// Stores values in a map. Use the builder methods to seed the store with
/// test data. Tracks the number of writes so tests can assert that an
/// operation did not persist anything.
///
/// # Example
///
/// ```ignore
/// use vellum_store::{MemoryStore, KvStore, keys};
///
/// let store = MemoryStore::new().with_value(keys::PAGES, "[]");
/// assert_eq!(store.get_raw(keys::PAGES).unwrap().as_deref(), Some("[]"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<BTreeMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw JSON value under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_value(self, key: &str, value: &str) -> Self {
        self.values
            .write()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
        self
    }

    /// Number of `set_raw`/`remove` calls observed since construction.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KvStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.read().unwrap().get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.values
            .write()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.values.write().unwrap().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.values.read().unwrap().keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_seeded_value_is_readable() {
        let store = MemoryStore::new().with_value("pages", "[]");

        assert_eq!(store.get_raw("pages").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_missing_key_is_none() {
        let store = MemoryStore::new();

        assert!(store.get_raw("ghost").unwrap().is_none());
    }

    #[test]
    fn test_write_count_tracks_mutations() {
        let store = MemoryStore::new();
        assert_eq!(store.write_count(), 0);

        store.set_raw("pages", "[]").unwrap();
        store.remove("pages").unwrap();

        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn test_keys_sorted() {
        let store = MemoryStore::new()
            .with_value("posts", "[]")
            .with_value("menus", "{}");

        assert_eq!(store.keys().unwrap(), vec!["menus", "posts"]);
    }
}
