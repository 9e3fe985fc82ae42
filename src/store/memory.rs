//! An in-memory store.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::{BlobStore, StoreError};

/// An in-memory blob store backed by a `BTreeMap`.
///
/// Writes are visible to subsequent reads as soon as `set` returns. A store
/// can be [frozen](MemoryStore::freeze) after seeding to serve as a read-only
/// source.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<BTreeMap<String, Vec<u8>>>,
    frozen: bool,
}

impl MemoryStore {
    /// Create a new writable, empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the store read-only. Existing contents remain readable.
    #[must_use]
    pub fn freeze(mut self) -> Self {
        self.frozen = true;
        self
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.data
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::KeyNotFound(key.to_string()))
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        if self.frozen {
            return Err(StoreError::ReadOnly);
        }
        self.data.write().insert(key.to_string(), value);
        Ok(())
    }

    fn contains(&self, key: &str) -> bool {
        self.data.read().contains_key(key)
    }

    fn read_only(&self) -> bool {
        self.frozen
    }
}
