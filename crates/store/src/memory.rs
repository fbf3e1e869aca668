use std::{collections::HashMap, fmt::Debug, hash::Hash};

use parking_lot::RwLock;
use tracing::trace;

use crate::{errors::StoreError, KvStore};

/// Key-value map behind a single reader-writer lock.
///
/// `get` shares the lock; `put`, `update` and `delete` hold it exclusively.
/// The map is never reachable outside the lock.
pub struct MemoryStore<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

// Only callable with a borrowed map, i.e. while a guard is held.
fn has<K: Eq + Hash, V>(map: &HashMap<K, V>, key: &K) -> bool {
    map.contains_key(key)
}

impl<K, V> MemoryStore<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self { inner: RwLock::new(HashMap::new()) }
    }

    /// Pre-size the map for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { inner: RwLock::new(HashMap::with_capacity(capacity)) }
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Tear the store down and keep whatever it still held.
    pub fn into_inner(self) -> HashMap<K, V> {
        self.inner.into_inner()
    }
}

impl<K: Eq + Hash, V> Default for MemoryStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> KvStore<K, V> for MemoryStore<K, V>
where
    K: Eq + Hash + Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    fn put(&self, key: K, value: V) {
        let mut map = self.inner.write();
        trace!(key = ?key, "put");
        map.insert(key, value);
    }

    fn get(&self, key: &K) -> Result<V, StoreError> {
        let map = self.inner.read();
        map.get(key).cloned().ok_or_else(|| StoreError::not_found(key))
    }

    fn update(&self, key: K, value: V) -> Result<(), StoreError> {
        let mut map = self.inner.write();
        if !has(&*map, &key) {
            return Err(StoreError::not_found(&key));
        }
        map.insert(key, value);
        Ok(())
    }

    fn delete(&self, key: &K) -> Result<V, StoreError> {
        let mut map = self.inner.write();
        map.remove(key).ok_or_else(|| StoreError::not_found(key))
    }
}
