//! Concurrent in-memory key-value storage.
//! - `KvStore` is the four-operation contract adapters depend on.
//! - `MemoryStore` guards one map with a single reader-writer lock.
//! - `ShardedStore` partitions keys by hash across independently locked shards.
//! - No transport, encoding or routing knowledge lives here.

pub mod errors;
pub mod memory;
pub mod sharded;
#[cfg(test)]
mod test_support;

pub use errors::{InvalidShardCount, StoreError};
pub use memory::MemoryStore;
pub use sharded::ShardedStore;

/// CRUD contract shared by every store implementation.
///
/// Each call is atomic with respect to every other call on the same store.
pub trait KvStore<K, V>: Send + Sync {
    /// Insert or overwrite. Never fails.
    fn put(&self, key: K, value: V);

    /// Current value for `key`, or `NotFound` when absent.
    fn get(&self, key: &K) -> Result<V, StoreError>;

    /// Replace the value of an existing key. Never creates a key.
    fn update(&self, key: K, value: V) -> Result<(), StoreError>;

    /// Remove `key` and hand back the value it held.
    fn delete(&self, key: &K) -> Result<V, StoreError>;
}
