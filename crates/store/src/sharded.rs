use std::{collections::HashMap, fmt::Debug, hash::Hash};

use dashmap::DashMap;

use crate::{
    errors::{InvalidShardCount, StoreError},
    KvStore,
};

/// Key-value map split across hash-selected shards, each with its own lock.
///
/// Operations on one key are as atomic as in [`crate::MemoryStore`]; no
/// ordering is implied between keys living in different shards.
pub struct ShardedStore<K, V> {
    inner: DashMap<K, V>,
    shards: usize,
}

impl<K, V> ShardedStore<K, V>
where
    K: Eq + Hash,
{
    /// `shards` must be a power of two greater than one.
    pub fn new(shards: usize) -> Result<Self, InvalidShardCount> {
        Self::with_capacity(0, shards)
    }

    pub fn with_capacity(capacity: usize, shards: usize) -> Result<Self, InvalidShardCount> {
        if shards < 2 || !shards.is_power_of_two() {
            return Err(InvalidShardCount(shards));
        }
        Ok(Self { inner: DashMap::with_capacity_and_shard_amount(capacity, shards), shards })
    }

    pub fn shards(&self) -> usize {
        self.shards
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn into_inner(self) -> HashMap<K, V> {
        self.inner.into_iter().collect()
    }
}

impl<K, V> KvStore<K, V> for ShardedStore<K, V>
where
    K: Eq + Hash + Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    fn put(&self, key: K, value: V) {
        self.inner.insert(key, value);
    }

    fn get(&self, key: &K) -> Result<V, StoreError> {
        self.inner
            .get(key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::not_found(key))
    }

    fn update(&self, key: K, value: V) -> Result<(), StoreError> {
        // get_mut keeps the shard write-locked between the lookup and the store
        match self.inner.get_mut(&key) {
            Some(mut slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(StoreError::not_found(&key)),
        }
    }

    fn delete(&self, key: &K) -> Result<V, StoreError> {
        self.inner
            .remove(key)
            .map(|(_, value)| value)
            .ok_or_else(|| StoreError::not_found(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[test]
    fn rejects_bad_shard_counts() {
        assert_eq!(ShardedStore::<u8, u8>::new(0).err(), Some(InvalidShardCount(0)));
        assert_eq!(ShardedStore::<u8, u8>::new(1).err(), Some(InvalidShardCount(1)));
        assert_eq!(ShardedStore::<u8, u8>::new(12).err(), Some(InvalidShardCount(12)));
        assert_eq!(ShardedStore::<u8, u8>::new(16).unwrap().shards(), 16);
    }

    fn store() -> ShardedStore<String, String> {
        ShardedStore::new(4).unwrap()
    }

    #[test]
    fn crud_contract_holds() {
        test_support::crud_scenario(&store());
    }

    #[test]
    fn concurrent_puts_land_in_every_shard() {
        let s = ShardedStore::<u32, u32>::new(8).unwrap();
        test_support::concurrent_puts_on_distinct_keys(&s);
        assert_eq!(s.len(), 8 * 500);
        let map = s.into_inner();
        assert_eq!(map.get(&7249), Some(&249));
    }

    #[test]
    fn concurrent_gets_agree_on_unmodified_key() {
        test_support::concurrent_gets_agree(&store());
    }

    #[test]
    fn racing_put_and_get_see_old_or_new_value() {
        test_support::racing_put_and_get(&store());
    }

    #[test]
    fn concurrent_update_and_delete_never_resurrect_key() {
        let s = ShardedStore::<u32, u32>::new(8).unwrap();
        test_support::update_and_delete_never_resurrect(&s);
        assert!(s.is_empty());
    }
}
