use std::fmt::Debug;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("the key ({0}) does not exist")]
    NotFound(String),
}

impl StoreError {
    pub fn not_found<K: Debug + ?Sized>(key: &K) -> Self {
        Self::NotFound(format!("{key:?}"))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("shard count must be a power of two >= 2, got {0}")]
pub struct InvalidShardCount(pub usize);
