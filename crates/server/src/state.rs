use std::sync::Arc;

use configs::{StoreBackend, StoreConfig};
use store::{KvStore, MemoryStore, ShardedStore};

use crate::errors::StartupError;

pub type SharedStore = Arc<dyn KvStore<String, String>>;

/// Router state. Holds only a handle to the store; cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
}

impl AppState {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Build the store backend selected in `[store]`.
    pub fn from_config(cfg: &StoreConfig) -> Result<Self, StartupError> {
        let capacity = cfg.initial_capacity;
        let store: SharedStore = match cfg.backend {
            StoreBackend::Memory => {
                Arc::new(MemoryStore::<String, String>::with_capacity(capacity))
            }
            StoreBackend::Sharded => {
                Arc::new(ShardedStore::<String, String>::with_capacity(capacity, cfg.shards)?)
            }
        };
        Ok(Self::new(store))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(MemoryStore::<String, String>::new()))
    }
}
