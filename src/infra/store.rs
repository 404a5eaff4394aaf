use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::infra::cache::RedisCache;

/// Layout persistence driver. `memory` backs development and tests,
/// `redis` backs deployments; both speak the same string-KV contract
/// the layout storage key scheme assumes.
#[derive(Clone)]
pub enum LayoutStore {
    Memory(MemoryStore),
    Redis(RedisStore),
}

impl LayoutStore {
    pub fn memory() -> Self {
        LayoutStore::Memory(MemoryStore::new())
    }

    pub fn redis(cache: RedisCache) -> Self {
        LayoutStore::Redis(RedisStore { cache })
    }

    pub async fn read(&self, key: &str) -> Result<Option<String>> {
        match self {
            LayoutStore::Memory(store) => Ok(store.read(key).await),
            LayoutStore::Redis(store) => store.cache.get_string(key).await,
        }
    }

    pub async fn write(&self, key: &str, value: &str) -> Result<()> {
        match self {
            LayoutStore::Memory(store) => {
                store.write(key, value).await;
                Ok(())
            }
            LayoutStore::Redis(store) => store.cache.set_string(key, value).await,
        }
    }

    pub async fn remove(&self, key: &str) -> Result<()> {
        match self {
            LayoutStore::Memory(store) => {
                store.remove(key).await;
                Ok(())
            }
            LayoutStore::Redis(store) => store.cache.remove(key).await,
        }
    }

    pub async fn ping(&self) -> Result<()> {
        match self {
            LayoutStore::Memory(_) => Ok(()),
            LayoutStore::Redis(store) => store.cache.ping().await,
        }
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn write(&self, key: &str, value: &str) {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
    }

    pub async fn remove(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[derive(Clone)]
pub struct RedisStore {
    cache: RedisCache,
}
