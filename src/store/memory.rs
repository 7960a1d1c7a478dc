//! In-process store backend. Contents are lost when the process exits.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{KeyValueStore, Scope, StoreError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<(Scope, String), String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn list(&self, prefix: &str, scope: Scope) -> Result<Vec<String>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries
            .range((scope, prefix.to_string())..)
            .take_while(|((s, key), _)| *s == scope && key.starts_with(prefix))
            .map(|((_, key), _)| key.clone())
            .collect())
    }

    async fn get(&self, key: &str, scope: Scope) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries.get(&(scope, key.to_string())).cloned())
    }

    async fn set(&self, key: &str, value: &str, scope: Scope) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        entries.insert((scope, key.to_string()), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str, scope: Scope) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        entries.remove(&(scope, key.to_string()));
        Ok(())
    }
}
