//! Persistence layer: picks the key-value backend and exposes the lead repository.

mod repository;

pub use repository::*;

use std::sync::Arc;

use crate::config::{Config, StoreBackend};
use crate::store::{KeyValueStore, MemoryStore, SqliteStore, StoreError};

/// Open the backend selected by the configuration.
pub async fn open_store(config: &Config) -> Result<Arc<dyn KeyValueStore>, StoreError> {
    match config.store_backend {
        StoreBackend::Sqlite => {
            tracing::info!("Using SQLite store at {:?}", config.db_path);
            Ok(Arc::new(SqliteStore::open(&config.db_path).await?))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; leads are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
