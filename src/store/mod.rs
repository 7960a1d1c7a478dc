//! Key-value store adapter.
//!
//! Leads are persisted as opaque string values behind this trait; the
//! repository never sees which backend holds them.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;

/// Namespace partition inside the underlying store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scope {
    Private,
    Shared,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Private => "private",
            Scope::Shared => "shared",
        }
    }
}

/// Failure reported by a store backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError(pub String);

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "store error: {}", self.0)
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError(err.to_string())
    }
}

/// Asynchronous string key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Keys starting with `prefix`. A missing listing is an empty one.
    async fn list(&self, prefix: &str, scope: Scope) -> Result<Vec<String>, StoreError>;

    async fn get(&self, key: &str, scope: Scope) -> Result<Option<String>, StoreError>;

    /// Insert or overwrite.
    async fn set(&self, key: &str, value: &str, scope: Scope) -> Result<(), StoreError>;

    /// Removing a missing key is not an error.
    async fn delete(&self, key: &str, scope: Scope) -> Result<(), StoreError>;
}
