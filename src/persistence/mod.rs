//! Persistence layer
//!
//! The graph is stored as one snapshot document inside a generic document
//! store reached through [`StorageAdapter`]. The adapter is only asked to list
//! items of a kind, create an item and update one in place.

pub mod snapshot;
pub mod storage;
#[cfg(feature = "rocksdb")]
pub mod rocks;

pub use snapshot::{load_graph, save_graph, GraphSnapshot, PersistenceError, PersistenceResult};
pub use storage::MemoryStorage;
#[cfg(feature = "rocksdb")]
pub use rocks::RocksStorage;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// RocksDB error
    #[cfg(feature = "rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Not found
    #[error("Item not found: {0}")]
    NotFound(String),

    /// Column family error
    #[error("Column family error: {0}")]
    ColumnFamily(String),

    /// Failure reported by a custom backend
    #[error("Backend error: {0}")]
    Backend(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// One document held by a storage adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredItem {
    pub id: String,
    pub kind: String,
    pub content: serde_json::Value,
}

/// Selection passed to [`StorageAdapter::query`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    /// Only items of this kind; `None` lists everything
    pub kind: Option<String>,
}

impl ItemFilter {
    pub fn kind(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
        }
    }

    pub fn matches(&self, item: &StoredItem) -> bool {
        self.kind.as_deref().map_or(true, |k| k == item.kind)
    }
}

/// Generic document store the engine persists into
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    /// List every item matching `filter`
    async fn query(&self, filter: &ItemFilter) -> StorageResult<Vec<StoredItem>>;

    /// Store a new item and return it with its assigned id
    async fn create(&self, kind: &str, content: serde_json::Value) -> StorageResult<StoredItem>;

    /// Replace the content of an existing item
    async fn update(&self, id: &str, content: serde_json::Value) -> StorageResult<StoredItem>;
}

#[async_trait]
impl<T: StorageAdapter + ?Sized> StorageAdapter for Arc<T> {
    async fn query(&self, filter: &ItemFilter) -> StorageResult<Vec<StoredItem>> {
        (**self).query(filter).await
    }

    async fn create(&self, kind: &str, content: serde_json::Value) -> StorageResult<StoredItem> {
        (**self).create(kind, content).await
    }

    async fn update(&self, id: &str, content: serde_json::Value) -> StorageResult<StoredItem> {
        (**self).update(id, content).await
    }
}
