//! In-process storage adapter
//!
//! Keeps items in an insertion-ordered map behind a tokio `RwLock`. Used by
//! tests and by embedders that bring their own durability.

use super::{ItemFilter, StorageAdapter, StorageError, StorageResult, StoredItem};
use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<IndexMap<String, StoredItem>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    pub async fn get(&self, id: &str) -> Option<StoredItem> {
        self.items.read().await.get(id).cloned()
    }
}

#[async_trait]
impl StorageAdapter for MemoryStorage {
    async fn query(&self, filter: &ItemFilter) -> StorageResult<Vec<StoredItem>> {
        let items = self.items.read().await;
        Ok(items.values().filter(|i| filter.matches(i)).cloned().collect())
    }

    async fn create(&self, kind: &str, content: serde_json::Value) -> StorageResult<StoredItem> {
        let item = StoredItem {
            id: format!("item_{}", Uuid::new_v4().simple()),
            kind: kind.to_string(),
            content,
        };
        debug!("Created {} item {}", kind, item.id);
        self.items.write().await.insert(item.id.clone(), item.clone());
        Ok(item)
    }

    async fn update(&self, id: &str, content: serde_json::Value) -> StorageResult<StoredItem> {
        let mut items = self.items.write().await;
        let item = items
            .get_mut(id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        item.content = content;
        Ok(item.clone())
    }
}
