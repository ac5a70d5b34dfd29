//! RocksDB storage adapter
//!
//! Items live in the `items` column family, keyed by id, JSON encoded.

use super::{ItemFilter, StorageAdapter, StorageError, StorageResult, StoredItem};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, IteratorMode, Options, DB};
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

const ITEMS_CF: &str = "items";

/// RocksDB-backed document store
pub struct RocksStorage {
    db: DB,
}

impl RocksStorage {
    /// Open or create a store at `path`
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        info!("Opening RocksDB storage at: {:?}", path);

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);

        let cf_descriptors = vec![
            ColumnFamilyDescriptor::new("default", Options::default()),
            ColumnFamilyDescriptor::new(ITEMS_CF, Self::items_cf_options()),
        ];

        let db = DB::open_cf_descriptors(&opts, path, cf_descriptors)?;
        Ok(Self { db })
    }

    fn items_cf_options() -> Options {
        let mut opts = Options::default();
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        opts
    }

    fn put(&self, item: &StoredItem) -> StorageResult<()> {
        let cf = self
            .db
            .cf_handle(ITEMS_CF)
            .ok_or_else(|| StorageError::ColumnFamily(ITEMS_CF.to_string()))?;
        let value = serde_json::to_vec(item)?;
        self.db.put_cf(cf, item.id.as_bytes(), value)?;
        Ok(())
    }

    fn get(&self, id: &str) -> StorageResult<Option<StoredItem>> {
        let cf = self
            .db
            .cf_handle(ITEMS_CF)
            .ok_or_else(|| StorageError::ColumnFamily(ITEMS_CF.to_string()))?;
        match self.db.get_cf(cf, id.as_bytes())? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }

    /// Flush memtables to disk
    pub fn flush(&self) -> StorageResult<()> {
        self.db.flush()?;
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for RocksStorage {
    async fn query(&self, filter: &ItemFilter) -> StorageResult<Vec<StoredItem>> {
        let cf = self
            .db
            .cf_handle(ITEMS_CF)
            .ok_or_else(|| StorageError::ColumnFamily(ITEMS_CF.to_string()))?;

        let mut items = Vec::new();
        for entry in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = entry?;
            let item: StoredItem = serde_json::from_slice(&value)?;
            if filter.matches(&item) {
                items.push(item);
            }
        }
        Ok(items)
    }

    async fn create(&self, kind: &str, content: serde_json::Value) -> StorageResult<StoredItem> {
        let item = StoredItem {
            id: format!("item_{}", Uuid::new_v4().simple()),
            kind: kind.to_string(),
            content,
        };
        self.put(&item)?;
        debug!("Stored new {} item {}", kind, item.id);
        Ok(item)
    }

    async fn update(&self, id: &str, content: serde_json::Value) -> StorageResult<StoredItem> {
        let mut item = self
            .get(id)?
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        item.content = content;
        self.put(&item)?;
        Ok(item)
    }
}
