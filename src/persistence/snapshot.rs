//! Snapshot document codec and the load/save bridge
//!
//! Layout of the persisted document:
//!
//! ```json
//! { "type": "graph",
//!   "data": { "nodes": [...], "edges": [...] },
//!   "stats": { "nodeCount": 0, "edgeCount": 0, "labels": [], "edgeTypes": [] } }
//! ```

use super::{ItemFilter, StorageAdapter, StorageError, StoredItem};
use crate::config::EngineConfig;
use crate::graph::{GraphData, GraphStatistics, GraphStore};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Persistence errors
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// The whole graph as one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(rename = "type")]
    pub snapshot_type: String,
    pub data: GraphData,
    #[serde(default)]
    pub stats: GraphStatistics,
}

impl GraphSnapshot {
    pub fn capture(store: &GraphStore, snapshot_type: &str) -> Self {
        Self {
            snapshot_type: snapshot_type.to_string(),
            data: store.export(),
            stats: store.statistics(),
        }
    }
}

fn is_snapshot(item: &StoredItem, snapshot_type: &str) -> bool {
    item.content.get("type").and_then(|t| t.as_str()) == Some(snapshot_type)
}

async fn find_slot<S: StorageAdapter + ?Sized>(
    storage: &S,
    config: &EngineConfig,
) -> PersistenceResult<Option<StoredItem>> {
    let items = storage.query(&ItemFilter::kind(&config.memory_kind)).await?;
    Ok(items
        .into_iter()
        .find(|item| is_snapshot(item, &config.snapshot_type)))
}

/// Read the persisted graph, if any.
///
/// `Ok(None)` means no snapshot document exists yet.
pub async fn load_graph<S: StorageAdapter + ?Sized>(
    storage: &S,
    config: &EngineConfig,
) -> PersistenceResult<Option<GraphData>> {
    let Some(item) = find_slot(storage, config).await? else {
        return Ok(None);
    };

    let snapshot: GraphSnapshot = serde_json::from_value(item.content)?;
    debug!(
        "Loaded snapshot {}: {} nodes, {} edges",
        item.id,
        snapshot.data.nodes.len(),
        snapshot.data.edges.len()
    );
    Ok(Some(snapshot.data))
}

/// Write the complete graph, updating the existing snapshot document in place
/// or creating it on first save
pub async fn save_graph<S: StorageAdapter + ?Sized>(
    storage: &S,
    config: &EngineConfig,
    store: &GraphStore,
) -> PersistenceResult<StoredItem> {
    let content = serde_json::to_value(GraphSnapshot::capture(store, &config.snapshot_type))?;

    let saved = match find_slot(storage, config).await? {
        Some(existing) => storage.update(&existing.id, content).await?,
        None => storage.create(&config.memory_kind, content).await?,
    };

    debug!(
        "Saved snapshot {} ({} nodes, {} edges)",
        saved.id,
        store.node_count(),
        store.edge_count()
    );
    Ok(saved)
}
