//! The graph engine component
//!
//! [`GraphEngine`] owns a [`GraphStore`], a storage adapter and an
//! [`EventNotifier`]. Every mutating call writes the full snapshot through the
//! adapter before returning, then notifies subscribers. Reads consult memory
//! only.
//!
//! The engine is initialized lazily on first use, or explicitly through
//! [`GraphEngine::initialize`]. Methods take `&mut self`, so callers serialise
//! access; share it across tasks behind a `tokio::sync::Mutex` if needed.

use crate::algo::{self, PathResult, Subgraph};
use crate::config::EngineConfig;
use crate::graph::{
    Edge, EdgeId, EdgeType, EventNotifier, GraphData, GraphEvent, GraphStatistics, GraphStore,
    Label, Node, NodeId, PropertyMap,
};
use crate::persistence::{self, PersistenceError, StorageAdapter};
use crate::query::{self, NodeFilter, QueryResults};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

/// Errors surfaced by engine operations
///
/// Missing nodes or edges are not errors; they come back as `None`/`false`.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Writing the snapshot failed. In-memory state already reflects the
    /// mutation and may be ahead of storage.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Engine has been disposed")]
    Disposed,
}

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Uninitialized,
    Ready,
    Disposed,
}

pub struct GraphEngine<S: StorageAdapter> {
    config: EngineConfig,
    storage: S,
    store: GraphStore,
    events: EventNotifier,
    state: Lifecycle,
}

impl<S: StorageAdapter> GraphEngine<S> {
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, EngineConfig::default())
    }

    pub fn with_config(storage: S, config: EngineConfig) -> Self {
        Self {
            config,
            storage,
            store: GraphStore::new(),
            events: EventNotifier::new(),
            state: Lifecycle::Uninitialized,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn is_initialized(&self) -> bool {
        self.state == Lifecycle::Ready
    }

    /// Register for lifecycle events. Subscribe before the first call to see
    /// `initialized`.
    pub fn subscribe(&mut self) -> UnboundedReceiver<GraphEvent> {
        self.events.subscribe()
    }

    // ============================================================
    // Lifecycle
    // ============================================================

    /// Load the persisted snapshot. Runs once; later calls are no-ops.
    ///
    /// A missing or unreadable snapshot leaves the graph empty.
    pub async fn initialize(&mut self) -> EngineResult<()> {
        match self.state {
            Lifecycle::Ready => return Ok(()),
            Lifecycle::Disposed => return Err(EngineError::Disposed),
            Lifecycle::Uninitialized => {}
        }

        match persistence::load_graph(&self.storage, &self.config).await {
            Ok(Some(data)) => self.store.load(data),
            Ok(None) => debug!("No persisted graph found, starting empty"),
            Err(e) => warn!("Failed to load persisted graph, starting empty: {}", e),
        }

        self.state = Lifecycle::Ready;
        info!(
            "Graph engine initialized with {} nodes and {} edges",
            self.store.node_count(),
            self.store.edge_count()
        );
        self.events.emit(GraphEvent::Initialized {
            node_count: self.store.node_count(),
            edge_count: self.store.edge_count(),
        });
        Ok(())
    }

    /// Release subscribers and refuse further calls. State is not flushed:
    /// every completed write is already persisted.
    pub fn dispose(&mut self) {
        if self.state != Lifecycle::Disposed {
            info!("Disposing graph engine");
            self.events.close();
            self.store.clear();
            self.state = Lifecycle::Disposed;
        }
    }

    async fn ensure_initialized(&mut self) -> EngineResult<()> {
        if self.state == Lifecycle::Ready {
            return Ok(());
        }
        self.initialize().await
    }

    async fn persist(&self) -> EngineResult<()> {
        persistence::save_graph(&self.storage, &self.config, &self.store).await?;
        Ok(())
    }

    // ============================================================
    // Nodes
    // ============================================================

    pub async fn create_node(
        &mut self,
        labels: Vec<Label>,
        properties: PropertyMap,
    ) -> EngineResult<Node> {
        self.ensure_initialized().await?;
        let node = self.store.create_node(labels, properties).clone();
        self.persist().await?;
        self.events.emit(GraphEvent::NodeCreated { node: node.clone() });
        Ok(node)
    }

    /// Merge `properties` into a node. `Ok(None)` if the node does not exist.
    pub async fn update_node(
        &mut self,
        id: &NodeId,
        properties: PropertyMap,
    ) -> EngineResult<Option<Node>> {
        self.ensure_initialized().await?;
        let Some(node) = self.store.update_node(id, properties).cloned() else {
            return Ok(None);
        };
        self.persist().await?;
        self.events.emit(GraphEvent::NodeUpdated { node: node.clone() });
        Ok(Some(node))
    }

    /// Delete a node after deleting every edge that touches it.
    /// `Ok(false)` if the node does not exist.
    pub async fn delete_node(&mut self, id: &NodeId) -> EngineResult<bool> {
        self.ensure_initialized().await?;
        if !self.store.has_node(id) {
            return Ok(false);
        }

        for edge_id in self.store.edges_touching(id) {
            self.delete_edge(&edge_id).await?;
        }

        self.store.remove_node(id);
        self.persist().await?;
        self.events.emit(GraphEvent::NodeDeleted { id: id.clone() });
        Ok(true)
    }

    pub async fn get_node(&mut self, id: &NodeId) -> EngineResult<Option<&Node>> {
        self.ensure_initialized().await?;
        Ok(self.store.get_node(id))
    }

    pub async fn get_nodes_by_label(&mut self, label: &Label) -> EngineResult<Vec<&Node>> {
        self.ensure_initialized().await?;
        Ok(self.store.get_nodes_by_label(label))
    }

    // ============================================================
    // Edges
    // ============================================================

    /// Create an edge. `Ok(None)`, with nothing persisted or emitted, if either
    /// endpoint is missing.
    pub async fn create_edge(
        &mut self,
        edge_type: impl Into<EdgeType>,
        from_id: &NodeId,
        to_id: &NodeId,
        properties: PropertyMap,
    ) -> EngineResult<Option<Edge>> {
        self.ensure_initialized().await?;
        let Some(edge) = self
            .store
            .create_edge(edge_type, from_id, to_id, properties)
            .cloned()
        else {
            return Ok(None);
        };
        self.persist().await?;
        self.events.emit(GraphEvent::EdgeCreated { edge: edge.clone() });
        Ok(Some(edge))
    }

    /// `Ok(false)` if the edge does not exist
    pub async fn delete_edge(&mut self, id: &EdgeId) -> EngineResult<bool> {
        self.ensure_initialized().await?;
        if self.store.remove_edge(id).is_none() {
            return Ok(false);
        }
        self.persist().await?;
        self.events.emit(GraphEvent::EdgeDeleted { id: id.clone() });
        Ok(true)
    }

    pub async fn get_edge(&mut self, id: &EdgeId) -> EngineResult<Option<&Edge>> {
        self.ensure_initialized().await?;
        Ok(self.store.get_edge(id))
    }

    pub async fn get_edges_by_type(&mut self, edge_type: &EdgeType) -> EngineResult<Vec<&Edge>> {
        self.ensure_initialized().await?;
        Ok(self.store.get_edges_by_type(edge_type))
    }

    // ============================================================
    // Reads
    // ============================================================

    pub async fn query(&mut self, filter: &NodeFilter) -> EngineResult<QueryResults<'_>> {
        self.ensure_initialized().await?;
        Ok(query::execute(&self.store, filter))
    }

    pub async fn find_path(
        &mut self,
        from: &NodeId,
        to: &NodeId,
        max_depth: usize,
    ) -> EngineResult<Option<PathResult>> {
        self.ensure_initialized().await?;
        Ok(algo::find_path(&self.store, from, to, max_depth))
    }

    pub async fn traverse(&mut self, start: &NodeId, depth: usize) -> EngineResult<Subgraph> {
        self.ensure_initialized().await?;
        Ok(algo::traverse(&self.store, start, depth))
    }

    pub async fn get_stats(&mut self) -> EngineResult<GraphStatistics> {
        self.ensure_initialized().await?;
        Ok(self.store.statistics())
    }

    // ============================================================
    // Whole-graph operations
    // ============================================================

    /// Remove every node and edge and persist the empty graph
    pub async fn clear(&mut self) -> EngineResult<()> {
        self.ensure_initialized().await?;
        self.store.clear();
        self.persist().await?;
        info!("Graph cleared");
        self.events.emit(GraphEvent::GraphCleared);
        Ok(())
    }

    pub async fn export_graph(&mut self) -> EngineResult<GraphData> {
        self.ensure_initialized().await?;
        Ok(self.store.export())
    }

    /// Replace the graph with `data`. Edges are not checked against the
    /// imported nodes.
    pub async fn import_graph(&mut self, data: GraphData) -> EngineResult<()> {
        self.clear().await?;
        self.store.load(data);
        self.persist().await?;

        let node_count = self.store.node_count();
        let edge_count = self.store.edge_count();
        info!("Imported graph with {} nodes and {} edges", node_count, edge_count);
        self.events.emit(GraphEvent::GraphImported { node_count, edge_count });
        Ok(())
    }
}
