//! Knowgraph
//!
//! An embedded property graph engine: labelled nodes, typed directed edges,
//! label and edge-type indices, breadth-first path finding and neighbourhood
//! traversal. The whole graph is kept in memory and written through to a
//! pluggable document store as a single snapshot after every mutation.
//!
//! # Modules
//!
//! - [`graph`]: data model, in-memory store and lifecycle events
//! - [`query`]: label and exact-property node filtering
//! - [`algo`]: shortest path and bounded traversal
//! - [`persistence`]: storage adapters and snapshot codec
//! - [`engine`]: the asynchronous facade tying them together
//!
//! ## Example Usage
//!
//! ```rust
//! use knowgraph::{props, GraphEngine, Label, MemoryStorage, NodeFilter};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), knowgraph::EngineError> {
//! let mut engine = GraphEngine::new(MemoryStorage::new());
//!
//! let alice = engine.create_node(vec![Label::new("Person")], props([("name", "Alice")])).await?;
//! let bob = engine.create_node(vec![Label::new("Person")], props([("name", "Bob")])).await?;
//! engine.create_edge("KNOWS", &alice.id, &bob.id, props([("since", 2020i64)])).await?;
//!
//! let path = engine.find_path(&alice.id, &bob.id, 6).await?.unwrap();
//! assert_eq!(path.length, 1);
//!
//! let people = engine.query(&NodeFilter::new().with_labels(["Person"])).await?;
//! assert_eq!(people.len(), 2);
//! # Ok(())
//! # }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod config;
pub mod engine;
pub mod graph;
pub mod persistence;
pub mod query;

// Re-export main types for convenience
pub use graph::{
    props, Edge, EdgeId, EdgeType, GraphData, GraphEvent, GraphStatistics, GraphStore, Label,
    Node, NodeId, PropertyMap, PropertyValue,
};

pub use algo::{PathResult, Subgraph};

pub use query::{NodeFilter, QueryResults};

pub use config::{ConfigError, ConfigResult, EngineConfig};

pub use engine::{EngineError, EngineResult, GraphEngine};

pub use persistence::{
    GraphSnapshot, ItemFilter, MemoryStorage, PersistenceError, PersistenceResult,
    StorageAdapter, StorageError, StorageResult, StoredItem,
};

#[cfg(feature = "rocksdb")]
pub use persistence::RocksStorage;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
