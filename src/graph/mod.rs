//! Core graph data model
//!
//! Nodes with labels and properties, typed directed edges, the in-memory
//! store with its derived indices, and the lifecycle events it produces.

pub mod edge;
pub mod event;
pub mod node;
pub mod property;
pub mod store;
pub mod types;

// Re-export main types
pub use edge::Edge;
pub use event::{EventNotifier, GraphEvent};
pub use node::Node;
pub use property::{props, PropertyMap, PropertyValue};
pub use store::{GraphData, GraphStatistics, GraphStore};
pub use types::{EdgeId, EdgeType, Label, NodeId};
