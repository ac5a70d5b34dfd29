//! In-memory graph storage
//!
//! Owns the node and edge collections plus three derived indices:
//! - label_index: Label -> node ids carrying that label
//! - edge_type_index: EdgeType -> edge ids of that type
//! - adjacency: NodeId -> node ids reachable through one outgoing edge
//!
//! The store is synchronous and knows nothing about persistence or
//! notification; [`crate::engine::GraphEngine`] layers those on top.

use super::edge::Edge;
use super::node::Node;
use super::property::PropertyMap;
use super::types::{EdgeId, EdgeType, Label, NodeId};
use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Summary counters for a graph, also written into every snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStatistics {
    pub node_count: usize,
    pub edge_count: usize,
    /// Distinct labels in use, sorted
    pub labels: Vec<String>,
    /// Distinct edge types in use, sorted
    pub edge_types: Vec<String>,
}

/// Plain listing of every node and edge, used for export/import and snapshots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

/// In-memory graph storage
///
/// Collections are insertion ordered, so iteration order (and therefore
/// "first matching edge" lookups) is stable across deletes.
#[derive(Debug, Default)]
pub struct GraphStore {
    nodes: IndexMap<NodeId, Node>,
    edges: IndexMap<EdgeId, Edge>,
    label_index: HashMap<Label, IndexSet<NodeId>>,
    edge_type_index: HashMap<EdgeType, IndexSet<EdgeId>>,
    /// Outgoing adjacency. Stores targets only, so parallel edges between
    /// the same ordered pair share one entry.
    adjacency: HashMap<NodeId, IndexSet<NodeId>>,
}

impl GraphStore {
    /// Create a new empty graph store
    pub fn new() -> Self {
        Self::default()
    }

    // ============================================================
    // Nodes
    // ============================================================

    /// Create a node with a fresh id
    pub fn create_node(&mut self, labels: Vec<Label>, properties: PropertyMap) -> &Node {
        let node = Node::new(NodeId::generate(), labels, properties);
        debug!("Creating node {} with {} labels", node.id, node.label_count());
        self.insert_node(node)
    }

    /// Shallow-merge `properties` into a node; `None` if the node is absent
    pub fn update_node(&mut self, id: &NodeId, properties: PropertyMap) -> Option<&Node> {
        let node = self.nodes.get_mut(id)?;
        node.merge_properties(properties);
        Some(&*node)
    }

    /// Remove a node, any edges still touching it, its label entries and its
    /// adjacency entry
    pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        if !self.nodes.contains_key(id) {
            return None;
        }

        for edge_id in self.edges_touching(id) {
            self.remove_edge(&edge_id);
        }

        let node = self.nodes.shift_remove(id)?;
        for label in &node.labels {
            if let Some(set) = self.label_index.get_mut(label) {
                set.shift_remove(id);
                if set.is_empty() {
                    self.label_index.remove(label);
                }
            }
        }
        self.adjacency.remove(id);

        debug!("Removed node {}", id);
        Some(node)
    }

    pub fn get_node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn has_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Get all nodes with a specific label
    pub fn get_nodes_by_label(&self, label: &Label) -> Vec<&Node> {
        self.label_index
            .get(label)
            .map(|ids| ids.iter().filter_map(|id| self.nodes.get(id)).collect())
            .unwrap_or_default()
    }

    /// Every node, in insertion order
    pub fn all_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ============================================================
    // Edges
    // ============================================================

    /// Create an edge between two existing nodes. Returns `None` with no side
    /// effects when either endpoint is missing.
    pub fn create_edge(
        &mut self,
        edge_type: impl Into<EdgeType>,
        from_id: &NodeId,
        to_id: &NodeId,
        properties: PropertyMap,
    ) -> Option<&Edge> {
        if !self.has_node(from_id) || !self.has_node(to_id) {
            debug!("Rejecting edge {} -> {}: missing endpoint", from_id, to_id);
            return None;
        }

        let edge = Edge::new(
            EdgeId::generate(),
            edge_type,
            from_id.clone(),
            to_id.clone(),
            properties,
        );
        debug!("Creating edge {} ({}): {} -> {}", edge.id, edge.edge_type, from_id, to_id);
        Some(self.insert_edge(edge))
    }

    /// Remove an edge from the collection, the type index and the adjacency
    /// index.
    ///
    /// The adjacency entry `from -> to` is dropped even if another edge of the
    /// same ordered pair is still alive.
    pub fn remove_edge(&mut self, id: &EdgeId) -> Option<Edge> {
        let edge = self.edges.shift_remove(id)?;

        if let Some(set) = self.edge_type_index.get_mut(&edge.edge_type) {
            set.shift_remove(id);
            if set.is_empty() {
                self.edge_type_index.remove(&edge.edge_type);
            }
        }

        if let Some(targets) = self.adjacency.get_mut(&edge.from_id) {
            targets.shift_remove(&edge.to_id);
            if targets.is_empty() {
                self.adjacency.remove(&edge.from_id);
            }
        }

        debug!("Removed edge {}", id);
        Some(edge)
    }

    pub fn get_edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Get all edges of a specific type
    pub fn get_edges_by_type(&self, edge_type: &EdgeType) -> Vec<&Edge> {
        self.edge_type_index
            .get(edge_type)
            .map(|ids| ids.iter().filter_map(|id| self.edges.get(id)).collect())
            .unwrap_or_default()
    }

    /// Every edge, in insertion order
    pub fn all_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Ids of every edge with `node` as source or target
    pub fn edges_touching(&self, node: &NodeId) -> Vec<EdgeId> {
        self.edges
            .values()
            .filter(|e| e.touches(node))
            .map(|e| e.id.clone())
            .collect()
    }

    /// Edges leaving `node`, found by scanning the edge collection
    pub fn outgoing_edges(&self, node: &NodeId) -> Vec<&Edge> {
        self.edges.values().filter(|e| e.from_id == *node).collect()
    }

    /// Edges entering `node`, found by scanning the edge collection
    pub fn incoming_edges(&self, node: &NodeId) -> Vec<&Edge> {
        self.edges.values().filter(|e| e.to_id == *node).collect()
    }

    /// First edge in collection order going `from -> to`
    pub fn first_edge_between(&self, from: &NodeId, to: &NodeId) -> Option<&Edge> {
        self.edges.values().find(|e| e.links(from, to))
    }

    /// Targets directly reachable from `node` according to the adjacency index
    pub fn neighbors(&self, node: &NodeId) -> impl Iterator<Item = &NodeId> {
        self.adjacency.get(node).into_iter().flatten()
    }

    // ============================================================
    // Whole-graph operations
    // ============================================================

    pub fn statistics(&self) -> GraphStatistics {
        let labels: BTreeSet<&str> = self.label_index.keys().map(Label::as_str).collect();
        let edge_types: BTreeSet<&str> =
            self.edge_type_index.keys().map(EdgeType::as_str).collect();

        GraphStatistics {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            labels: labels.into_iter().map(str::to_string).collect(),
            edge_types: edge_types.into_iter().map(str::to_string).collect(),
        }
    }

    /// Clone out every node and edge
    pub fn export(&self) -> GraphData {
        GraphData {
            nodes: self.nodes.values().cloned().collect(),
            edges: self.edges.values().cloned().collect(),
        }
    }

    /// Replace all state with `data`, rebuilding every index.
    ///
    /// Edges are not checked against the node set: an edge naming a missing
    /// node still lands in the type and adjacency indices.
    pub fn load(&mut self, data: GraphData) {
        self.clear();
        for node in data.nodes {
            self.insert_node(node);
        }
        for edge in data.edges {
            self.insert_edge(edge);
        }
    }

    /// Clear all data from the graph
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.label_index.clear();
        self.edge_type_index.clear();
        self.adjacency.clear();
    }

    /// Add a node and its label entries. A repeated id keeps the node stored
    /// first and leaves the indices untouched.
    fn insert_node(&mut self, node: Node) -> &Node {
        match self.nodes.entry(node.id.clone()) {
            Entry::Occupied(existing) => {
                debug!("Ignoring duplicate node id {}", node.id);
                existing.into_mut()
            }
            Entry::Vacant(slot) => {
                for label in &node.labels {
                    self.label_index
                        .entry(label.clone())
                        .or_default()
                        .insert(node.id.clone());
                }
                slot.insert(node)
            }
        }
    }

    /// Add an edge with its type and adjacency entries. A repeated id keeps
    /// the edge stored first.
    fn insert_edge(&mut self, edge: Edge) -> &Edge {
        match self.edges.entry(edge.id.clone()) {
            Entry::Occupied(existing) => {
                debug!("Ignoring duplicate edge id {}", edge.id);
                existing.into_mut()
            }
            Entry::Vacant(slot) => {
                self.edge_type_index
                    .entry(edge.edge_type.clone())
                    .or_default()
                    .insert(edge.id.clone());
                self.adjacency
                    .entry(edge.from_id.clone())
                    .or_default()
                    .insert(edge.to_id.clone());
                slot.insert(edge)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::property::{props, PropertyValue};

    fn person(store: &mut GraphStore, name: &str) -> NodeId {
        store
            .create_node(vec![Label::new("Person")], props([("name", name)]))
            .id
            .clone()
    }

    #[test]
    fn test_create_and_get_node() {
        let mut store = GraphStore::new();
        let created = store
            .create_node(vec![Label::new("Person")], props([("name", "Alice")]))
            .clone();

        assert_eq!(store.node_count(), 1);
        assert_eq!(store.get_node(&created.id), Some(&created));
    }

    #[test]
    fn test_label_index() {
        let mut store = GraphStore::new();
        person(&mut store, "A");
        person(&mut store, "B");
        store.create_node(vec![Label::new("Company")], PropertyMap::new());

        assert_eq!(store.get_nodes_by_label(&Label::new("Person")).len(), 2);
        assert_eq!(store.get_nodes_by_label(&Label::new("Company")).len(), 1);
        assert!(store.get_nodes_by_label(&Label::new("Missing")).is_empty());
    }

    #[test]
    fn test_update_missing_node() {
        let mut store = GraphStore::new();
        assert!(store
            .update_node(&NodeId::new("nope"), props([("k", "v")]))
            .is_none());
    }

    #[test]
    fn test_edge_requires_both_endpoints() {
        let mut store = GraphStore::new();
        let a = person(&mut store, "A");
        let ghost = NodeId::new("ghost");

        assert!(store.create_edge("KNOWS", &a, &ghost, PropertyMap::new()).is_none());
        assert!(store.create_edge("KNOWS", &ghost, &a, PropertyMap::new()).is_none());
        assert_eq!(store.edge_count(), 0);
        assert_eq!(store.neighbors(&a).count(), 0);
        assert!(store.statistics().edge_types.is_empty());
    }

    #[test]
    fn test_edge_type_index_and_adjacency() {
        let mut store = GraphStore::new();
        let a = person(&mut store, "A");
        let b = person(&mut store, "B");
        let c = person(&mut store, "C");

        store.create_edge("KNOWS", &a, &b, PropertyMap::new()).unwrap();
        store.create_edge("KNOWS", &b, &c, PropertyMap::new()).unwrap();
        store.create_edge("FOLLOWS", &a, &c, PropertyMap::new()).unwrap();

        assert_eq!(store.get_edges_by_type(&EdgeType::new("KNOWS")).len(), 2);
        assert_eq!(store.get_edges_by_type(&EdgeType::new("FOLLOWS")).len(), 1);

        let from_a: Vec<&NodeId> = store.neighbors(&a).collect();
        assert_eq!(from_a, vec![&b, &c]);
        assert_eq!(store.incoming_edges(&c).len(), 2);
        assert_eq!(store.outgoing_edges(&c).len(), 0);
    }

    #[test]
    fn test_remove_node_cascades() {
        let mut store = GraphStore::new();
        let a = person(&mut store, "A");
        let b = person(&mut store, "B");
        let e1 = store.create_edge("KNOWS", &a, &b, PropertyMap::new()).unwrap().id.clone();
        let e2 = store.create_edge("KNOWS", &b, &a, PropertyMap::new()).unwrap().id.clone();

        assert!(store.remove_node(&a).is_some());
        assert!(store.get_edge(&e1).is_none());
        assert!(store.get_edge(&e2).is_none());
        assert_eq!(store.neighbors(&b).count(), 0);
        assert_eq!(store.get_nodes_by_label(&Label::new("Person")).len(), 1);
        assert!(store.remove_node(&a).is_none());
    }

    #[test]
    fn test_parallel_edges_share_adjacency_entry() {
        let mut store = GraphStore::new();
        let a = person(&mut store, "A");
        let b = person(&mut store, "B");
        let knows = store.create_edge("KNOWS", &a, &b, PropertyMap::new()).unwrap().id.clone();
        store.create_edge("LIKES", &a, &b, PropertyMap::new()).unwrap();

        assert_eq!(store.neighbors(&a).count(), 1);

        // Removing one parallel edge drops the shared adjacency entry while the
        // other edge stays in the collection.
        store.remove_edge(&knows);
        assert_eq!(store.edge_count(), 1);
        assert_eq!(store.neighbors(&a).count(), 0);
    }

    #[test]
    fn test_first_edge_between_uses_insertion_order() {
        let mut store = GraphStore::new();
        let a = person(&mut store, "A");
        let b = person(&mut store, "B");
        let first = store.create_edge("KNOWS", &a, &b, PropertyMap::new()).unwrap().id.clone();
        store.create_edge("LIKES", &a, &b, PropertyMap::new()).unwrap();

        assert_eq!(store.first_edge_between(&a, &b).unwrap().id, first);
        assert!(store.first_edge_between(&b, &a).is_none());
    }

    #[test]
    fn test_statistics_drop_unused_labels() {
        let mut store = GraphStore::new();
        let a = person(&mut store, "A");
        store.create_node(vec![Label::new("Topic")], PropertyMap::new());

        assert_eq!(store.statistics().labels, vec!["Person", "Topic"]);

        store.remove_node(&a);
        let stats = store.statistics();
        assert_eq!(stats.node_count, 1);
        assert_eq!(stats.labels, vec!["Topic"]);
    }

    #[test]
    fn test_load_does_not_validate_edges() {
        let mut source = GraphStore::new();
        let a = person(&mut source, "A");
        let b = person(&mut source, "B");
        source.create_edge("KNOWS", &a, &b, PropertyMap::new()).unwrap();

        let mut data = source.export();
        data.nodes.retain(|n| n.id == a);

        let mut store = GraphStore::new();
        store.load(data);

        assert_eq!(store.node_count(), 1);
        assert_eq!(store.edge_count(), 1);
        // Dangling adjacency towards the missing node
        assert_eq!(store.neighbors(&a).collect::<Vec<_>>(), vec![&b]);
        assert!(store.get_node(&b).is_none());
    }

    #[test]
    fn test_load_ignores_repeated_ids() {
        let a = Node::new(NodeId::new("a"), vec![Label::new("P")], PropertyMap::new());
        let b = Node::new(NodeId::new("b"), vec![Label::new("P")], PropertyMap::new());
        let c = Node::new(NodeId::new("c"), vec![Label::new("P")], PropertyMap::new());
        let a_again = Node::new(NodeId::new("a"), vec![Label::new("Ghost")], PropertyMap::new());
        let knows = Edge::new(
            EdgeId::new("e1"),
            "KNOWS",
            a.id.clone(),
            b.id.clone(),
            PropertyMap::new(),
        );
        let likes = Edge::new(
            EdgeId::new("e1"),
            "LIKES",
            a.id.clone(),
            c.id.clone(),
            PropertyMap::new(),
        );

        let mut store = GraphStore::new();
        store.load(GraphData {
            nodes: vec![a.clone(), b, c, a_again],
            edges: vec![knows, likes],
        });

        assert_eq!(store.node_count(), 3);
        assert_eq!(store.get_node(&a.id), Some(&a));
        assert!(store.get_nodes_by_label(&Label::new("Ghost")).is_empty());

        assert_eq!(store.edge_count(), 1);
        assert_eq!(store.get_edge(&EdgeId::new("e1")).unwrap().edge_type, EdgeType::new("KNOWS"));
        assert!(store.get_edges_by_type(&EdgeType::new("LIKES")).is_empty());
        assert_eq!(store.neighbors(&a.id).collect::<Vec<_>>(), vec![&NodeId::new("b")]);

        let stats = store.statistics();
        assert_eq!(stats.labels, vec!["P"]);
        assert_eq!(stats.edge_types, vec!["KNOWS"]);
    }

    #[test]
    fn test_export_load_round_trip() {
        let mut source = GraphStore::new();
        let a = person(&mut source, "A");
        let b = source
            .create_node(
                vec![Label::new("Company")],
                props([("size", PropertyValue::from(40i64))]),
            )
            .id
            .clone();
        source.create_edge("WORKS_AT", &a, &b, PropertyMap::new()).unwrap();

        let mut copy = GraphStore::new();
        copy.load(source.export());

        assert_eq!(copy.statistics(), source.statistics());
        assert_eq!(copy.get_node(&b), source.get_node(&b));
    }

    #[test]
    fn test_clear() {
        let mut store = GraphStore::new();
        let a = person(&mut store, "A");
        let b = person(&mut store, "B");
        store.create_edge("KNOWS", &a, &b, PropertyMap::new()).unwrap();

        store.clear();
        assert_eq!(store.statistics(), GraphStatistics::default());
        assert_eq!(store.neighbors(&a).count(), 0);
    }
}
