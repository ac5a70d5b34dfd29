//! Pathfinding and neighbourhood traversal
//!
//! `find_path` is a directed, depth-bounded BFS over the outgoing adjacency
//! index. `traverse` walks both directions and returns the induced subgraph.

use crate::graph::{Edge, EdgeId, GraphStore, Node, NodeId};
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::collections::VecDeque;

/// Result of a shortest-path search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    /// Nodes from source to target
    pub nodes: Vec<Node>,
    /// For each consecutive node pair, the first edge linking them
    pub edges: Vec<Edge>,
    /// Number of hops from source to target
    pub length: usize,
}

impl PathResult {
    pub fn node_ids(&self) -> Vec<&NodeId> {
        self.nodes.iter().map(|n| &n.id).collect()
    }
}

/// Nodes and edges reached by [`traverse`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Subgraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Subgraph {
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.iter().any(|n| n.id == *id)
    }

    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edges.iter().any(|e| e.id == *id)
    }
}

/// Breadth-first shortest path (by edge count) from `from` to `to`.
///
/// Only outgoing adjacency is followed. Paths longer than `max_depth` hops are
/// pruned. A node is marked visited when dequeued, so the first time the
/// target is dequeued its path is minimal.
pub fn find_path(
    store: &GraphStore,
    from: &NodeId,
    to: &NodeId,
    max_depth: usize,
) -> Option<PathResult> {
    if !store.has_node(from) || !store.has_node(to) {
        return None;
    }

    let mut queue: VecDeque<(NodeId, Vec<NodeId>)> = VecDeque::new();
    let mut visited: FxHashSet<NodeId> = FxHashSet::default();
    queue.push_back((from.clone(), vec![from.clone()]));

    while let Some((current, path)) = queue.pop_front() {
        if current == *to {
            return Some(build_path(store, path));
        }

        if !visited.insert(current.clone()) {
            continue;
        }

        // path.len() - 1 hops taken so far
        if path.len() > max_depth {
            continue;
        }

        for next in store.neighbors(&current) {
            if visited.contains(next) {
                continue;
            }
            let mut extended = path.clone();
            extended.push(next.clone());
            queue.push_back((next.clone(), extended));
        }
    }

    None
}

fn build_path(store: &GraphStore, ids: Vec<NodeId>) -> PathResult {
    let length = ids.len().saturating_sub(1);

    let edges = ids
        .windows(2)
        .filter_map(|pair| store.first_edge_between(&pair[0], &pair[1]))
        .cloned()
        .collect();

    let nodes = ids
        .iter()
        .filter_map(|id| store.get_node(id))
        .cloned()
        .collect();

    PathResult { nodes, edges, length }
}

/// Bounded exploration from `start` in both directions.
///
/// Outgoing neighbours come from the adjacency index; incoming ones from a
/// scan of every edge whose target is the frontier node. Nodes at most
/// `depth` hops away are included, with every edge crossed on the way.
/// An absent start yields an empty subgraph.
pub fn traverse(store: &GraphStore, start: &NodeId, depth: usize) -> Subgraph {
    let mut result = Subgraph::default();
    let Some(start_node) = store.get_node(start) else {
        return result;
    };

    let mut visited_nodes: FxHashSet<NodeId> = FxHashSet::default();
    let mut visited_edges: FxHashSet<EdgeId> = FxHashSet::default();
    let mut frontier: VecDeque<(NodeId, usize)> = VecDeque::new();

    visited_nodes.insert(start.clone());
    result.nodes.push(start_node.clone());
    frontier.push_back((start.clone(), 0));

    while let Some((current, level)) = frontier.pop_front() {
        if level >= depth {
            continue;
        }

        let targets: FxHashSet<&NodeId> = store.neighbors(&current).collect();
        let mut reached: Vec<(&Edge, &NodeId)> = store
            .outgoing_edges(&current)
            .into_iter()
            .filter(|e| targets.contains(&e.to_id))
            .map(|e| (e, &e.to_id))
            .collect();
        reached.extend(
            store
                .incoming_edges(&current)
                .into_iter()
                .map(|e| (e, &e.from_id)),
        );

        for (edge, next) in reached {
            if visited_edges.insert(edge.id.clone()) {
                result.edges.push(edge.clone());
            }
            if visited_nodes.contains(next) {
                continue;
            }
            // Dangling adjacency after an unchecked import: nothing to include
            if let Some(node) = store.get_node(next) {
                visited_nodes.insert(next.clone());
                result.nodes.push(node.clone());
                frontier.push_back((next.clone(), level + 1));
            }
        }
    }

    result
}
