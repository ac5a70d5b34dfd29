//! Edge implementation for the property graph

use super::property::{PropertyMap, PropertyValue};
use super::types::{EdgeId, EdgeType, NodeId};
use serde::{Deserialize, Serialize};

/// A directed, typed edge in the property graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Unique identifier for this edge
    pub id: EdgeId,

    /// Type of relationship (e.g., "KNOWS", "MENTIONS")
    #[serde(rename = "type")]
    pub edge_type: EdgeType,

    /// Source node (edge goes FROM this node)
    pub from_id: NodeId,

    /// Target node (edge goes TO this node)
    pub to_id: NodeId,

    /// Properties associated with this edge
    #[serde(default)]
    pub properties: PropertyMap,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
}

impl Edge {
    pub fn new(
        id: EdgeId,
        edge_type: impl Into<EdgeType>,
        from_id: NodeId,
        to_id: NodeId,
        properties: PropertyMap,
    ) -> Self {
        Edge {
            id,
            edge_type: edge_type.into(),
            from_id,
            to_id,
            properties,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Check if this edge touches a node as source or target
    pub fn touches(&self, node: &NodeId) -> bool {
        self.from_id == *node || self.to_id == *node
    }

    /// Check if this edge goes FROM `from` TO `to`
    pub fn links(&self, from: &NodeId, to: &NodeId) -> bool {
        self.from_id == *from && self.to_id == *to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knows(id: &str, from: &str, to: &str) -> Edge {
        Edge::new(
            EdgeId::new(id),
            "KNOWS",
            NodeId::new(from),
            NodeId::new(to),
            PropertyMap::new(),
        )
    }

    #[test]
    fn test_edge_direction() {
        let edge = knows("e1", "a", "b");

        assert!(edge.links(&NodeId::new("a"), &NodeId::new("b")));
        assert!(!edge.links(&NodeId::new("b"), &NodeId::new("a")));
        assert!(edge.touches(&NodeId::new("a")));
        assert!(edge.touches(&NodeId::new("b")));
        assert!(!edge.touches(&NodeId::new("c")));
    }

    #[test]
    fn test_edge_snapshot_shape() {
        let edge = knows("e2", "a", "b");
        let json = serde_json::to_value(&edge).unwrap();

        assert_eq!(json["type"], "KNOWS");
        assert_eq!(json["fromId"], "a");
        assert_eq!(json["toId"], "b");
        assert!(json.get("createdAt").is_some());

        let back: Edge = serde_json::from_value(json).unwrap();
        assert_eq!(back, edge);
    }
}
