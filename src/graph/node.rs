//! Node implementation for the property graph

use super::property::{PropertyMap, PropertyValue};
use super::types::{Label, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A node in the property graph
///
/// Identity and labels are fixed at creation; only properties change
/// afterwards, and only through [`Node::merge_properties`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier for this node
    pub id: NodeId,

    /// Set of labels for this node (may be empty)
    pub labels: HashSet<Label>,

    /// Properties associated with this node
    #[serde(default)]
    pub properties: PropertyMap,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,

    /// Last update timestamp (Unix milliseconds)
    pub updated_at: i64,
}

impl Node {
    /// Create a new node with labels and properties
    pub fn new(id: NodeId, labels: Vec<Label>, properties: PropertyMap) -> Self {
        let now = chrono::Utc::now().timestamp_millis();

        Node {
            id,
            labels: labels.into_iter().collect(),
            properties,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if node has a specific label
    pub fn has_label(&self, label: &Label) -> bool {
        self.labels.contains(label)
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Shallow merge: new keys are added, matching keys overwritten, the
    /// rest left untouched. Always bumps `updated_at`.
    pub fn merge_properties(&mut self, properties: PropertyMap) {
        self.properties.extend(properties);
        self.touch();
    }

    /// True when every `(key, value)` in `filter` is present with an equal value
    pub fn matches_properties(&self, filter: &PropertyMap) -> bool {
        filter
            .iter()
            .all(|(key, value)| self.properties.get(key) == Some(value))
    }

    fn touch(&mut self) {
        // Keep updated_at monotonic even when two writes share a millisecond
        let now = chrono::Utc::now().timestamp_millis();
        self.updated_at = now.max(self.updated_at + 1);
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::property::props;

    #[test]
    fn test_create_node_multiple_labels() {
        let node = Node::new(
            NodeId::new("n1"),
            vec![Label::new("Person"), Label::new("Employee")],
            PropertyMap::new(),
        );

        assert_eq!(node.label_count(), 2);
        assert!(node.has_label(&Label::new("Person")));
        assert!(node.has_label(&Label::new("Employee")));
        assert_eq!(node.created_at, node.updated_at);
    }

    #[test]
    fn test_node_without_labels() {
        let node = Node::new(NodeId::new("n2"), vec![], PropertyMap::new());
        assert_eq!(node.label_count(), 0);
    }

    #[test]
    fn test_merge_properties_is_shallow() {
        let mut node = Node::new(
            NodeId::new("n3"),
            vec![Label::new("Person")],
            props([("name", PropertyValue::from("Alice")), ("age", 30i64.into())]),
        );
        let before = node.updated_at;

        node.merge_properties(props([
            ("age", PropertyValue::from(31i64)),
            ("city", "Oslo".into()),
        ]));

        assert_eq!(node.get_property("name").unwrap().as_str(), Some("Alice"));
        assert_eq!(node.get_property("age").unwrap().as_integer(), Some(31));
        assert_eq!(node.get_property("city").unwrap().as_str(), Some("Oslo"));
        assert_eq!(node.property_count(), 3);
        assert!(node.updated_at > before);
    }

    #[test]
    fn test_matches_properties_exactly() {
        let node = Node::new(
            NodeId::new("n4"),
            vec![],
            props([("score", PropertyValue::from(10i64))]),
        );

        assert!(node.matches_properties(&PropertyMap::new()));
        assert!(node.matches_properties(&props([("score", PropertyValue::from(10i64))])));
        assert!(!node.matches_properties(&props([("score", PropertyValue::from(10.0))])));
        assert!(!node.matches_properties(&props([("missing", PropertyValue::Null)])));
    }

    #[test]
    fn test_snapshot_field_names() {
        let node = Node::new(NodeId::new("n5"), vec![Label::new("A")], PropertyMap::new());
        let json = serde_json::to_value(&node).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json["labels"][0], "A");
    }
}
