//! Node filtering by label membership and exact property match
//!
//! The engine is addressed only through [`NodeFilter`]; there is no string
//! query language.

use crate::graph::{GraphStore, Label, Node, PropertyMap};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Typed filter over the node collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeFilter {
    /// Keep nodes carrying any of these labels. `None` starts from all nodes.
    pub node_labels: Option<Vec<Label>>,
    /// Every key must be present with an exactly equal value
    pub properties: Option<PropertyMap>,
    /// Cap on the number of results
    pub limit: Option<usize>,
}

impl NodeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_labels<L: Into<Label>>(mut self, labels: impl IntoIterator<Item = L>) -> Self {
        self.node_labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_properties(mut self, properties: PropertyMap) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Single-pass result sequence of a node query
#[derive(Debug)]
pub struct QueryResults<'a> {
    inner: std::vec::IntoIter<&'a Node>,
}

impl<'a> Iterator for QueryResults<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for QueryResults<'_> {}

/// Run `filter` against the store.
///
/// A node reached through several requested labels is returned once, at the
/// position of its first match. `limit` applies after de-duplication.
pub fn execute<'a>(store: &'a GraphStore, filter: &NodeFilter) -> QueryResults<'a> {
    let candidates: Vec<&'a Node> = match &filter.node_labels {
        Some(labels) => {
            let mut seen = FxHashSet::default();
            labels
                .iter()
                .flat_map(|label| store.get_nodes_by_label(label))
                .filter(|node| seen.insert(node.id.clone()))
                .collect()
        }
        None => store.all_nodes().collect(),
    };

    let limit = filter.limit.unwrap_or(usize::MAX);
    let matched: Vec<&'a Node> = candidates
        .into_iter()
        .filter(|node| {
            filter
                .properties
                .as_ref()
                .map_or(true, |props| node.matches_properties(props))
        })
        .take(limit)
        .collect();

    QueryResults {
        inner: matched.into_iter(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{props, PropertyValue};

    fn sample() -> GraphStore {
        let mut store = GraphStore::new();
        store.create_node(
            vec![Label::new("Person"), Label::new("Employee")],
            props([("name", PropertyValue::from("Alice")), ("age", 30i64.into())]),
        );
        store.create_node(
            vec![Label::new("Person")],
            props([("name", PropertyValue::from("Bob")), ("age", 25i64.into())]),
        );
        store.create_node(
            vec![Label::new("Company")],
            props([("name", "Acme")]),
        );
        store
    }

    #[test]
    fn test_no_filter_returns_everything() {
        let store = sample();
        assert_eq!(execute(&store, &NodeFilter::new()).count(), 3);
    }

    #[test]
    fn test_label_filter() {
        let store = sample();
        let people = execute(&store, &NodeFilter::new().with_labels(["Person"]));
        assert_eq!(people.len(), 2);
    }

    #[test]
    fn test_multi_label_match_is_deduplicated() {
        let store = sample();
        let results: Vec<&Node> =
            execute(&store, &NodeFilter::new().with_labels(["Person", "Employee"])).collect();

        // Alice carries both labels but appears once
        assert_eq!(results.len(), 2);
        let alice = results
            .iter()
            .filter(|n| n.get_property("name") == Some(&PropertyValue::from("Alice")))
            .count();
        assert_eq!(alice, 1);
    }

    #[test]
    fn test_property_filter_is_exact() {
        let store = sample();

        let by_age = execute(
            &store,
            &NodeFilter::new().with_properties(props([("age", PropertyValue::from(30i64))])),
        );
        assert_eq!(by_age.len(), 1);

        // Float 30.0 does not match Integer 30
        let coerced = execute(
            &store,
            &NodeFilter::new().with_properties(props([("age", PropertyValue::from(30.0))])),
        );
        assert_eq!(coerced.len(), 0);
    }

    #[test]
    fn test_limit() {
        let store = sample();
        let limited = execute(&store, &NodeFilter::new().with_labels(["Person"]).with_limit(1));
        assert_eq!(limited.len(), 1);

        let zero = execute(&store, &NodeFilter::new().with_limit(0));
        assert_eq!(zero.len(), 0);
    }

    #[test]
    fn test_unknown_label_yields_nothing() {
        let store = sample();
        assert_eq!(execute(&store, &NodeFilter::new().with_labels(["Robot"])).count(), 0);
    }
}
