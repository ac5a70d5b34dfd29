//! Graph lifecycle events
//!
//! Emitted by the engine after a mutation has been persisted. Consumers
//! (UI, CLI layers) register through [`EventNotifier::subscribe`] and own the
//! receiving half of the channel.

use super::edge::Edge;
use super::node::Node;
use super::types::{EdgeId, NodeId};
use serde::Serialize;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum GraphEvent {
    Initialized { node_count: usize, edge_count: usize },
    NodeCreated { node: Node },
    NodeUpdated { node: Node },
    NodeDeleted { id: NodeId },
    EdgeCreated { edge: Edge },
    EdgeDeleted { id: EdgeId },
    GraphCleared,
    GraphImported { node_count: usize, edge_count: usize },
}

impl GraphEvent {
    /// Wire name of the event, e.g. `node-created`
    pub fn name(&self) -> &'static str {
        match self {
            GraphEvent::Initialized { .. } => "initialized",
            GraphEvent::NodeCreated { .. } => "node-created",
            GraphEvent::NodeUpdated { .. } => "node-updated",
            GraphEvent::NodeDeleted { .. } => "node-deleted",
            GraphEvent::EdgeCreated { .. } => "edge-created",
            GraphEvent::EdgeDeleted { .. } => "edge-deleted",
            GraphEvent::GraphCleared => "graph-cleared",
            GraphEvent::GraphImported { .. } => "graph-imported",
        }
    }
}

/// Fan-out of [`GraphEvent`]s to every live subscriber
#[derive(Debug, Default)]
pub struct EventNotifier {
    subscribers: Vec<UnboundedSender<GraphEvent>>,
}

impl EventNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber. Events emitted before this call are not replayed.
    pub fn subscribe(&mut self) -> UnboundedReceiver<GraphEvent> {
        let (tx, rx) = unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver `event` to every subscriber, dropping those whose receiver is gone
    pub fn emit(&mut self, event: GraphEvent) {
        debug!("Emitting {} to {} subscribers", event.name(), self.subscribers.len());
        self.subscribers
            .retain(|sender| sender.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Drop every sender, which ends each subscriber's stream
    pub fn close(&mut self) {
        self.subscribers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(GraphEvent::GraphCleared.name(), "graph-cleared");
        assert_eq!(
            GraphEvent::NodeDeleted { id: NodeId::new("n") }.name(),
            "node-deleted"
        );
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let json = serde_json::to_value(GraphEvent::EdgeDeleted { id: EdgeId::new("e1") }).unwrap();
        assert_eq!(json["event"], "edge-deleted");
        assert_eq!(json["id"], "e1");
    }

    #[test]
    fn test_fan_out_and_pruning() {
        let mut notifier = EventNotifier::new();
        let mut first = notifier.subscribe();
        let second = notifier.subscribe();
        assert_eq!(notifier.subscriber_count(), 2);

        drop(second);
        notifier.emit(GraphEvent::GraphCleared);

        assert_eq!(notifier.subscriber_count(), 1);
        assert_eq!(first.try_recv().unwrap(), GraphEvent::GraphCleared);
    }

    #[test]
    fn test_close_ends_streams() {
        let mut notifier = EventNotifier::new();
        let mut rx = notifier.subscribe();
        notifier.close();
        assert!(rx.try_recv().is_err());
        assert_eq!(notifier.subscriber_count(), 0);
    }
}
