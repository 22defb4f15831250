// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Explicit publish/subscribe for graph mutations.
//!
//! Every mutator on [`super::Graph`] emits a [`GraphEvent`] once the change
//! is complete.  Listeners subscribe to a [`Topic`] and are called in
//! subscription order with the event and a read-only [`GraphView`] of the
//! graph as it stands after the mutation.

use log::debug;

use super::edge::Edge;
use super::node::Node;
use super::uid::{EdgeId, NodeId};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Topic {
    /// The node or edge list changed, or a node attribute that feeds layout
    /// (label, pinned axes, faded flag).
    Structure,
    /// A node's highlight flag changed.
    Highlight,
    /// A node's starting coordinates changed.
    Position,
    /// A sampling distribution or edge coefficient changed.
    Parameters,
}

#[derive(Clone, PartialEq, Debug)]
pub enum GraphEvent {
    NodeAdded(NodeId),
    EdgeAdded(EdgeId),
    LabelChanged(NodeId),
    PinChanged(NodeId),
    FadedChanged(NodeId),
    HighlightChanged { node: NodeId, highlighted: bool },
    PositionChanged(NodeId),
    DistributionChanged(NodeId),
    CoefficientChanged(EdgeId),
}

impl GraphEvent {
    pub fn topic(&self) -> Topic {
        match self {
            GraphEvent::NodeAdded(_)
            | GraphEvent::EdgeAdded(_)
            | GraphEvent::LabelChanged(_)
            | GraphEvent::PinChanged(_)
            | GraphEvent::FadedChanged(_) => Topic::Structure,
            GraphEvent::HighlightChanged { .. } => Topic::Highlight,
            GraphEvent::PositionChanged(_) => Topic::Position,
            GraphEvent::DistributionChanged(_) | GraphEvent::CoefficientChanged(_) => {
                Topic::Parameters
            }
        }
    }
}

/// Read-only access to the base node/edge data of any graph, independent of
/// its concrete node and edge types.
pub trait GraphView {
    fn base_nodes(&self) -> Vec<&Node>;
    fn base_edges(&self) -> Vec<&Edge>;
    fn base_node(&self, id: NodeId) -> Option<&Node>;
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct SubscriptionId(u64);

pub type Listener = Box<dyn FnMut(&GraphEvent, &dyn GraphView)>;

/// Reports whether the owner of a subscription still exists.
pub(crate) type Liveness = Box<dyn Fn() -> bool>;

struct Subscription {
    id: SubscriptionId,
    topic: Topic,
    listener: Listener,
    alive: Option<Liveness>,
}

impl Subscription {
    fn is_alive(&self) -> bool {
        self.alive.as_ref().is_none_or(|alive| alive())
    }
}

#[derive(Default)]
pub(crate) struct Observers {
    next: u64,
    subscriptions: Vec<Subscription>,
}

impl Observers {
    pub(crate) fn subscribe(&mut self, topic: Topic, listener: Listener) -> SubscriptionId {
        self.insert(topic, listener, None)
    }

    /// Subscribe until `alive` reports false; the entry is then pruned on
    /// the next subscribe or notify.
    pub(crate) fn subscribe_while(
        &mut self,
        topic: Topic,
        listener: Listener,
        alive: Liveness,
    ) -> SubscriptionId {
        self.insert(topic, listener, Some(alive))
    }

    fn insert(&mut self, topic: Topic, listener: Listener, alive: Option<Liveness>) -> SubscriptionId {
        self.prune();
        self.next += 1;
        let id = SubscriptionId(self.next);
        self.subscriptions.push(Subscription {
            id,
            topic,
            listener,
            alive,
        });
        id
    }

    fn prune(&mut self) {
        let before = self.subscriptions.len();
        self.subscriptions.retain(Subscription::is_alive);
        let dropped = before - self.subscriptions.len();
        if dropped > 0 {
            debug!("pruned {dropped} subscriptions whose owner is gone");
        }
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Live subscriptions only.
    pub(crate) fn len(&self) -> usize {
        self.subscriptions.iter().filter(|s| s.is_alive()).count()
    }

    pub(crate) fn notify(&mut self, event: &GraphEvent, view: &dyn GraphView) {
        self.prune();
        let topic = event.topic();
        for subscription in self
            .subscriptions
            .iter_mut()
            .filter(|s| s.topic == topic)
        {
            (subscription.listener)(event, view);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;

    struct EmptyView;

    impl GraphView for EmptyView {
        fn base_nodes(&self) -> Vec<&Node> {
            vec![]
        }
        fn base_edges(&self) -> Vec<&Edge> {
            vec![]
        }
        fn base_node(&self, _id: NodeId) -> Option<&Node> {
            None
        }
    }

    #[test]
    fn test_event_topics() {
        let node = NodeId::fresh();
        assert_eq!(GraphEvent::NodeAdded(node).topic(), Topic::Structure);
        assert_eq!(GraphEvent::PinChanged(node).topic(), Topic::Structure);
        assert_eq!(
            GraphEvent::HighlightChanged {
                node,
                highlighted: true
            }
            .topic(),
            Topic::Highlight
        );
        assert_eq!(
            GraphEvent::CoefficientChanged(EdgeId::fresh()).topic(),
            Topic::Parameters
        );
    }

    #[test]
    fn test_notify_in_subscription_order_and_by_topic() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut observers = Observers::default();

        let first = log.clone();
        observers.subscribe(
            Topic::Structure,
            Box::new(move |_, _| first.borrow_mut().push("first")),
        );
        let highlight = log.clone();
        observers.subscribe(
            Topic::Highlight,
            Box::new(move |_, _| highlight.borrow_mut().push("highlight")),
        );
        let second = log.clone();
        observers.subscribe(
            Topic::Structure,
            Box::new(move |_, _| second.borrow_mut().push("second")),
        );

        observers.notify(&GraphEvent::NodeAdded(NodeId::fresh()), &EmptyView);
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut observers = Observers::default();
        let counter = count.clone();
        let id = observers.subscribe(
            Topic::Structure,
            Box::new(move |_, _| *counter.borrow_mut() += 1),
        );
        observers.notify(&GraphEvent::NodeAdded(NodeId::fresh()), &EmptyView);
        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
        observers.notify(&GraphEvent::NodeAdded(NodeId::fresh()), &EmptyView);
        assert_eq!(*count.borrow(), 1);
        assert_eq!(observers.len(), 0);
    }

    #[test]
    fn test_subscription_ends_with_owner() {
        let owner = Rc::new(Cell::new(0));
        let mut observers = Observers::default();
        let weak = Rc::downgrade(&owner);
        let alive = weak.clone();
        observers.subscribe_while(
            Topic::Structure,
            Box::new(move |_, _| {
                if let Some(owner) = weak.upgrade() {
                    owner.set(owner.get() + 1);
                }
            }),
            Box::new(move || alive.strong_count() > 0),
        );
        observers.subscribe(Topic::Structure, Box::new(|_, _| {}));

        observers.notify(&GraphEvent::NodeAdded(NodeId::fresh()), &EmptyView);
        assert_eq!(owner.get(), 1);
        assert_eq!(observers.len(), 2);

        drop(owner);
        assert_eq!(observers.len(), 1);
        observers.notify(&GraphEvent::NodeAdded(NodeId::fresh()), &EmptyView);
        assert_eq!(observers.subscriptions.len(), 1);
    }
}
