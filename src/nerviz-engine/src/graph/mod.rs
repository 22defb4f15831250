// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Directed/undirected graph with per-node adjacency bookkeeping,
//! topological ordering and mutation events.

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::fmt;
use std::mem;
use std::rc::Rc;

use log::{debug, warn};

use crate::common::Result;
use crate::graph_err;

pub mod edge;
pub mod node;
pub mod observe;
pub mod uid;

pub use self::edge::{BaseEdge, Edge, EdgeEnds};
pub use self::node::{BaseNode, EdgeList, Node, NodeEdges};
pub use self::observe::{GraphEvent, GraphView, Listener, SubscriptionId, Topic};
pub use self::uid::{EdgeId, NodeId};

use self::observe::Observers;

/// A graph over any node/edge types that embed the base [`Node`] and
/// [`Edge`].  Nodes and edges are only ever added; iteration follows
/// insertion order.
pub struct Graph<N: BaseNode = Node, E: BaseEdge = Edge> {
    nodes: BTreeMap<NodeId, N>,
    edges: BTreeMap<EdgeId, E>,
    observers: Observers,
}

impl<N: BaseNode, E: BaseEdge> Default for Graph<N, E> {
    fn default() -> Self {
        Graph {
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            observers: Observers::default(),
        }
    }
}

impl<N: BaseNode, E: BaseEdge> fmt::Debug for Graph<N, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.base_nodes())
            .field("edges", &self.base_edges())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<N: BaseNode, E: BaseEdge> Graph<N, E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph pre-seeded with nodes and edges.  Edges are added in
    /// order through [`Graph::add_edge`], so every endpoint must be among
    /// `nodes`.
    pub fn with_parts(nodes: Vec<N>, edges: Vec<E>) -> Result<Self> {
        let mut graph = Self::new();
        for node in nodes {
            graph.add_node(node);
        }
        for edge in edges {
            graph.add_edge(edge)?;
        }
        Ok(graph)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &E> {
        self.edges.values()
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn get_node(&self, id: NodeId) -> Option<&N> {
        self.nodes.get(&id)
    }

    pub fn get_edge(&self, id: EdgeId) -> Option<&E> {
        self.edges.get(&id)
    }

    pub(crate) fn get_node_mut(&mut self, id: NodeId) -> Result<&mut N> {
        match self.nodes.get_mut(&id) {
            Some(node) => Ok(node),
            None => graph_err!(NodeNotFound, format!("node {id}")),
        }
    }

    pub(crate) fn get_edge_mut(&mut self, id: EdgeId) -> Result<&mut E> {
        match self.edges.get_mut(&id) {
            Some(edge) => Ok(edge),
            None => graph_err!(EdgeNotFound, format!("edge {id}")),
        }
    }

    fn edges_from(&self, ids: Option<&EdgeList>) -> Vec<&E> {
        ids.map(|ids| ids.iter().filter_map(|id| self.edges.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn get_incoming_edges(&self, id: NodeId) -> Vec<&E> {
        self.edges_from(self.nodes.get(&id).map(|n| &n.node().edges().incoming))
    }

    pub fn get_outgoing_edges(&self, id: NodeId) -> Vec<&E> {
        self.edges_from(self.nodes.get(&id).map(|n| &n.node().edges().outgoing))
    }

    pub fn get_undirected_edges(&self, id: NodeId) -> Vec<&E> {
        self.edges_from(self.nodes.get(&id).map(|n| &n.node().edges().undirected))
    }

    pub fn get_parent_nodes(&self, id: NodeId) -> Vec<&N> {
        self.get_incoming_edges(id)
            .into_iter()
            .filter_map(|e| self.nodes.get(&e.edge().source()))
            .collect()
    }

    pub fn get_child_nodes(&self, id: NodeId) -> Vec<&N> {
        self.get_outgoing_edges(id)
            .into_iter()
            .filter_map(|e| self.nodes.get(&e.edge().target()))
            .collect()
    }

    /// Insert a node.  Re-adding a node with an id already present replaces
    /// the stored node.
    pub fn add_node(&mut self, node: N) -> NodeId {
        let id = node.node().id();
        self.nodes.insert(id, node);
        self.notify(GraphEvent::NodeAdded(id));
        id
    }

    /// Insert an edge and record it in its endpoints' adjacency lists.
    /// Fails without touching the graph if either endpoint is unknown.
    pub fn add_edge(&mut self, edge: E) -> Result<EdgeId> {
        let EdgeEnds { source, target } = edge.edge().nodes();
        if !self.nodes.contains_key(&source) {
            warn!("rejecting edge {:?}: source {source:?} not in graph", edge.edge().id());
            return graph_err!(SourceNotFound, format!("node {source}"));
        }
        if !self.nodes.contains_key(&target) {
            warn!("rejecting edge {:?}: target {target:?} not in graph", edge.edge().id());
            return graph_err!(TargetNotFound, format!("node {target}"));
        }

        let id = edge.edge().id();
        let is_directed = edge.edge().is_directed();
        self.edges.insert(id, edge);

        if is_directed {
            self.get_node_mut(source)?.node_mut().add_outgoing_edge(id);
            self.get_node_mut(target)?.node_mut().add_incoming_edge(id);
        } else {
            self.get_node_mut(source)?.node_mut().add_undirected_edge(id);
            self.get_node_mut(target)?.node_mut().add_undirected_edge(id);
        }

        self.notify(GraphEvent::EdgeAdded(id));
        Ok(id)
    }

    /// Topological order of all node ids (Kahn's algorithm).  Undirected
    /// edges impose no ordering.  Fails with `CircularDependency` if any
    /// directed edge is left unprocessed.
    pub fn get_sorted_nodes(&self) -> Result<Vec<NodeId>> {
        let mut queue: VecDeque<NodeId> = self
            .nodes
            .values()
            .map(|n| n.node())
            .filter(|n| n.is_root())
            .map(|n| n.id())
            .collect();
        let mut removed: HashSet<EdgeId> = HashSet::new();
        let mut sorted = Vec::with_capacity(self.nodes.len());

        while let Some(id) = queue.pop_front() {
            sorted.push(id);
            let Some(current) = self.nodes.get(&id) else {
                continue;
            };
            for edge_id in current.node().edges().outgoing.iter() {
                let Some(edge) = self.edges.get(edge_id) else {
                    continue;
                };
                removed.insert(*edge_id);
                let Some(child) = self.nodes.get(&edge.edge().target()) else {
                    continue;
                };
                let remaining = child
                    .node()
                    .edges()
                    .incoming
                    .iter()
                    .filter(|e| !removed.contains(e))
                    .count();
                if remaining == 0 {
                    queue.push_back(child.node().id());
                }
            }
        }

        let directed = self.edges.values().filter(|e| e.edge().is_directed()).count();
        if directed != removed.len() {
            warn!(
                "cycle detected: {} of {directed} directed edges unprocessed",
                directed - removed.len()
            );
            return graph_err!(
                CircularDependency,
                format!("{} edges form a cycle", directed - removed.len())
            );
        }

        Ok(sorted)
    }

    pub fn set_label(&mut self, id: NodeId, label: impl Into<String>) -> Result<()> {
        let label = label.into();
        let node = self.get_node_mut(id)?.node_mut();
        if node.label() == label {
            return Ok(());
        }
        node.set_label(label);
        self.notify(GraphEvent::LabelChanged(id));
        Ok(())
    }

    pub fn set_highlighted(&mut self, id: NodeId, highlighted: bool) -> Result<()> {
        let node = self.get_node_mut(id)?.node_mut();
        if node.is_highlighted() == highlighted {
            return Ok(());
        }
        node.set_highlighted(highlighted);
        self.notify(GraphEvent::HighlightChanged {
            node: id,
            highlighted,
        });
        Ok(())
    }

    pub fn set_faded(&mut self, id: NodeId, faded: bool) -> Result<()> {
        let node = self.get_node_mut(id)?.node_mut();
        if node.is_faded() == faded {
            return Ok(());
        }
        node.set_faded(faded);
        self.notify(GraphEvent::FadedChanged(id));
        Ok(())
    }

    pub fn set_force_x(&mut self, id: NodeId, x: Option<f64>) -> Result<()> {
        let node = self.get_node_mut(id)?.node_mut();
        if node.force_x() == x {
            return Ok(());
        }
        node.set_force_x(x);
        self.notify(GraphEvent::PinChanged(id));
        Ok(())
    }

    pub fn set_force_y(&mut self, id: NodeId, y: Option<f64>) -> Result<()> {
        let node = self.get_node_mut(id)?.node_mut();
        if node.force_y() == y {
            return Ok(());
        }
        node.set_force_y(y);
        self.notify(GraphEvent::PinChanged(id));
        Ok(())
    }

    pub fn set_position(&mut self, id: NodeId, x: Option<f64>, y: Option<f64>) -> Result<()> {
        let node = self.get_node_mut(id)?.node_mut();
        if node.x() == x && node.y() == y {
            return Ok(());
        }
        node.set_position(x, y);
        self.notify(GraphEvent::PositionChanged(id));
        Ok(())
    }

    /// Register `listener` for events on `topic`.  Listeners run after the
    /// mutation is complete, in subscription order.
    pub fn subscribe(
        &mut self,
        topic: Topic,
        listener: impl FnMut(&GraphEvent, &dyn GraphView) + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(topic, Box::new(listener))
    }

    /// Like [`Graph::subscribe`], but bound to `owner`: the listener sees
    /// the owner while it lives, and is dropped once the last `Rc` to it
    /// goes away, even without [`Graph::unsubscribe`].
    pub fn subscribe_weak<T: 'static>(
        &mut self,
        topic: Topic,
        owner: &Rc<T>,
        mut listener: impl FnMut(&T, &GraphEvent, &dyn GraphView) + 'static,
    ) -> SubscriptionId {
        let weak = Rc::downgrade(owner);
        let alive = weak.clone();
        self.observers.subscribe_while(
            topic,
            Box::new(move |event, view| {
                if let Some(owner) = weak.upgrade() {
                    listener(&owner, event, view);
                }
            }),
            Box::new(move || alive.strong_count() > 0),
        )
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }

    pub(crate) fn notify(&mut self, event: GraphEvent) {
        if self.observers.len() == 0 {
            return;
        }
        debug!("graph event {event:?}");
        let mut observers = mem::take(&mut self.observers);
        observers.notify(&event, self);
        self.observers = observers;
    }

    /// Plain-language summary of the graph, suitable as an accessible title.
    pub fn describe(&self) -> String {
        describe(self)
    }
}

impl<N: BaseNode, E: BaseEdge> GraphView for Graph<N, E> {
    fn base_nodes(&self) -> Vec<&Node> {
        self.nodes.values().map(|n| n.node()).collect()
    }

    fn base_edges(&self) -> Vec<&Edge> {
        self.edges.values().map(|e| e.edge()).collect()
    }

    fn base_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id).map(|n| n.node())
    }
}

fn join_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [one] => one.clone(),
        [a, b] => format!("{a} and {b}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    }
}

pub(crate) fn describe(view: &dyn GraphView) -> String {
    let nodes = view.base_nodes();
    let edges = view.base_edges();
    let labels: Vec<String> = nodes.iter().map(|n| n.label().to_owned()).collect();
    let noun = if nodes.len() == 1 { "node" } else { "nodes" };
    let mut title = format!(
        "A graphical structure consisting of {} {noun}: {}.",
        nodes.len(),
        join_list(&labels)
    );
    if !edges.is_empty() {
        let label_of = |id| view.base_node(id).map(|n| n.label()).unwrap_or("?");
        let pairs: Vec<String> = edges
            .iter()
            .map(|e| format!("from {} to {}", label_of(e.source()), label_of(e.target())))
            .collect();
        title.push_str(&format!(" There are directed edges {}.", join_list(&pairs)));
    }
    title
}
