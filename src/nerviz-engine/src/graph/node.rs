// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use smallvec::SmallVec;

use super::uid::{EdgeId, NodeId};

pub type EdgeList = SmallVec<[EdgeId; 4]>;

/// Edge ids touching a node, split by direction.
#[derive(Clone, Default, PartialEq, Debug)]
pub struct NodeEdges {
    pub incoming: EdgeList,
    pub outgoing: EdgeList,
    pub undirected: EdgeList,
}

/// A graph vertex.  Mutation after registration goes through [`super::Graph`]
/// so that observers are notified.
#[derive(Clone, PartialEq, Debug)]
pub struct Node {
    id: NodeId,
    label: String,
    edges: NodeEdges,
    is_highlighted: bool,
    is_faded: bool,
    force_x: Option<f64>,
    force_y: Option<f64>,
    x: Option<f64>,
    y: Option<f64>,
}

impl Node {
    pub fn new(label: impl Into<String>) -> Self {
        Node {
            id: NodeId::fresh(),
            label: label.into(),
            edges: NodeEdges::default(),
            is_highlighted: false,
            is_faded: false,
            force_x: None,
            force_y: None,
            x: None,
            y: None,
        }
    }

    /// Pull the node toward `x` during simulation.  Paired with
    /// [`Node::with_force_y`] this keeps the node in place even after a drag.
    pub fn with_force_x(mut self, x: f64) -> Self {
        self.force_x = Some(x);
        self
    }

    pub fn with_force_y(mut self, y: f64) -> Self {
        self.force_y = Some(y);
        self
    }

    /// Starting coordinates; the simulation is free to move the node away.
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn faded(mut self) -> Self {
        self.is_faded = true;
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn edges(&self) -> &NodeEdges {
        &self.edges
    }

    pub fn is_root(&self) -> bool {
        self.edges.incoming.is_empty()
    }

    pub fn is_highlighted(&self) -> bool {
        self.is_highlighted
    }

    pub fn is_faded(&self) -> bool {
        self.is_faded
    }

    pub fn force_x(&self) -> Option<f64> {
        self.force_x
    }

    pub fn force_y(&self) -> Option<f64> {
        self.force_y
    }

    pub fn x(&self) -> Option<f64> {
        self.x
    }

    pub fn y(&self) -> Option<f64> {
        self.y
    }

    pub(crate) fn add_incoming_edge(&mut self, edge: EdgeId) {
        self.edges.incoming.push(edge);
    }

    pub(crate) fn add_outgoing_edge(&mut self, edge: EdgeId) {
        self.edges.outgoing.push(edge);
    }

    pub(crate) fn add_undirected_edge(&mut self, edge: EdgeId) {
        self.edges.undirected.push(edge);
    }

    pub(crate) fn set_label(&mut self, label: String) {
        self.label = label;
    }

    pub(crate) fn set_highlighted(&mut self, to: bool) {
        self.is_highlighted = to;
    }

    pub(crate) fn set_faded(&mut self, to: bool) {
        self.is_faded = to;
    }

    pub(crate) fn set_force_x(&mut self, to: Option<f64>) {
        self.force_x = to;
    }

    pub(crate) fn set_force_y(&mut self, to: Option<f64>) {
        self.force_y = to;
    }

    pub(crate) fn set_position(&mut self, x: Option<f64>, y: Option<f64>) {
        self.x = x;
        self.y = y;
    }
}

/// Access to the plain [`Node`] embedded in an extended node type.
pub trait BaseNode {
    fn node(&self) -> &Node;
    fn node_mut(&mut self) -> &mut Node;
}

impl BaseNode for Node {
    fn node(&self) -> &Node {
        self
    }

    fn node_mut(&mut self) -> &mut Node {
        self
    }
}
