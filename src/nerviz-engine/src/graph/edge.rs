// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use super::uid::{EdgeId, NodeId};

/// The nodes an edge connects.  For directed edges `source` is the tail and
/// `target` the head; otherwise the order carries no meaning.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct EdgeEnds {
    pub source: NodeId,
    pub target: NodeId,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Edge {
    id: EdgeId,
    nodes: EdgeEnds,
    is_directed: bool,
    is_faded: bool,
    label: Option<String>,
}

impl Edge {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Edge {
            id: EdgeId::fresh(),
            nodes: EdgeEnds { source, target },
            is_directed: true,
            is_faded: false,
            label: None,
        }
    }

    pub fn undirected(source: NodeId, target: NodeId) -> Self {
        Edge {
            is_directed: false,
            ..Edge::new(source, target)
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn faded(mut self) -> Self {
        self.is_faded = true;
        self
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn nodes(&self) -> EdgeEnds {
        self.nodes
    }

    pub fn source(&self) -> NodeId {
        self.nodes.source
    }

    pub fn target(&self) -> NodeId {
        self.nodes.target
    }

    pub fn is_directed(&self) -> bool {
        self.is_directed
    }

    pub fn is_faded(&self) -> bool {
        self.is_faded
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Access to the plain [`Edge`] embedded in an extended edge type.
pub trait BaseEdge {
    fn edge(&self) -> &Edge;
    fn edge_mut(&mut self) -> &mut Edge;
}

impl BaseEdge for Edge {
    fn edge(&self) -> &Edge {
        self
    }

    fn edge_mut(&mut self) -> &mut Edge {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_defaults_to_directed() {
        let (a, b) = (NodeId::fresh(), NodeId::fresh());
        let edge = Edge::new(a, b);
        assert!(edge.is_directed());
        assert!(!edge.is_faded());
        assert_eq!(edge.source(), a);
        assert_eq!(edge.target(), b);
        assert!(edge.label().is_none());
    }

    #[test]
    fn test_undirected_edge() {
        let (a, b) = (NodeId::fresh(), NodeId::fresh());
        let edge = Edge::undirected(a, b).with_label("y").faded();
        assert!(!edge.is_directed());
        assert!(edge.is_faded());
        assert_eq!(edge.label(), Some("y"));
        assert_eq!(edge.nodes(), EdgeEnds { source: a, target: b });
    }
}
