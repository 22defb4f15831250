// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Mutable working copies of graph nodes and edges carrying simulation
//! state.  Edges refer to their endpoints by index into the node list.

use std::collections::BTreeMap;

use crate::graph::{EdgeId, GraphView, Node, NodeId};

#[derive(Clone, PartialEq, Debug)]
pub struct SimNode {
    pub id: NodeId,
    pub label: String,
    pub is_faded: bool,
    pub force_x: Option<f64>,
    pub force_y: Option<f64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub vx: f64,
    pub vy: f64,
    /// Fixed position while dragged.
    pub fx: Option<f64>,
    pub fy: Option<f64>,
}

impl SimNode {
    pub fn from_node(node: &Node) -> Self {
        SimNode {
            id: node.id(),
            label: node.label().to_owned(),
            is_faded: node.is_faded(),
            force_x: node.force_x(),
            force_y: node.force_y(),
            x: node.x(),
            y: node.y(),
            vx: 0.0,
            vy: 0.0,
            fx: None,
            fy: None,
        }
    }

    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.x?, self.y?))
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct SimEdge {
    pub id: EdgeId,
    pub source: usize,
    pub target: usize,
    pub is_directed: bool,
    pub is_faded: bool,
    pub label: Option<String>,
}

pub fn snapshot_nodes(view: &dyn GraphView) -> Vec<SimNode> {
    view.base_nodes().into_iter().map(SimNode::from_node).collect()
}

/// Edges whose endpoints are both among `nodes`, resolved to indices.
pub fn snapshot_edges(view: &dyn GraphView, nodes: &[SimNode]) -> Vec<SimEdge> {
    let index: BTreeMap<NodeId, usize> = nodes.iter().enumerate().map(|(i, n)| (n.id, i)).collect();
    view.base_edges()
        .into_iter()
        .filter_map(|edge| {
            Some(SimEdge {
                id: edge.id(),
                source: *index.get(&edge.source())?,
                target: *index.get(&edge.target())?,
                is_directed: edge.is_directed(),
                is_faded: edge.is_faded(),
                label: edge.label().map(str::to_owned),
            })
        })
        .collect()
}

/// Combine a fresh snapshot with the previous one.  Nodes present in both
/// keep their simulated position, velocity and drag fix from `previous`
/// and take everything else (label, faded flag, pinned axes) from `fresh`.
/// Nodes new in `fresh` keep whatever starting coordinates the model gave
/// them.  Order follows `fresh`; nodes only in `previous` are dropped.
pub fn merge_nodes(previous: &[SimNode], fresh: Vec<SimNode>) -> Vec<SimNode> {
    let previous: BTreeMap<NodeId, &SimNode> = previous.iter().map(|n| (n.id, n)).collect();
    fresh
        .into_iter()
        .map(|node| match previous.get(&node.id) {
            Some(old) => SimNode {
                x: old.x,
                y: old.y,
                vx: old.vx,
                vy: old.vy,
                fx: old.fx,
                fy: old.fy,
                ..node
            },
            None => node,
        })
        .collect()
}
