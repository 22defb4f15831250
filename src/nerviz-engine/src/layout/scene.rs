// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The retained drawing: one element per node and edge, bound to data by
//! id so that updates touch existing elements instead of rebuilding them.

use std::collections::BTreeMap;

use crate::graph::{EdgeId, NodeId};
use crate::layout::config::ForceConfig;
use crate::layout::geometry::{Point, Segment, Stadium, clip_edge};
use crate::layout::snapshot::{SimEdge, SimNode};

/// How many elements a join created, kept and removed.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct JoinCounts {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}

/// Rebind `elements` to `data` by key.  Elements whose key reappears are
/// passed to `update`; data with no element go through `enter`; leftover
/// elements are dropped.  Afterwards `elements` is in data order.  A key
/// repeated in `data` binds the existing element only once.
pub fn keyed_join<T, D, K: Ord>(
    elements: &mut Vec<T>,
    data: &[D],
    element_key: impl Fn(&T) -> K,
    datum_key: impl Fn(&D) -> K,
    mut enter: impl FnMut(&D) -> T,
    mut update: impl FnMut(&mut T, &D),
) -> JoinCounts {
    let mut existing: BTreeMap<K, T> = BTreeMap::new();
    for element in elements.drain(..) {
        let key = element_key(&element);
        existing.entry(key).or_insert(element);
    }

    let mut counts = JoinCounts::default();
    for datum in data {
        match existing.remove(&datum_key(datum)) {
            Some(mut element) => {
                update(&mut element, datum);
                counts.updated += 1;
                elements.push(element);
            }
            None => {
                elements.push(enter(datum));
                counts.entered += 1;
            }
        }
    }
    counts.exited = existing.len();
    counts
}

#[derive(Clone, PartialEq, Debug)]
pub struct SceneNode {
    pub id: NodeId,
    pub label: String,
    pub is_faded: bool,
    pub is_highlighted: bool,
    pub width: f64,
    pub height: f64,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl SceneNode {
    fn enter(node: &SimNode, config: &ForceConfig) -> Self {
        SceneNode {
            id: node.id,
            label: node.label.clone(),
            is_faded: node.is_faded,
            is_highlighted: false,
            width: config.node_box_width(&node.label),
            height: config.node_height,
            x: node.x,
            y: node.y,
        }
    }

    fn update(&mut self, node: &SimNode, config: &ForceConfig) {
        self.label = node.label.clone();
        self.is_faded = node.is_faded;
        self.width = config.node_box_width(&node.label);
        self.height = config.node_height;
    }

    fn outline(&self) -> Option<Stadium> {
        Some(Stadium::boundary(
            Point::new(self.x?, self.y?),
            self.width,
            self.height,
        ))
    }

    /// Whether `p` falls on the drawn node box.
    pub fn hit(&self, p: Point) -> bool {
        match (self.x, self.y) {
            (Some(x), Some(y)) => {
                Stadium::from_box(Point::new(x, y), self.width, self.height).contains(p)
            }
            _ => false,
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct SceneEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub is_directed: bool,
    pub is_faded: bool,
    pub label: Option<String>,
    /// Clipped line; `None` until both endpoints have positions, or while
    /// their outlines overlap.
    pub segment: Option<Segment>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub title: String,
    pub marker_id: String,
    pub nodes: Vec<SceneNode>,
    pub edges: Vec<SceneEdge>,
}

impl Scene {
    pub fn new(width: f64, height: f64, title: String, marker_id: String) -> Self {
        Scene {
            width,
            height,
            title,
            marker_id,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// `[min-x, min-y, width, height]` centering the origin on the canvas.
    pub fn view_box(&self) -> [f64; 4] {
        [-self.width / 2.0, -self.height / 2.0, self.width, self.height]
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn join_nodes(&mut self, nodes: &[SimNode], config: &ForceConfig) -> JoinCounts {
        keyed_join(
            &mut self.nodes,
            nodes,
            |element| element.id,
            |node| node.id,
            |node| SceneNode::enter(node, config),
            |element, node| element.update(node, config),
        )
    }

    pub fn join_edges(&mut self, edges: &[SimEdge], nodes: &[SimNode]) -> JoinCounts {
        let counts = keyed_join(
            &mut self.edges,
            edges,
            |element| element.id,
            |edge| edge.id,
            |edge| SceneEdge {
                id: edge.id,
                source: nodes[edge.source].id,
                target: nodes[edge.target].id,
                is_directed: edge.is_directed,
                is_faded: edge.is_faded,
                label: edge.label.clone(),
                segment: None,
            },
            |element, edge| {
                element.is_directed = edge.is_directed;
                element.is_faded = edge.is_faded;
                element.label = edge.label.clone();
            },
        );
        self.clip_edges();
        counts
    }

    pub fn set_highlighted(&mut self, id: NodeId, highlighted: bool) {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
            node.is_highlighted = highlighted;
        }
    }

    /// Copy simulated positions onto the drawn nodes and re-clip every edge.
    pub fn sync_positions(&mut self, nodes: &[SimNode]) {
        let positions: BTreeMap<NodeId, (Option<f64>, Option<f64>)> =
            nodes.iter().map(|n| (n.id, (n.x, n.y))).collect();
        for element in self.nodes.iter_mut() {
            if let Some(&(x, y)) = positions.get(&element.id) {
                element.x = x;
                element.y = y;
            }
        }
        self.clip_edges();
    }

    fn clip_edges(&mut self) {
        let outlines: BTreeMap<NodeId, Option<Stadium>> =
            self.nodes.iter().map(|n| (n.id, n.outline())).collect();
        for edge in self.edges.iter_mut() {
            let source = outlines.get(&edge.source).copied().flatten();
            let target = outlines.get(&edge.target).copied().flatten();
            // keep the previous line when no clip is possible
            if let (Some(source), Some(target)) = (source, target)
                && let Some(segment) = clip_edge(&source, &target)
            {
                edge.segment = Some(segment);
            }
        }
    }

    /// Topmost node whose box contains `p`.
    pub fn node_at(&self, p: Point) -> Option<NodeId> {
        self.nodes.iter().rev().find(|n| n.hit(p)).map(|n| n.id)
    }
}
