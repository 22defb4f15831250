// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::ops::Deref;

use crate::graph::{BaseEdge, Edge, NodeId};

pub const DEFAULT_COEFFICIENT: f64 = 2.0;

/// An edge weighting its source's value in the target's conditional mean.
#[derive(Clone, PartialEq, Debug)]
pub struct SamplingEdge {
    base: Edge,
    coefficient: f64,
}

impl SamplingEdge {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        SamplingEdge::from_edge(Edge::new(source, target))
    }

    pub fn from_edge(base: Edge) -> Self {
        SamplingEdge {
            base,
            coefficient: DEFAULT_COEFFICIENT,
        }
    }

    pub fn with_coefficient(mut self, coefficient: f64) -> Self {
        self.coefficient = coefficient;
        self
    }

    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    pub(crate) fn set_coefficient(&mut self, coefficient: f64) {
        self.coefficient = coefficient;
    }
}

impl Deref for SamplingEdge {
    type Target = Edge;

    fn deref(&self) -> &Edge {
        &self.base
    }
}

impl BaseEdge for SamplingEdge {
    fn edge(&self) -> &Edge {
        &self.base
    }

    fn edge_mut(&mut self) -> &mut Edge {
        &mut self.base
    }
}
