// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::ops::Deref;

use crate::graph::{BaseNode, Node};
use crate::sampling::distribution::{Distribution, DistributionType};

/// A node carrying the distribution its values are drawn from.
#[derive(Clone, PartialEq, Debug)]
pub struct SamplingNode {
    base: Node,
    distribution: Distribution,
}

impl SamplingNode {
    pub fn new(label: impl Into<String>) -> Self {
        SamplingNode::from_node(Node::new(label))
    }

    pub fn from_node(base: Node) -> Self {
        SamplingNode {
            base,
            distribution: Distribution::default(),
        }
    }

    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = distribution;
        self
    }

    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    pub(crate) fn distribution_mut(&mut self) -> &mut Distribution {
        &mut self.distribution
    }

    /// Swap to another distribution family, discarding the current
    /// parameters in favour of the family's defaults.
    pub(crate) fn set_distribution(&mut self, ty: DistributionType) {
        self.distribution = Distribution::with_defaults(ty);
    }

    pub(crate) fn replace_distribution(&mut self, distribution: Distribution) {
        self.distribution = distribution;
    }
}

impl Deref for SamplingNode {
    type Target = Node;

    fn deref(&self) -> &Node {
        &self.base
    }
}

impl BaseNode for SamplingNode {
    fn node(&self) -> &Node {
        &self.base
    }

    fn node_mut(&mut self) -> &mut Node {
        &mut self.base
    }
}
