// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::BTreeMap;

use log::debug;
use rand::Rng;

use crate::common::Result;
use crate::graph::{EdgeId, Graph, GraphEvent, NodeId};
use crate::sampling::distribution::{Distribution, DistributionType, Parameter};
use crate::sampling::edge::SamplingEdge;
use crate::sampling::node::SamplingNode;
use crate::{graph_err, sampling_err};

pub type SamplingGraph = Graph<SamplingNode, SamplingEdge>;

/// Joint draws for every node: `count` values per node, where index `i`
/// across all nodes forms one joint sample.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Samples {
    count: usize,
    values: BTreeMap<NodeId, Vec<f64>>,
}

impl Samples {
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn get(&self, id: NodeId) -> Option<&[f64]> {
        self.values.get(&id).map(Vec::as_slice)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.values.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &[f64])> {
        self.values.iter().map(|(id, v)| (*id, v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0 || self.values.is_empty()
    }
}

impl Graph<SamplingNode, SamplingEdge> {
    /// Draw `count` joint samples in topological order.  Roots sample their
    /// own distribution; every other node sets its location parameter to
    /// the coefficient-weighted sum of its parents' values in the same slot
    /// and draws once per slot.
    pub fn sample<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Result<Samples> {
        let order = self.get_sorted_nodes()?;
        let mut values: BTreeMap<NodeId, Vec<f64>> = BTreeMap::new();

        for id in order {
            let Some(node) = self.get_node(id) else {
                return graph_err!(NodeNotFound, format!("node {id}"));
            };

            if node.is_root() {
                values.insert(id, node.distribution().sample(rng, count)?);
                continue;
            }

            let mut distribution = *node.distribution();
            if distribution.location_parameter().is_none() {
                return sampling_err!(
                    MissingLocationParameter,
                    format!(
                        "'{}' has parents but its {} distribution has no location parameter",
                        node.label(),
                        distribution.distribution_type()
                    )
                );
            }

            let mut parents: Vec<(&[f64], f64)> = Vec::new();
            for edge in self.get_incoming_edges(id) {
                let Some(parent) = values.get(&edge.source()) else {
                    return graph_err!(NodeNotFound, format!("node {}", edge.source()));
                };
                parents.push((parent.as_slice(), edge.coefficient()));
            }

            let mut drawn = Vec::with_capacity(count);
            for slot in 0..count {
                let location: f64 = parents
                    .iter()
                    .map(|(parent, coefficient)| parent[slot] * coefficient)
                    .sum();
                distribution.set_location(location)?;
                drawn.extend(distribution.sample(rng, 1)?);
            }
            values.insert(id, drawn);
        }

        debug!("drew {count} samples for {} nodes", values.len());
        Ok(Samples { count, values })
    }

    /// Switch a node to another distribution family with default parameters.
    pub fn set_distribution(&mut self, id: NodeId, ty: DistributionType) -> Result<()> {
        self.get_node_mut(id)?.set_distribution(ty);
        self.notify(GraphEvent::DistributionChanged(id));
        Ok(())
    }

    pub fn replace_distribution(&mut self, id: NodeId, distribution: Distribution) -> Result<()> {
        self.get_node_mut(id)?.replace_distribution(distribution);
        self.notify(GraphEvent::DistributionChanged(id));
        Ok(())
    }

    pub fn set_parameter_value(&mut self, id: NodeId, parameter: Parameter, value: f64) -> Result<()> {
        self.get_node_mut(id)?
            .distribution_mut()
            .set_parameter_value(parameter, value)?;
        self.notify(GraphEvent::DistributionChanged(id));
        Ok(())
    }

    pub fn set_coefficient(&mut self, id: EdgeId, coefficient: f64) -> Result<()> {
        if !coefficient.is_finite() {
            return sampling_err!(ParameterOutOfRange, format!("coefficient = {coefficient}"));
        }
        self.get_edge_mut(id)?.set_coefficient(coefficient);
        self.notify(GraphEvent::CoefficientChanged(id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::common::ErrorCode;
    use crate::graph::Topic;

    fn mean(values: &[f64]) -> f64 {
        values.iter().sum::<f64>() / values.len() as f64
    }

    #[test]
    fn test_roots_sample_own_distribution() {
        let mut graph = SamplingGraph::new();
        let a = graph.add_node(
            SamplingNode::new("A").with_distribution(Distribution::Normal { mu: 5.0, sigma: 1.0 }),
        );
        let b = graph.add_node(
            SamplingNode::new("B").with_distribution(Distribution::Bernoulli { p: 0.8 }),
        );

        let mut rng = StdRng::seed_from_u64(11);
        let samples = graph.sample(5_000, &mut rng).unwrap();
        assert_eq!(samples.count(), 5_000);
        assert_eq!(samples.get(a).unwrap().len(), 5_000);
        assert!((mean(samples.get(a).unwrap()) - 5.0).abs() < 0.1);
        assert!((mean(samples.get(b).unwrap()) - 0.8).abs() < 0.05);
    }

    #[test]
    fn test_child_tracks_weighted_parent() {
        let mut graph = SamplingGraph::new();
        let parent = graph.add_node(
            SamplingNode::new("P").with_distribution(Distribution::Exponential { lambda: 0.5 }),
        );
        let child = graph.add_node(
            SamplingNode::new("C").with_distribution(Distribution::Normal {
                mu: 0.0,
                sigma: 0.01,
            }),
        );
        graph
            .add_edge(SamplingEdge::new(parent, child).with_coefficient(3.0))
            .unwrap();

        let mut rng = StdRng::seed_from_u64(5);
        let samples = graph.sample(200, &mut rng).unwrap();
        let parents = samples.get(parent).unwrap();
        let children = samples.get(child).unwrap();
        for (p, c) in parents.iter().zip(children) {
            assert!((c - 3.0 * p).abs() < 0.1, "child {c} vs parent {p}");
        }
        // the node's own distribution is left as configured
        assert_eq!(graph.get_node(child).unwrap().distribution().location(), Some(0.0));
    }

    #[test]
    fn test_child_without_location_fails() {
        let mut graph = SamplingGraph::new();
        let a = graph.add_node(SamplingNode::new("A"));
        let b = graph.add_node(
            SamplingNode::new("B").with_distribution(Distribution::Bernoulli { p: 0.5 }),
        );
        graph.add_edge(SamplingEdge::new(a, b)).unwrap();

        let mut rng = StdRng::seed_from_u64(1);
        let err = graph.sample(10, &mut rng).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingLocationParameter);
    }

    #[test]
    fn test_cycle_fails() {
        let mut graph = SamplingGraph::new();
        let a = graph.add_node(SamplingNode::new("A"));
        let b = graph.add_node(SamplingNode::new("B"));
        graph.add_edge(SamplingEdge::new(a, b)).unwrap();
        graph.add_edge(SamplingEdge::new(b, a)).unwrap();

        let mut rng = StdRng::seed_from_u64(1);
        let err = graph.sample(10, &mut rng).unwrap_err();
        assert_eq!(err.code, ErrorCode::CircularDependency);
    }

    #[test]
    fn test_parameter_mutations_notify() {
        let mut graph = SamplingGraph::new();
        let a = graph.add_node(SamplingNode::new("A"));
        let b = graph.add_node(SamplingNode::new("B"));
        let edge = graph.add_edge(SamplingEdge::new(a, b)).unwrap();

        let events = Rc::new(RefCell::new(Vec::new()));
        let log = events.clone();
        graph.subscribe(Topic::Parameters, move |event, _| {
            log.borrow_mut().push(event.clone());
        });

        graph.set_distribution(a, DistributionType::Gamma).unwrap();
        graph.set_parameter_value(a, Parameter::Theta, 2.0).unwrap();
        graph.set_coefficient(edge, 0.5).unwrap();
        assert!(graph.set_parameter_value(a, Parameter::Mu, 1.0).is_err());
        assert!(graph.set_coefficient(edge, f64::INFINITY).is_err());

        assert_eq!(
            *events.borrow(),
            vec![
                GraphEvent::DistributionChanged(a),
                GraphEvent::DistributionChanged(a),
                GraphEvent::CoefficientChanged(edge),
            ]
        );
        assert_eq!(
            *graph.get_node(a).unwrap().distribution(),
            Distribution::Gamma { k: 2.0, theta: 2.0 }
        );
        assert_eq!(graph.get_edge(edge).unwrap().coefficient(), 0.5);
    }
}
