// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! JSON description of a sampling graph.
//!
//! Nodes are named by a file-local `key` that edges refer to; the graph
//! assigns its own ids on import.
//!
//! # Example
//! ```no_run
//! use nerviz_engine::json;
//!
//! let file: json::GraphFile = serde_json::from_str(r#"{"nodes": [...], "edges": [...]}"#)?;
//! let (graph, keys) = file.into_sampling_graph()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::BTreeMap;

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::common::Result;
use crate::graph::{Edge, Node, NodeId};
use crate::import_err;
use crate::sampling::{
    DEFAULT_COEFFICIENT, Distribution, DistributionType, Parameter, SamplingEdge, SamplingGraph,
    SamplingNode,
};

fn is_false(val: &bool) -> bool {
    !*val
}

fn is_true(val: &bool) -> bool {
    *val
}

fn default_true() -> bool {
    true
}

fn default_coefficient() -> f64 {
    DEFAULT_COEFFICIENT
}

fn is_default_coefficient(val: &f64) -> bool {
    *val == DEFAULT_COEFFICIENT
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct GraphFile {
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct NodeSpec {
    /// Unique within the file; edges refer to nodes by key.
    pub key: String,
    /// Display label, defaulting to the key.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub force_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub force_y: Option<f64>,
    #[serde(skip_serializing_if = "is_false", default)]
    pub faded: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub distribution: Option<DistributionSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct EdgeSpec {
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "is_true", default = "default_true")]
    pub directed: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "is_false", default)]
    pub faded: bool,
    #[serde(
        skip_serializing_if = "is_default_coefficient",
        default = "default_coefficient"
    )]
    pub coefficient: f64,
}

/// A distribution family plus any parameters that differ from its
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DistributionSpec {
    Normal {
        #[serde(skip_serializing_if = "Option::is_none", default)]
        mu: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        sigma: Option<f64>,
    },
    Exponential {
        #[serde(skip_serializing_if = "Option::is_none", default)]
        lambda: Option<f64>,
    },
    Gamma {
        #[serde(skip_serializing_if = "Option::is_none", default)]
        k: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        theta: Option<f64>,
    },
    Beta {
        #[serde(skip_serializing_if = "Option::is_none", default)]
        alpha: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        beta: Option<f64>,
    },
    Bernoulli {
        #[serde(skip_serializing_if = "Option::is_none", default)]
        p: Option<f64>,
    },
    Binomial {
        #[serde(skip_serializing_if = "Option::is_none", default)]
        n: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        p: Option<f64>,
    },
}

impl DistributionSpec {
    /// Build the distribution, validating every given parameter.
    pub fn to_distribution(&self) -> Result<Distribution> {
        use DistributionSpec as D;
        let (ty, given): (DistributionType, Vec<(Parameter, Option<f64>)>) = match *self {
            D::Normal { mu, sigma } => (
                DistributionType::Normal,
                vec![(Parameter::Mu, mu), (Parameter::Sigma, sigma)],
            ),
            D::Exponential { lambda } => {
                (DistributionType::Exponential, vec![(Parameter::Lambda, lambda)])
            }
            D::Gamma { k, theta } => (
                DistributionType::Gamma,
                vec![(Parameter::K, k), (Parameter::Theta, theta)],
            ),
            D::Beta { alpha, beta } => (
                DistributionType::Beta,
                vec![(Parameter::Alpha, alpha), (Parameter::Beta, beta)],
            ),
            D::Bernoulli { p } => (DistributionType::Bernoulli, vec![(Parameter::P, p)]),
            D::Binomial { n, p } => (
                DistributionType::Binomial,
                vec![(Parameter::N, n), (Parameter::P, p)],
            ),
        };

        let mut distribution = Distribution::with_defaults(ty);
        for (parameter, value) in given {
            if let Some(value) = value {
                distribution.set_parameter_value(parameter, value)?;
            }
        }
        Ok(distribution)
    }
}

impl From<&Distribution> for DistributionSpec {
    fn from(distribution: &Distribution) -> Self {
        match *distribution {
            Distribution::Normal { mu, sigma } => DistributionSpec::Normal {
                mu: Some(mu),
                sigma: Some(sigma),
            },
            Distribution::Exponential { lambda } => DistributionSpec::Exponential {
                lambda: Some(lambda),
            },
            Distribution::Gamma { k, theta } => DistributionSpec::Gamma {
                k: Some(k),
                theta: Some(theta),
            },
            Distribution::Beta { alpha, beta } => DistributionSpec::Beta {
                alpha: Some(alpha),
                beta: Some(beta),
            },
            Distribution::Bernoulli { p } => DistributionSpec::Bernoulli { p: Some(p) },
            Distribution::Binomial { n, p } => DistributionSpec::Binomial {
                n: Some(n),
                p: Some(p),
            },
        }
    }
}

impl GraphFile {
    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Build the graph.  Returns it with the id assigned to each key.
    pub fn into_sampling_graph(self) -> Result<(SamplingGraph, BTreeMap<String, NodeId>)> {
        let mut graph = SamplingGraph::new();
        let mut keys: BTreeMap<String, NodeId> = BTreeMap::new();

        for spec in self.nodes {
            if keys.contains_key(&spec.key) {
                return import_err!(DuplicateNodeKey, format!("node key '{}'", spec.key));
            }
            let mut base = Node::new(spec.label.unwrap_or_else(|| spec.key.clone()));
            base.set_position(spec.x, spec.y);
            base.set_force_x(spec.force_x);
            base.set_force_y(spec.force_y);
            base.set_faded(spec.faded);
            let distribution = match spec.distribution {
                Some(d) => d.to_distribution()?,
                None => Distribution::default(),
            };
            let id = graph.add_node(SamplingNode::from_node(base).with_distribution(distribution));
            keys.insert(spec.key, id);
        }

        for spec in self.edges {
            let lookup = |key: &str| match keys.get(key) {
                Some(id) => Ok(*id),
                None => import_err!(UnknownNodeKey, format!("edge refers to '{key}'")),
            };
            let (source, target) = (lookup(&spec.source)?, lookup(&spec.target)?);
            if !spec.coefficient.is_finite() {
                return import_err!(
                    BadGraphFile,
                    format!("coefficient on {} -> {}", spec.source, spec.target)
                );
            }
            let mut base = if spec.directed {
                Edge::new(source, target)
            } else {
                Edge::undirected(source, target)
            };
            if let Some(label) = spec.label {
                base = base.with_label(label);
            }
            if spec.faded {
                base = base.faded();
            }
            graph.add_edge(SamplingEdge::from_edge(base).with_coefficient(spec.coefficient))?;
        }

        Ok((graph, keys))
    }
}

/// The JSON Schema for [`GraphFile`].
#[cfg(feature = "schema")]
pub fn generate_schema() -> schemars::Schema {
    schemars::schema_for!(GraphFile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{ErrorCode, ErrorKind};

    const RAIN: &str = r#"{
        "nodes": [
            {"key": "cloudy", "label": "Cloudy", "distribution": {"type": "bernoulli", "p": 0.4}},
            {"key": "rain", "force_y": 0, "distribution": {"type": "normal", "sigma": 0.5}},
            {"key": "wet", "x": 10, "y": -5}
        ],
        "edges": [
            {"source": "cloudy", "target": "rain", "label": "causes"},
            {"source": "rain", "target": "wet", "coefficient": 1.5},
            {"source": "cloudy", "target": "wet", "directed": false, "faded": true}
        ]
    }"#;

    #[test]
    fn test_import() {
        let file = GraphFile::from_json(RAIN).unwrap();
        let (graph, keys) = file.into_sampling_graph().unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);

        let cloudy = graph.get_node(keys["cloudy"]).unwrap();
        assert_eq!(cloudy.label(), "Cloudy");
        assert_eq!(*cloudy.distribution(), Distribution::Bernoulli { p: 0.4 });

        let rain = graph.get_node(keys["rain"]).unwrap();
        assert_eq!(rain.label(), "rain");
        assert_eq!(rain.force_y(), Some(0.0));
        assert_eq!(
            *rain.distribution(),
            Distribution::Normal {
                mu: 0.0,
                sigma: 0.5
            }
        );

        let wet = graph.get_node(keys["wet"]).unwrap();
        assert_eq!((wet.x(), wet.y()), (Some(10.0), Some(-5.0)));
        assert_eq!(*wet.distribution(), Distribution::default());

        let incoming = graph.get_incoming_edges(keys["wet"]);
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].coefficient(), 1.5);

        let undirected = graph.get_undirected_edges(keys["wet"]);
        assert_eq!(undirected.len(), 1);
        assert!(undirected[0].is_faded());
        assert_eq!(undirected[0].coefficient(), DEFAULT_COEFFICIENT);

        let outgoing = graph.get_outgoing_edges(keys["cloudy"]);
        assert_eq!(outgoing[0].label(), Some("causes"));
    }

    #[test]
    fn test_duplicate_key() {
        let file = GraphFile::from_json(r#"{"nodes": [{"key": "a"}, {"key": "a"}]}"#).unwrap();
        let err = file.into_sampling_graph().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Import);
        assert_eq!(err.code, ErrorCode::DuplicateNodeKey);
    }

    #[test]
    fn test_unknown_key() {
        let file = GraphFile::from_json(
            r#"{"nodes": [{"key": "a"}], "edges": [{"source": "a", "target": "b"}]}"#,
        )
        .unwrap();
        let err = file.into_sampling_graph().unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownNodeKey);
    }

    #[test]
    fn test_bad_json() {
        let err = GraphFile::from_json(r#"{"nodes": [{"label": "no key"}]}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::BadGraphFile);

        let err = GraphFile::from_json(r#"{"nodes": [{"key": "a", "distribution": {"type": "cauchy"}}]}"#)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BadGraphFile);
    }

    #[test]
    fn test_parameter_out_of_range() {
        let file = GraphFile::from_json(
            r#"{"nodes": [{"key": "a", "distribution": {"type": "bernoulli", "p": 1.5}}]}"#,
        )
        .unwrap();
        let err = file.into_sampling_graph().unwrap_err();
        assert_eq!(err.code, ErrorCode::ParameterOutOfRange);
    }

    #[test]
    fn test_distribution_spec_roundtrip() {
        let spec = DistributionSpec::from(&Distribution::Gamma { k: 3.0, theta: 0.5 });
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, r#"{"type":"gamma","k":3.0,"theta":0.5}"#);
        let back: DistributionSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(
            back.to_distribution().unwrap(),
            Distribution::Gamma { k: 3.0, theta: 0.5 }
        );
    }

    #[test]
    fn test_serialize_skips_defaults() {
        let edge = EdgeSpec {
            source: "a".to_owned(),
            target: "b".to_owned(),
            directed: true,
            label: None,
            faded: false,
            coefficient: DEFAULT_COEFFICIENT,
        };
        assert_eq!(
            serde_json::to_string(&edge).unwrap(),
            r#"{"source":"a","target":"b"}"#
        );
    }
}
