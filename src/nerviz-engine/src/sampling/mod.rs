// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Probability distributions attached to graph nodes, and ancestor-ordered
//! joint sampling over a DAG.

pub mod distribution;
pub mod edge;
pub mod export;
pub mod graph;
pub mod node;
pub mod special;

pub use self::distribution::{Distribution, DistributionType, Parameter, ParameterInfo, ParameterKind};
pub use self::edge::{DEFAULT_COEFFICIENT, SamplingEdge};
#[cfg(feature = "file_io")]
pub use self::export::write_csv;
pub use self::export::labeled_columns;
pub use self::graph::{SamplingGraph, Samples};
pub use self::node::SamplingNode;
