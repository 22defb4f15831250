// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

#![forbid(unsafe_code)]

pub mod common;
pub mod graph;
pub mod json;
pub mod layout;
pub mod pair_grid;
#[cfg(feature = "png_render")]
pub mod render_png;
pub mod sampling;
mod svg;

pub use self::common::{Error, ErrorCode, ErrorKind, Result};
pub use self::graph::{
    BaseEdge, BaseNode, Edge, EdgeId, Graph, GraphEvent, GraphView, Node, NodeId, SubscriptionId,
    Topic,
};
pub use self::json::GraphFile;
pub use self::layout::{ForceConfig, ForceGraph, NodeEventListener, render_static};
pub use self::pair_grid::{PairGrid, PairGridConfig};
pub use self::sampling::{
    DEFAULT_COEFFICIENT, Distribution, DistributionType, Parameter, SamplingEdge, SamplingGraph,
    SamplingNode, Samples,
};
