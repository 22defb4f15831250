// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

pub mod config;
pub mod force_graph;
pub mod geometry;
pub mod render;
pub mod scene;
pub mod simulation;
pub mod snapshot;

use log::debug;

use crate::graph::GraphView;

pub use self::config::ForceConfig;
pub use self::force_graph::{ForceGraph, NodeEventListener};
pub use self::geometry::{Point, Segment, Stadium, clip_edge};
pub use self::scene::{JoinCounts, Scene, SceneEdge, SceneNode, keyed_join};
pub use self::simulation::Simulation;
pub use self::snapshot::{SimEdge, SimNode, merge_nodes, snapshot_edges, snapshot_nodes};

/// Lay out `view` without binding to it: run the simulation (when enabled)
/// for at most `max_ticks` frames and return the resulting SVG.  `None`
/// when `config` lacks a canvas size.
pub fn render_static(view: &dyn GraphView, config: &ForceConfig, max_ticks: usize) -> Option<String> {
    let (width, height) = (config.width?, config.height?);

    let mut nodes = snapshot_nodes(view);
    let edges = snapshot_edges(view, &nodes);
    if config.enable_simulation {
        let mut simulation = Simulation::new(config);
        simulation.initialize(&mut nodes, &edges);
        let mut ticks = 0;
        while ticks < max_ticks && simulation.step(&mut nodes, &edges) {
            ticks += 1;
        }
        debug!(
            "static layout ran {ticks} ticks, alpha {:.4}",
            simulation.alpha()
        );
    } else {
        for node in nodes.iter_mut() {
            node.x = node.x.or(Some(0.0));
            node.y = node.y.or(Some(0.0));
        }
    }

    let mut scene = Scene::new(
        width,
        height,
        crate::graph::describe(view),
        "arrow-marker".to_owned(),
    );
    scene.join_nodes(&nodes, config);
    scene.join_edges(&edges, &nodes);
    for element in scene.nodes.iter_mut() {
        element.is_highlighted = view
            .base_node(element.id)
            .is_some_and(|n| n.is_highlighted());
    }
    Some(render::render_scene(&scene, config))
}
