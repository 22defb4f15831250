// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! A force layout and a pair grid bound to the same sampling graph.

use rand::SeedableRng;
use rand::rngs::StdRng;

use nerviz_engine::layout::Point;
use nerviz_engine::{
    DistributionType, ForceConfig, ForceGraph, GraphFile, Node, PairGrid, PairGridConfig,
    SamplingGraph, SamplingNode,
};

const WEATHER: &str = r#"{
    "nodes": [
        {"key": "cloudy", "label": "Cloudy", "distribution": {"type": "bernoulli", "p": 0.5}},
        {"key": "rain", "label": "Rain", "distribution": {"type": "normal", "sigma": 0.2}},
        {"key": "wet", "label": "Wet grass", "distribution": {"type": "normal", "sigma": 0.2}},
        {"key": "sprinkler", "label": "Sprinkler", "faded": true, "x": 0, "y": 0}
    ],
    "edges": [
        {"source": "cloudy", "target": "rain", "label": "causes"},
        {"source": "rain", "target": "wet"},
        {"source": "sprinkler", "target": "wet", "directed": false, "faded": true}
    ]
}"#;

fn weather() -> (SamplingGraph, std::collections::BTreeMap<String, nerviz_engine::NodeId>) {
    GraphFile::from_json(WEATHER)
        .unwrap()
        .into_sampling_graph()
        .unwrap()
}

fn config() -> ForceConfig {
    ForceConfig {
        width: Some(640.0),
        height: Some(480.0),
        enable_simulation: true,
        ..ForceConfig::default()
    }
}

fn distance(a: Point, b: Point) -> f64 {
    (a - b).length()
}

#[test]
fn test_imported_graph_renders() {
    let (mut graph, keys) = weather();
    let mut fg = ForceGraph::mount(&mut graph, config());
    let ticks = fg.run_to_rest(2000);
    assert!(ticks > 0);
    assert!(!fg.is_running());

    let svg = fg.render_svg().unwrap();
    assert!(svg.contains(">causes</text>"));
    assert!(svg.contains(">Wet grass</text>"));
    assert!(svg.contains("class=\"node-wrap faded\""));
    assert!(svg.contains("class=\"edge-wrap faded\""));
    // two directed edges carry an arrowhead, the undirected one does not
    assert_eq!(svg.matches("marker-end=").count(), 2);

    let positions = fg.positions();
    assert_eq!(positions.len(), keys.len());
    assert!(positions.iter().all(|(_, p)| p.x.is_finite() && p.y.is_finite()));
}

#[test]
fn test_layout_separates_nodes() {
    let (mut graph, keys) = weather();
    let mut fg = ForceGraph::mount(&mut graph, config());
    fg.run_to_rest(2000);

    let ids: Vec<_> = keys.values().copied().collect();
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            let (pa, pb) = (fg.position(*a).unwrap(), fg.position(*b).unwrap());
            assert!(distance(pa, pb) > 20.0, "{pa:?} and {pb:?} overlap");
        }
    }
}

#[test]
fn test_pair_grid_hover_drives_force_graph() {
    let (mut graph, keys) = weather();
    let mut fg = ForceGraph::mount(&mut graph, config());
    fg.run_to_rest(500);
    let settled = fg.positions();

    let mut rng = StdRng::seed_from_u64(42);
    let mut grid = PairGrid::mount(&mut graph, PairGridConfig::default(), &mut rng).unwrap();
    grid.resize(600.0, 600.0);

    // column 0 is Cloudy, row 1 is Rain
    grid.hover(&mut graph, 0, 1).unwrap();
    let scene = fg.scene().unwrap();
    let highlighted: Vec<_> = scene
        .nodes
        .iter()
        .filter(|n| n.is_highlighted)
        .map(|n| n.id)
        .collect();
    assert_eq!(highlighted, vec![keys["cloudy"], keys["rain"]]);
    assert_eq!(fg.positions(), settled);
    assert!(!fg.is_running());

    grid.unhover(&mut graph).unwrap();
    assert!(fg.scene().unwrap().nodes.iter().all(|n| !n.is_highlighted));

    let svg = grid.render_svg(&graph).unwrap().unwrap();
    assert!(svg.contains(">Sprinkler</text>"));

    grid.unmount(&mut graph);
    fg.unmount(&mut graph);
    assert_eq!(graph.subscriber_count(), 0);
}

#[test]
fn test_parameter_change_only_stales_pair_grid() {
    let (mut graph, keys) = weather();
    let mut fg = ForceGraph::mount(&mut graph, config());
    fg.run_to_rest(2000);
    let mut rng = StdRng::seed_from_u64(1);
    let mut grid = PairGrid::mount(&mut graph, PairGridConfig::default(), &mut rng).unwrap();

    graph
        .set_distribution(keys["sprinkler"], DistributionType::Beta)
        .unwrap();
    assert!(grid.is_stale());
    assert!(!fg.is_running());

    grid.resample(&graph, &mut rng).unwrap();
    assert!(!grid.is_stale());
    let draws = grid.samples().unwrap().get(keys["sprinkler"]).unwrap();
    assert!(draws.iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn test_growing_graph_keeps_layout() {
    let (mut graph, keys) = weather();
    let mut fg = ForceGraph::mount(&mut graph, config());
    fg.run_to_rest(2000);
    let before = fg.position(keys["rain"]).unwrap();

    let added = graph.add_node(SamplingNode::from_node(Node::new("Slippery")));
    assert!(fg.is_running());
    assert_eq!(fg.position(keys["rain"]), Some(before));
    assert!(fg.position(added).is_some());

    fg.run_to_rest(2000);
    assert!(fg.render_svg().unwrap().contains("Slippery"));
}

#[test]
fn test_drag_via_hit_test() {
    let (mut graph, keys) = weather();
    let mut fg = ForceGraph::mount(&mut graph, config());
    fg.run_to_rest(2000);

    let wet = keys["wet"];
    let at = fg.position(wet).unwrap();
    // overlapping boxes resolve to the topmost node
    let hit = fg.node_at(at.x, at.y).unwrap();
    let at = fg.position(hit).unwrap();

    let t0 = std::time::Instant::now();
    fg.drag_start(hit, t0);
    fg.drag_move(at.x + 40.0, at.y, t0 + std::time::Duration::from_millis(200));
    assert!(fg.is_dragging());
    fg.tick();
    assert_eq!(fg.position(hit), Some(Point::new(at.x + 40.0, at.y)));
    fg.drag_end();
}
