// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Velocity-Verlet style force simulation with alpha cooling.
//!
//! Each tick moves alpha toward its target, applies the link, many-body,
//! centering and positional forces (in that order) to node velocities, then
//! integrates positions with velocity decay.  Dragged nodes (with `fx`/`fy`
//! set) are held in place.

use std::f64::consts::PI;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::layout::config::ForceConfig;
use crate::layout::snapshot::{SimEdge, SimNode};

const INITIAL_RADIUS: f64 = 10.0;
// squared distance below which repulsion stops growing
const DISTANCE_MIN2: f64 = 1.0;

#[cfg_attr(feature = "debug-derive", derive(Debug))]
pub struct Simulation {
    config: ForceConfig,
    alpha: f64,
    alpha_target: f64,
    running: bool,
    link_distance: Vec<f64>,
    link_bias: Vec<f64>,
    rng: StdRng,
}

impl Simulation {
    pub fn new(config: &ForceConfig) -> Self {
        Simulation {
            config: config.clone(),
            alpha: config.alpha,
            alpha_target: 0.0,
            running: true,
            link_distance: Vec::new(),
            link_bias: Vec::new(),
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// Prepare nodes and links for simulation: nodes without a position are
    /// placed on a phyllotaxis spiral around the origin, dragged nodes snap
    /// to their fixed position, and per-link rest length and bias are
    /// recomputed.
    pub fn initialize(&mut self, nodes: &mut [SimNode], edges: &[SimEdge]) {
        let initial_angle = PI * (3.0 - 5f64.sqrt());
        for (i, node) in nodes.iter_mut().enumerate() {
            if let Some(fx) = node.fx {
                node.x = Some(fx);
            }
            if let Some(fy) = node.fy {
                node.y = Some(fy);
            }
            if node.x.is_none() || node.y.is_none() {
                let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
                let angle = i as f64 * initial_angle;
                node.x = Some(radius * angle.cos());
                node.y = Some(radius * angle.sin());
            }
            if !node.vx.is_finite() || !node.vy.is_finite() {
                node.vx = 0.0;
                node.vy = 0.0;
            }
        }

        let mut degree = vec![0usize; nodes.len()];
        for edge in edges {
            degree[edge.source] += 1;
            degree[edge.target] += 1;
        }
        self.link_bias = edges
            .iter()
            .map(|e| degree[e.source] as f64 / (degree[e.source] + degree[e.target]) as f64)
            .collect();
        self.link_distance = edges
            .iter()
            .map(|e| {
                self.config
                    .link_distance(&nodes[e.source].label, &nodes[e.target].label)
            })
            .collect();
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }

    pub fn alpha_target(&self) -> f64 {
        self.alpha_target
    }

    pub fn set_alpha_target(&mut self, target: f64) {
        self.alpha_target = target;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn restart(&mut self) {
        debug!("simulation restart at alpha {:.3}", self.alpha);
        self.running = true;
    }

    pub fn stop(&mut self) {
        debug!("simulation stopped at alpha {:.3}", self.alpha);
        self.running = false;
    }

    fn jiggle(&mut self) -> f64 {
        (self.rng.random::<f64>() - 0.5) * 1e-6
    }

    /// One frame of the animation timer: tick if running, then stop once
    /// cooled below `alpha_min`.  Returns whether the simulation is still
    /// running.
    pub fn step(&mut self, nodes: &mut [SimNode], edges: &[SimEdge]) -> bool {
        if !self.running {
            return false;
        }
        self.tick(nodes, edges);
        if self.alpha < self.config.alpha_min {
            self.stop();
        }
        self.running
    }

    pub fn tick(&mut self, nodes: &mut [SimNode], edges: &[SimEdge]) {
        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
        trace!("tick alpha={:.4}", self.alpha);

        self.apply_links(nodes, edges);
        self.apply_many_body(nodes);
        self.apply_center(nodes);
        self.apply_positional(nodes);

        let retain = 1.0 - self.config.velocity_decay;
        for node in nodes.iter_mut() {
            match node.fx {
                Some(fx) => {
                    node.x = Some(fx);
                    node.vx = 0.0;
                }
                None => {
                    node.vx *= retain;
                    node.x = Some(node.x.unwrap_or(0.0) + node.vx);
                }
            }
            match node.fy {
                Some(fy) => {
                    node.y = Some(fy);
                    node.vy = 0.0;
                }
                None => {
                    node.vy *= retain;
                    node.y = Some(node.y.unwrap_or(0.0) + node.vy);
                }
            }
        }
    }

    fn apply_links(&mut self, nodes: &mut [SimNode], edges: &[SimEdge]) {
        let strength = self.config.link_strength;
        for (i, edge) in edges.iter().enumerate() {
            let (Some(distance), Some(bias)) = (self.link_distance.get(i), self.link_bias.get(i))
            else {
                continue;
            };
            let (distance, bias) = (*distance, *bias);
            let (s, t) = (&nodes[edge.source], &nodes[edge.target]);
            let mut x = t.x.unwrap_or(0.0) + t.vx - s.x.unwrap_or(0.0) - s.vx;
            let mut y = t.y.unwrap_or(0.0) + t.vy - s.y.unwrap_or(0.0) - s.vy;
            if x == 0.0 {
                x = self.jiggle();
            }
            if y == 0.0 {
                y = self.jiggle();
            }
            let l = (x * x + y * y).sqrt();
            let l = (l - distance) / l * self.alpha * strength;
            x *= l;
            y *= l;

            let target = &mut nodes[edge.target];
            target.vx -= x * bias;
            target.vy -= y * bias;
            let source = &mut nodes[edge.source];
            source.vx += x * (1.0 - bias);
            source.vy += y * (1.0 - bias);
        }
    }

    fn apply_many_body(&mut self, nodes: &mut [SimNode]) {
        let weight = self.config.charge_strength * self.alpha;
        let positions: Vec<(f64, f64)> = nodes
            .iter()
            .map(|n| (n.x.unwrap_or(0.0), n.y.unwrap_or(0.0)))
            .collect();
        for i in 0..nodes.len() {
            let (xi, yi) = positions[i];
            let (mut dvx, mut dvy) = (0.0, 0.0);
            for (j, &(xj, yj)) in positions.iter().enumerate() {
                if i == j {
                    continue;
                }
                let mut x = xj - xi;
                let mut y = yj - yi;
                let mut l = x * x + y * y;
                if x == 0.0 {
                    x = self.jiggle();
                    l += x * x;
                }
                if y == 0.0 {
                    y = self.jiggle();
                    l += y * y;
                }
                if l < DISTANCE_MIN2 {
                    l = (DISTANCE_MIN2 * l).sqrt();
                }
                dvx += x * weight / l;
                dvy += y * weight / l;
            }
            nodes[i].vx += dvx;
            nodes[i].vy += dvy;
        }
    }

    fn apply_center(&self, nodes: &mut [SimNode]) {
        if nodes.is_empty() {
            return;
        }
        let n = nodes.len() as f64;
        let (sx, sy) = nodes.iter().fold((0.0, 0.0), |(sx, sy), node| {
            (sx + node.x.unwrap_or(0.0), sy + node.y.unwrap_or(0.0))
        });
        let sx = sx / n * self.config.center_strength;
        let sy = sy / n * self.config.center_strength;
        for node in nodes.iter_mut() {
            node.x = node.x.map(|x| x - sx);
            node.y = node.y.map(|y| y - sy);
        }
    }

    fn apply_positional(&self, nodes: &mut [SimNode]) {
        let k = self.config.pin_strength * self.alpha;
        for node in nodes.iter_mut() {
            if let Some(fy) = node.force_y {
                node.vy += (fy - node.y.unwrap_or(0.0)) * k;
            }
            if let Some(fx) = node.force_x {
                node.vx += (fx - node.x.unwrap_or(0.0)) * k;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Graph, Node};
    use crate::layout::snapshot::{snapshot_edges, snapshot_nodes};

    fn chain(labels: &[&str]) -> (Vec<SimNode>, Vec<SimEdge>) {
        let mut graph: Graph = Graph::new();
        let ids: Vec<_> = labels.iter().map(|l| graph.add_node(Node::new(*l))).collect();
        for pair in ids.windows(2) {
            graph.add_edge(Edge::new(pair[0], pair[1])).unwrap();
        }
        let nodes = snapshot_nodes(&graph);
        let edges = snapshot_edges(&graph, &nodes);
        (nodes, edges)
    }

    fn distance(a: &SimNode, b: &SimNode) -> f64 {
        let (ax, ay) = a.position().unwrap();
        let (bx, by) = b.position().unwrap();
        ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
    }

    #[test]
    fn test_initialize_places_on_spiral() {
        let (mut nodes, edges) = chain(&["A", "B", "C"]);
        nodes[2].x = Some(50.0);
        nodes[2].y = Some(60.0);
        let mut sim = Simulation::new(&ForceConfig::default());
        sim.initialize(&mut nodes, &edges);

        let (x0, y0) = nodes[0].position().unwrap();
        assert!((x0 - 10.0 * 0.5f64.sqrt()).abs() < 1e-12);
        assert_eq!(y0, 0.0);
        let (x1, y1) = nodes[1].position().unwrap();
        assert!(((x1 * x1 + y1 * y1).sqrt() - 10.0 * 1.5f64.sqrt()).abs() < 1e-9);
        assert_eq!(nodes[2].position(), Some((50.0, 60.0)));
        // middle node has degree 2, ends degree 1
        assert!((sim.link_bias[0] - 1.0 / 3.0).abs() < 1e-12);
        assert!((sim.link_bias[1] - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(sim.link_distance[0], 50.0 + 14.5 + 14.5);
    }

    #[test]
    fn test_alpha_cools_and_stops() {
        let (mut nodes, edges) = chain(&["A", "B"]);
        let config = ForceConfig::default();
        let mut sim = Simulation::new(&config);
        sim.initialize(&mut nodes, &edges);

        let mut ticks = 0;
        while sim.step(&mut nodes, &edges) {
            ticks += 1;
            assert!(ticks < 1_000);
        }
        // 1 - 0.001^(1/300) decay reaches alpha_min in about 300 ticks
        assert!((299..=301).contains(&ticks), "took {ticks} ticks");
        assert!(sim.alpha() < config.alpha_min);
        assert!(!sim.is_running());
        assert!(!sim.step(&mut nodes, &edges));
    }

    #[test]
    fn test_linked_nodes_settle_near_rest_length() {
        let (mut nodes, edges) = chain(&["A", "B"]);
        let mut sim = Simulation::new(&ForceConfig::default());
        sim.initialize(&mut nodes, &edges);
        while sim.step(&mut nodes, &edges) {}

        let d = distance(&nodes[0], &nodes[1]);
        // repulsion stretches the link beyond its 79 unit rest length
        assert!(d > 79.0 && d < 400.0, "distance {d}");
        // centering keeps the pair around the origin
        let cx = (nodes[0].x.unwrap() + nodes[1].x.unwrap()) / 2.0;
        assert!(cx.abs() < 1.0, "center {cx}");
    }

    #[test]
    fn test_pinned_axis_pulls_nodes_onto_line() {
        let (mut nodes, edges) = chain(&["A", "B", "C"]);
        for node in nodes.iter_mut() {
            node.force_y = Some(0.0);
        }
        let mut sim = Simulation::new(&ForceConfig::default());
        sim.initialize(&mut nodes, &edges);
        assert!(nodes.iter().any(|n| n.y.unwrap().abs() > 5.0));
        while sim.step(&mut nodes, &edges) {}

        for node in &nodes {
            let (x, y) = node.position().unwrap();
            assert!(y.abs() < 1.0, "{} at ({x}, {y})", node.label);
        }
        // nodes on a line cannot pass each other, so only separation holds
        for (i, a) in nodes.iter().enumerate() {
            for b in &nodes[i + 1..] {
                let d = distance(a, b);
                assert!(d > 20.0, "{} and {} only {d} apart", a.label, b.label);
            }
        }
    }

    #[test]
    fn test_fixed_nodes_do_not_move() {
        let (mut nodes, edges) = chain(&["A", "B"]);
        nodes[1].fx = Some(30.0);
        nodes[1].fy = Some(-30.0);
        let mut sim = Simulation::new(&ForceConfig::default());
        sim.initialize(&mut nodes, &edges);
        for _ in 0..50 {
            sim.tick(&mut nodes, &edges);
        }
        assert_eq!(nodes[1].position(), Some((30.0, -30.0)));
        assert_eq!(nodes[1].vx, 0.0);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let (mut a, edges) = chain(&["A", "B", "C"]);
        let mut b = a.clone();
        let mut sim_a = Simulation::new(&ForceConfig::default());
        let mut sim_b = Simulation::new(&ForceConfig::default());
        sim_a.initialize(&mut a, &edges);
        sim_b.initialize(&mut b, &edges);
        for _ in 0..100 {
            sim_a.tick(&mut a, &edges);
            sim_b.tick(&mut b, &edges);
        }
        assert_eq!(a, b);
    }
}
