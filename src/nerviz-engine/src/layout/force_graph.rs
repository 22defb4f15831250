// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Binds a [`Graph`] to a force-directed drawing.
//!
//! A mounted [`ForceGraph`] subscribes to the graph's structure and
//! highlight topics.  Structure changes re-snapshot the graph, rebind the
//! scene by id and reheat the simulation; highlight changes only toggle the
//! `highlighted` class.  Nothing is drawn until the canvas size is known.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use log::{debug, warn};

use crate::graph::{
    self, BaseEdge, BaseNode, Graph, GraphEvent, GraphView, NodeId, SubscriptionId, Topic,
};
use crate::layout::config::ForceConfig;
use crate::layout::geometry::Point;
use crate::layout::render::render_scene;
use crate::layout::scene::Scene;
use crate::layout::simulation::Simulation;
use crate::layout::snapshot::{SimEdge, SimNode, merge_nodes, snapshot_edges, snapshot_nodes};

static NEXT_MARKER: AtomicU64 = AtomicU64::new(1);

/// A handler attached to every node, e.g. `("click", ...)`.
pub struct NodeEventListener {
    pub event: String,
    pub handler: Box<dyn FnMut(NodeId)>,
}

impl NodeEventListener {
    pub fn new(event: impl Into<String>, handler: impl FnMut(NodeId) + 'static) -> Self {
        NodeEventListener {
            event: event.into(),
            handler: Box::new(handler),
        }
    }
}

struct Drag {
    node: NodeId,
    pressed_at: Instant,
    active: bool,
}

struct ForceState {
    config: ForceConfig,
    marker_id: String,
    scene: Option<Scene>,
    nodes: Vec<SimNode>,
    edges: Vec<SimEdge>,
    simulation: Option<Simulation>,
    playing: bool,
    drag: Option<Drag>,
    listeners: Vec<NodeEventListener>,
}

impl ForceState {
    fn dimensions(&self) -> Option<(f64, f64)> {
        Some((self.config.width?, self.config.height?))
    }

    fn initial_render(&mut self, view: &dyn GraphView) {
        let Some((width, height)) = self.dimensions() else {
            return;
        };
        debug!("initial render at {width}x{height}");
        self.scene = Some(Scene::new(
            width,
            height,
            graph::describe(view),
            self.marker_id.clone(),
        ));
        if self.config.enable_simulation {
            let mut simulation = Simulation::new(&self.config);
            if !self.playing {
                simulation.stop();
            }
            self.simulation = Some(simulation);
        }
        self.rebind(view);
    }

    fn rerender(&mut self, view: &dyn GraphView) {
        if self.scene.is_none() {
            return;
        }
        debug!("re-render after structure change");
        self.rebind(view);
        let reheat = self.config.reheat_alpha;
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.set_alpha(reheat);
            if self.playing {
                simulation.restart();
            }
        }
    }

    /// Merge a fresh snapshot into the working copy and join it onto the
    /// scene.
    fn rebind(&mut self, view: &dyn GraphView) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        let mut nodes = merge_nodes(&self.nodes, snapshot_nodes(view));
        let edges = snapshot_edges(view, &nodes);

        match self.simulation.as_mut() {
            Some(simulation) => simulation.initialize(&mut nodes, &edges),
            None => {
                for node in nodes.iter_mut() {
                    node.x = node.x.or(Some(0.0));
                    node.y = node.y.or(Some(0.0));
                }
            }
        }

        scene.title = graph::describe(view);
        let node_counts = scene.join_nodes(&nodes, &self.config);
        let edge_counts = scene.join_edges(&edges, &nodes);
        debug!("scene join: nodes {node_counts:?}, edges {edge_counts:?}");
        for element in scene.nodes.iter_mut() {
            element.is_highlighted = view
                .base_node(element.id)
                .is_some_and(|n| n.is_highlighted());
        }
        scene.sync_positions(&nodes);

        self.nodes = nodes;
        self.edges = edges;
    }

    fn on_structure(&mut self, view: &dyn GraphView) {
        if self.scene.is_none() {
            // still waiting for dimensions; the initial render will read
            // the graph as it stands then
            return;
        }
        self.rerender(view);
    }

    fn on_highlight(&mut self, node: NodeId, highlighted: bool) {
        if let Some(scene) = self.scene.as_mut() {
            scene.set_highlighted(node, highlighted);
        }
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut SimNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    fn poll_drag(&mut self, now: Instant) {
        let debounce = self.config.drag_debounce;
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        if drag.active || now.duration_since(drag.pressed_at) < debounce {
            return;
        }
        drag.active = true;
        let id = drag.node;
        let target = self.config.drag_alpha_target;
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.set_alpha_target(target);
            simulation.restart();
        }
        if let Some(node) = self.node_mut(id) {
            node.fx = node.x;
            node.fy = node.y;
        }
        debug!("drag started on node {id}");
    }
}

/// Force-directed drawing of a graph, kept in sync with it through
/// subscriptions.  Drive it by calling [`ForceGraph::tick`] once per frame.
pub struct ForceGraph {
    state: Rc<RefCell<ForceState>>,
    subscriptions: Vec<SubscriptionId>,
}

impl ForceGraph {
    /// Attach to `graph`.  Renders immediately when `config` carries both
    /// dimensions, otherwise on the first [`ForceGraph::resize`].
    pub fn mount<N: BaseNode, E: BaseEdge>(graph: &mut Graph<N, E>, config: ForceConfig) -> Self {
        let marker_id = format!(
            "arrow-marker-{}",
            NEXT_MARKER.fetch_add(1, Ordering::Relaxed)
        );
        let state = Rc::new(RefCell::new(ForceState {
            config,
            marker_id,
            scene: None,
            nodes: Vec::new(),
            edges: Vec::new(),
            simulation: None,
            playing: true,
            drag: None,
            listeners: Vec::new(),
        }));

        let structure = graph.subscribe_weak(
            Topic::Structure,
            &state,
            |state: &RefCell<ForceState>, _event, view| match state.try_borrow_mut() {
                Ok(mut state) => state.on_structure(view),
                Err(_) => warn!("force graph busy, structure change dropped"),
            },
        );

        let highlight = graph.subscribe_weak(
            Topic::Highlight,
            &state,
            |state: &RefCell<ForceState>, event, _view| {
                let GraphEvent::HighlightChanged { node, highlighted } = *event else {
                    return;
                };
                if let Ok(mut state) = state.try_borrow_mut() {
                    state.on_highlight(node, highlighted);
                }
            },
        );

        state.borrow_mut().initial_render(&*graph);

        ForceGraph {
            state,
            subscriptions: vec![structure, highlight],
        }
    }

    /// Detach from `graph`.  The drawing stays as it was.
    pub fn unmount<N: BaseNode, E: BaseEdge>(&mut self, graph: &mut Graph<N, E>) {
        for id in self.subscriptions.drain(..) {
            graph.unsubscribe(id);
        }
        if let Some(simulation) = self.state.borrow_mut().simulation.as_mut() {
            simulation.stop();
        }
    }

    pub fn is_mounted(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// Whether the initial render has happened.
    pub fn is_rendered(&self) -> bool {
        self.state.borrow().scene.is_some()
    }

    /// Update the canvas size.  The first time both dimensions are known
    /// this performs the initial render; afterwards only the view box
    /// changes and the simulation is left alone.
    pub fn resize(&mut self, view: &dyn GraphView, width: f64, height: f64) {
        let mut state = self.state.borrow_mut();
        state.config.width = Some(width);
        state.config.height = Some(height);
        if let Some(scene) = state.scene.as_mut() {
            scene.resize(width, height);
            return;
        }
        state.initial_render(view);
    }

    /// Resume (at zero energy, so only a held drag target moves anything)
    /// or freeze the simulation.
    pub fn set_playing(&mut self, playing: bool) {
        let mut state = self.state.borrow_mut();
        state.playing = playing;
        if let Some(simulation) = state.simulation.as_mut() {
            if playing {
                simulation.set_alpha(0.0);
                simulation.restart();
            } else {
                simulation.stop();
            }
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state.borrow().playing
    }

    /// Advance one animation frame.  Returns whether the simulation is
    /// still running.
    pub fn tick(&mut self) -> bool {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        let (Some(simulation), Some(scene)) = (state.simulation.as_mut(), state.scene.as_mut())
        else {
            return false;
        };
        let running = simulation.step(&mut state.nodes, &state.edges);
        scene.sync_positions(&state.nodes);
        running
    }

    /// Tick until the simulation stops or `max_ticks` frames have run.
    /// Returns the number of frames run.
    pub fn run_to_rest(&mut self, max_ticks: usize) -> usize {
        let mut ticks = 0;
        while ticks < max_ticks && self.tick() {
            ticks += 1;
        }
        ticks
    }

    pub fn alpha(&self) -> Option<f64> {
        self.state.borrow().simulation.as_ref().map(|s| s.alpha())
    }

    pub fn is_running(&self) -> bool {
        self.state
            .borrow()
            .simulation
            .as_ref()
            .is_some_and(|s| s.is_running())
    }

    /// Current drawn position of every node, in drawing order.
    pub fn positions(&self) -> Vec<(NodeId, Point)> {
        self.state
            .borrow()
            .nodes
            .iter()
            .filter_map(|n| {
                let (x, y) = n.position()?;
                Some((n.id, Point::new(x, y)))
            })
            .collect()
    }

    pub fn position(&self, id: NodeId) -> Option<Point> {
        self.positions()
            .into_iter()
            .find(|(node, _)| *node == id)
            .map(|(_, p)| p)
    }

    /// A snapshot of the retained scene, if rendered.
    pub fn scene(&self) -> Option<Scene> {
        self.state.borrow().scene.clone()
    }

    pub fn render_svg(&self) -> Option<String> {
        let state = self.state.borrow();
        let scene = state.scene.as_ref()?;
        Some(render_scene(scene, &state.config))
    }

    /// Topmost node under `(x, y)` in view-box coordinates.
    pub fn node_at(&self, x: f64, y: f64) -> Option<NodeId> {
        self.state
            .borrow()
            .scene
            .as_ref()?
            .node_at(Point::new(x, y))
    }

    /// Pointer pressed on `node`.  Dragging only begins once the press has
    /// lasted the configured debounce, so plain clicks leave the layout
    /// alone.  No-op without a simulation.
    pub fn drag_start(&mut self, node: NodeId, now: Instant) {
        let mut state = self.state.borrow_mut();
        if state.simulation.is_none() {
            return;
        }
        state.drag = Some(Drag {
            node,
            pressed_at: now,
            active: false,
        });
    }

    /// Pointer moved to `(x, y)` while pressed: the node follows it.
    pub fn drag_move(&mut self, x: f64, y: f64, now: Instant) {
        let mut state = self.state.borrow_mut();
        state.poll_drag(now);
        let Some(id) = state.drag.as_ref().map(|d| d.node) else {
            return;
        };
        if let Some(node) = state.node_mut(id) {
            node.fx = Some(x);
            node.fy = Some(y);
        }
    }

    /// Let a pending press become a drag once the debounce has elapsed.
    pub fn poll(&mut self, now: Instant) {
        self.state.borrow_mut().poll_drag(now);
    }

    /// Pointer released: cool back down and let the node go.
    pub fn drag_end(&mut self) {
        let mut state = self.state.borrow_mut();
        let Some(drag) = state.drag.take() else {
            return;
        };
        if let Some(simulation) = state.simulation.as_mut() {
            simulation.set_alpha_target(0.0);
        }
        if let Some(node) = state.node_mut(drag.node) {
            node.fx = None;
            node.fy = None;
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.state.borrow().drag.as_ref().is_some_and(|d| d.active)
    }

    /// Replace the handlers attached to every node.
    pub fn set_node_event_listeners(&mut self, listeners: Vec<NodeEventListener>) {
        self.state.borrow_mut().listeners = listeners;
    }

    /// Deliver `event` on `node` to every matching handler.  Returns how
    /// many handlers ran.  Handlers may mutate the graph.
    pub fn dispatch_node_event(&mut self, event: &str, node: NodeId) -> usize {
        // take the handlers out so they can run while the graph notifies us
        let mut listeners = std::mem::take(&mut self.state.borrow_mut().listeners);
        let mut called = 0;
        for listener in listeners.iter_mut().filter(|l| l.event == event) {
            (listener.handler)(node);
            called += 1;
        }
        let mut state = self.state.borrow_mut();
        // keep anything installed by a handler
        listeners.append(&mut state.listeners);
        state.listeners = listeners;
        called
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::Duration;

    use super::*;
    use crate::graph::{Edge, Node};

    fn sized(enable_simulation: bool) -> ForceConfig {
        ForceConfig {
            width: Some(600.0),
            height: Some(400.0),
            enable_simulation,
            ..ForceConfig::default()
        }
    }

    #[test]
    fn test_waits_for_dimensions() {
        let mut graph: Graph = Graph::new();
        graph.add_node(Node::new("A"));
        let mut fg = ForceGraph::mount(&mut graph, ForceConfig::default());
        assert!(!fg.is_rendered());
        assert!(fg.render_svg().is_none());
        assert!(!fg.tick());

        // structure changes before the first render are not an error
        graph.add_node(Node::new("B"));
        assert!(!fg.is_rendered());

        fg.resize(&graph, 300.0, 200.0);
        let scene = fg.scene().unwrap();
        assert_eq!(scene.nodes.len(), 2);
        assert_eq!(scene.view_box(), [-150.0, -100.0, 300.0, 200.0]);
    }

    #[test]
    fn test_resize_only_changes_view_box() {
        let mut graph: Graph = Graph::new();
        let a = graph.add_node(Node::new("A"));
        let b = graph.add_node(Node::new("B"));
        graph.add_edge(Edge::new(a, b)).unwrap();
        let mut fg = ForceGraph::mount(&mut graph, sized(true));
        fg.run_to_rest(20);
        let alpha = fg.alpha().unwrap();
        let before = fg.positions();

        fg.resize(&graph, 800.0, 800.0);
        assert_eq!(fg.alpha().unwrap(), alpha);
        assert_eq!(fg.positions(), before);
        assert_eq!(fg.scene().unwrap().view_box(), [-400.0, -400.0, 800.0, 800.0]);
    }

    #[test]
    fn test_structure_change_reheats_and_preserves_positions() {
        let mut graph: Graph = Graph::new();
        let a = graph.add_node(Node::new("A"));
        let b = graph.add_node(Node::new("B"));
        graph.add_edge(Edge::new(a, b)).unwrap();
        let mut fg = ForceGraph::mount(&mut graph, sized(true));
        fg.run_to_rest(1000);
        assert!(!fg.is_running());
        let settled = fg.position(a).unwrap();

        let c = graph.add_node(Node::new("C"));
        assert!(fg.is_running());
        assert!((fg.alpha().unwrap() - 0.1).abs() < f64::EPSILON);
        assert_eq!(fg.position(a), Some(settled));
        assert!(fg.position(c).is_some());
        assert_eq!(fg.scene().unwrap().nodes.len(), 3);
        assert!(fg.render_svg().unwrap().contains("A, B, and C."));
    }

    #[test]
    fn test_highlight_does_not_touch_layout() {
        let mut graph: Graph = Graph::new();
        let a = graph.add_node(Node::new("A"));
        let mut fg = ForceGraph::mount(&mut graph, sized(true));
        fg.run_to_rest(1000);
        let alpha = fg.alpha().unwrap();

        graph.set_highlighted(a, true).unwrap();
        assert!(fg.scene().unwrap().nodes[0].is_highlighted);
        assert!(!fg.is_running());
        assert_eq!(fg.alpha().unwrap(), alpha);
        assert!(fg.render_svg().unwrap().contains("node-wrap highlighted"));

        graph.set_highlighted(a, false).unwrap();
        assert!(!fg.scene().unwrap().nodes[0].is_highlighted);
    }

    #[test]
    fn test_without_simulation_nodes_stay_put() {
        let mut graph: Graph = Graph::new();
        let a = graph.add_node(Node::new("A").with_position(10.0, 20.0));
        let b = graph.add_node(Node::new("B"));
        let mut fg = ForceGraph::mount(&mut graph, sized(false));
        assert!(!fg.tick());
        assert_eq!(fg.alpha(), None);
        assert_eq!(fg.position(a), Some(Point::new(10.0, 20.0)));
        assert_eq!(fg.position(b), Some(Point::new(0.0, 0.0)));

        // still re-renders on structure changes
        graph.add_node(Node::new("C"));
        assert_eq!(fg.scene().unwrap().nodes.len(), 3);
    }

    #[test]
    fn test_play_pause() {
        let mut graph: Graph = Graph::new();
        graph.add_node(Node::new("A"));
        graph.add_node(Node::new("B"));
        let mut fg = ForceGraph::mount(&mut graph, sized(true));
        assert!(fg.is_running());

        fg.set_playing(false);
        assert!(!fg.is_running());
        let frozen = fg.positions();
        assert!(!fg.tick());
        assert_eq!(fg.positions(), frozen);

        // resuming at zero energy stops again on the next frame
        fg.set_playing(true);
        assert!(fg.is_running());
        assert!(!fg.tick());
    }

    #[test]
    fn test_drag_is_debounced() {
        let mut graph: Graph = Graph::new();
        let a = graph.add_node(Node::new("A"));
        let b = graph.add_node(Node::new("B"));
        graph.add_edge(Edge::new(a, b)).unwrap();
        let mut fg = ForceGraph::mount(&mut graph, sized(true));
        fg.run_to_rest(1000);
        assert!(!fg.is_running());

        let t0 = Instant::now();
        fg.drag_start(a, t0);
        fg.poll(t0 + Duration::from_millis(50));
        assert!(!fg.is_dragging());
        assert!(!fg.is_running());

        // a quick click never reheats
        fg.drag_end();
        assert!(!fg.is_running());

        fg.drag_start(a, t0);
        fg.drag_move(150.0, -80.0, t0 + Duration::from_millis(120));
        assert!(fg.is_dragging());
        assert!(fg.is_running());
        fg.tick();
        assert_eq!(fg.position(a), Some(Point::new(150.0, -80.0)));

        fg.drag_end();
        assert!(!fg.is_dragging());
        fg.tick();
        assert_ne!(fg.position(a), Some(Point::new(150.0, -80.0)));
    }

    #[test]
    fn test_node_events() {
        let mut graph: Graph = Graph::new();
        let a = graph.add_node(Node::new("Alpha").with_position(0.0, 0.0));
        let mut fg = ForceGraph::mount(&mut graph, sized(false));

        let clicks = Rc::new(Cell::new(0));
        let seen = clicks.clone();
        fg.set_node_event_listeners(vec![
            NodeEventListener::new("click", move |id| {
                assert_eq!(id, a);
                seen.set(seen.get() + 1);
            }),
            NodeEventListener::new("mouseover", |_| {}),
        ]);

        let hit = fg.node_at(5.0, 3.0).unwrap();
        assert_eq!(fg.dispatch_node_event("click", hit), 1);
        assert_eq!(fg.dispatch_node_event("click", hit), 1);
        assert_eq!(fg.dispatch_node_event("dblclick", hit), 0);
        assert_eq!(clicks.get(), 2);
        assert_eq!(fg.node_at(200.0, 0.0), None);
    }

    #[test]
    fn test_unmount_stops_listening() {
        let mut graph: Graph = Graph::new();
        graph.add_node(Node::new("A"));
        let mut fg = ForceGraph::mount(&mut graph, sized(false));
        assert_eq!(graph.subscriber_count(), 2);
        fg.unmount(&mut graph);
        assert!(!fg.is_mounted());
        assert_eq!(graph.subscriber_count(), 0);

        graph.add_node(Node::new("B"));
        assert_eq!(fg.scene().unwrap().nodes.len(), 1);
    }

    #[test]
    fn test_dropped_graph_view_releases_subscriptions() {
        let mut graph: Graph = Graph::new();
        graph.add_node(Node::new("A"));
        for _ in 0..3 {
            let fg = ForceGraph::mount(&mut graph, sized(true));
            assert_eq!(graph.subscriber_count(), 2);
            drop(fg);
        }
        assert_eq!(graph.subscriber_count(), 0);

        let kept = ForceGraph::mount(&mut graph, sized(false));
        graph.add_node(Node::new("B"));
        assert_eq!(kept.scene().unwrap().nodes.len(), 2);
        assert_eq!(graph.subscriber_count(), 2);
    }
}
