// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::time::Duration;

/// Force layout and node-drawing configuration.
///
/// Distances and sizes are in SVG user units, which equal canvas pixels
/// because the view box always matches the canvas size.
#[derive(Clone, Debug)]
pub struct ForceConfig {
    // Canvas
    /// Canvas width.  Nothing renders until both dimensions are known.
    pub width: Option<f64>,
    pub height: Option<f64>,

    /// Run the physics simulation.  When false nodes stay at their model
    /// coordinates (or the origin).
    pub enable_simulation: bool,
    /// Gap between two linked node boxes that the link force aims for.
    pub min_node_distance: f64,

    // Forces
    /// Many-body strength; negative values repel.
    pub charge_strength: f64,
    pub link_strength: f64,
    pub center_strength: f64,
    /// Strength of the positional force toward a node's `force_x`/`force_y`.
    /// Nodes without a pinned coordinate feel no positional force.
    pub pin_strength: f64,
    /// Per-character padding a label contributes to its links' rest length.
    pub link_padding_per_char: f64,
    pub link_padding: f64,

    // Node and edge label boxes
    pub node_char_width: f64,
    pub node_padding: f64,
    pub node_height: f64,
    pub edge_label_char_width: f64,
    pub edge_label_padding: f64,
    pub edge_label_height: f64,

    // Cooling
    pub alpha: f64,
    pub alpha_min: f64,
    /// Per-tick fraction by which alpha approaches its target.
    pub alpha_decay: f64,
    /// Fraction of velocity lost each tick.
    pub velocity_decay: f64,
    /// Alpha to restart at after the node or edge list changes.
    pub reheat_alpha: f64,
    /// Alpha target held while a node is being dragged.
    pub drag_alpha_target: f64,
    /// Delay before a press becomes a drag, so clicks don't jiggle the graph.
    pub drag_debounce: Duration,

    /// Seed for the jiggle applied to coincident nodes.
    pub seed: u64,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            enable_simulation: false,
            min_node_distance: 50.0,
            charge_strength: -800.0,
            link_strength: 1.0,
            center_strength: 0.1,
            pin_strength: 5.0,
            link_padding_per_char: 4.5,
            link_padding: 10.0,
            node_char_width: 9.0,
            node_padding: 20.0,
            node_height: 24.0,
            edge_label_char_width: 9.0,
            edge_label_padding: 8.0,
            edge_label_height: 18.0,
            alpha: 1.0,
            alpha_min: 0.001,
            alpha_decay: 1.0 - 0.001f64.powf(1.0 / 300.0),
            velocity_decay: 0.4,
            reheat_alpha: 0.1,
            drag_alpha_target: 0.3,
            drag_debounce: Duration::from_millis(100),
            seed: 42,
        }
    }
}

impl ForceConfig {
    pub fn node_box_width(&self, label: &str) -> f64 {
        label.chars().count() as f64 * self.node_char_width + self.node_padding
    }

    pub fn edge_label_width(&self, label: Option<&str>) -> f64 {
        match label {
            Some(label) if !label.is_empty() => {
                label.chars().count() as f64 * self.edge_label_char_width + self.edge_label_padding
            }
            _ => 0.0,
        }
    }

    /// Rest length of a link between nodes labelled `source` and `target`.
    pub fn link_distance(&self, source: &str, target: &str) -> f64 {
        let cutoff = |label: &str| {
            label.chars().count() as f64 * self.link_padding_per_char + self.link_padding
        };
        self.min_node_distance + cutoff(source) + cutoff(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ForceConfig::default();

        assert!(config.width.is_none());
        assert!(config.height.is_none());
        assert!(!config.enable_simulation);
        assert!((config.min_node_distance - 50.0).abs() < f64::EPSILON);

        // Forces
        assert!((config.charge_strength + 800.0).abs() < f64::EPSILON);
        assert!((config.link_strength - 1.0).abs() < f64::EPSILON);
        assert!((config.center_strength - 0.1).abs() < f64::EPSILON);
        assert!((config.pin_strength - 5.0).abs() < f64::EPSILON);

        // Cooling: alpha reaches alpha_min after ~300 ticks
        assert!((config.alpha - 1.0).abs() < f64::EPSILON);
        assert!((config.alpha_min - 0.001).abs() < f64::EPSILON);
        assert!((config.alpha_decay - 0.0228).abs() < 1e-4);
        assert!((config.velocity_decay - 0.4).abs() < f64::EPSILON);
        assert!((config.reheat_alpha - 0.1).abs() < f64::EPSILON);
        assert!((config.drag_alpha_target - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.drag_debounce, Duration::from_millis(100));
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_box_metrics() {
        let config = ForceConfig::default();
        assert_eq!(config.node_box_width("Rain"), 56.0);
        assert_eq!(config.node_box_width(""), 20.0);
        assert_eq!(config.edge_label_width(Some("ab")), 26.0);
        assert_eq!(config.edge_label_width(None), 0.0);
        // 50 + (3 * 4.5 + 10) + (5 * 4.5 + 10)
        assert_eq!(config.link_distance("Sun", "Cloud"), 106.0);
    }
}
