// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

/// Pair-grid geometry and sampling settings, in SVG user units.
#[derive(Clone, Debug)]
pub struct PairGridConfig {
    /// Inset between a subplot's edge and its lowest plotted value.
    pub subplot_padding: f64,
    /// Gap between neighbouring subplots.
    pub grid_gap: f64,
    /// Room on the left for row labels and y ticks.
    pub margin_left: f64,
    /// Room at the bottom for column labels and x ticks.
    pub margin_bottom: f64,
    pub point_radius: f64,
    pub min_bins: usize,
    /// Subplot width each histogram bin is given.
    pub pixels_per_bin: f64,
    /// Draws per node when (re)sampling.
    pub sample_count: usize,
    pub tick_size: f64,
    pub tick_padding: f64,
}

impl Default for PairGridConfig {
    fn default() -> Self {
        Self {
            subplot_padding: 12.0,
            grid_gap: 24.0,
            margin_left: 48.0,
            margin_bottom: 40.0,
            point_radius: 1.5,
            min_bins: 5,
            pixels_per_bin: 12.0,
            sample_count: 30,
            tick_size: 6.0,
            tick_padding: 4.0,
        }
    }
}
