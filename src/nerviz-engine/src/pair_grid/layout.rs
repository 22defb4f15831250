// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Subplot placement for a `k` by `k` grid.  Columns are indexed by the
//! variable on the x axis, rows by the variable on the y axis.

use crate::pair_grid::config::PairGridConfig;

/// A rectangle in canvas coordinates.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[cfg_attr(feature = "debug-derive", derive(Debug))]
#[derive(Clone)]
pub struct GridLayout {
    pub width: f64,
    pub height: f64,
    pub variables: usize,
    pub subplot_width: f64,
    pub subplot_height: f64,
    padding: f64,
    gap: f64,
    margin_left: f64,
}

impl GridLayout {
    pub fn new(config: &PairGridConfig, width: f64, height: f64, variables: usize) -> Self {
        let k = variables.max(1) as f64;
        let gaps = (k - 1.0) * config.grid_gap;
        GridLayout {
            width,
            height,
            variables,
            subplot_width: ((width - config.margin_left - gaps) / k).round(),
            subplot_height: ((height - config.margin_bottom - gaps) / k).round(),
            padding: config.subplot_padding,
            gap: config.grid_gap,
            margin_left: config.margin_left,
        }
    }

    /// Histogram bins per diagonal cell: more width, more bins.
    pub fn bin_count(&self, config: &PairGridConfig) -> usize {
        let bins = (self.subplot_width / config.pixels_per_bin).round();
        if bins.is_finite() && bins > 0.0 {
            (bins as usize).max(config.min_bins)
        } else {
            config.min_bins
        }
    }

    pub fn is_last_row(&self, row: usize) -> bool {
        row + 1 == self.variables
    }

    /// Top-left corner of a subplot's plotting area.
    pub fn origin(&self, column: usize, row: usize) -> (f64, f64) {
        let (c, r) = (column as f64, row as f64);
        (
            (self.margin_left + c * self.subplot_width + c * self.gap).round(),
            (r * self.subplot_height + r * self.gap).round(),
        )
    }

    /// Pixel range for x values inside a subplot.
    pub fn x_range(&self) -> (f64, f64) {
        (self.padding, self.subplot_width - self.padding)
    }

    /// Pixel range for y values inside a subplot; larger values sit higher.
    pub fn y_range(&self) -> (f64, f64) {
        (self.subplot_height - self.padding, self.padding)
    }

    /// Invisible hover target: the subplot plus half the surrounding gap
    /// (and the label margin for the first column).
    pub fn hover_area(&self, column: usize, row: usize) -> Rect {
        let first_column = column == 0;
        let first_row = row == 0;
        let (c, r) = (column as f64, row as f64);
        let half_gap = self.gap / 2.0;
        Rect {
            x: ((if first_column { 0.0 } else { self.margin_left })
                + c * self.subplot_width
                + c * self.gap
                - if first_column { 0.0 } else { half_gap })
            .round(),
            y: (r * self.subplot_height + r * self.gap - if first_row { 0.0 } else { half_gap })
                .round(),
            width: (self.subplot_width
                + if first_column { self.margin_left } else { 0.0 }
                + if first_column { half_gap } else { self.gap })
            .round(),
            height: (self.subplot_height
                + self.padding
                + if first_row { half_gap } else { self.gap })
            .round(),
        }
    }

    /// Subplot whose hover area contains `(x, y)`.  Neighbouring areas
    /// overlap; the one drawn last wins.
    pub fn subplot_at(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        for column in (0..self.variables).rev() {
            for row in (0..self.variables).rev() {
                let area = self.hover_area(column, row);
                if x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
                {
                    return Some((column, row));
                }
            }
        }
        None
    }

    /// Where a row's rotated label is anchored.
    pub fn row_label_anchor(&self, row: usize) -> (f64, f64) {
        let r = row as f64;
        (
            self.padding,
            (r * self.subplot_height + r * self.gap + self.subplot_height / 2.0).round(),
        )
    }

    /// Where a column's label is anchored, along the bottom edge.
    pub fn column_label_anchor(&self, column: usize) -> (f64, f64) {
        let c = column as f64;
        (
            (self.margin_left + c * self.subplot_width + c * self.gap + self.subplot_width / 2.0)
                .round(),
            self.height - 4.0,
        )
    }
}
