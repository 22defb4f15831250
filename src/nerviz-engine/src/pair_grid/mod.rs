// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Scatterplot matrix of a sampled population.
//!
//! [`PairGrid`] owns one population drawn from a [`SamplingGraph`] and
//! renders it as a grid.  Hovering a subplot highlights both of its nodes
//! in the graph, so any other view bound to the same graph follows along.
//! Changing a distribution or coefficient marks the population stale until
//! it is resampled.

pub mod config;
pub mod histogram;
pub mod layout;
pub mod render;
pub mod scale;

use std::cell::Cell;
use std::mem;
use std::rc::Rc;

use log::debug;
use rand::Rng;

use crate::common::Result;
use crate::graph::{NodeId, SubscriptionId, Topic};
use crate::sampling::{SamplingGraph, Samples};
use crate::sampling_err;

pub use self::config::PairGridConfig;
pub use self::histogram::{Bin, histogram};
pub use self::layout::{GridLayout, Rect};
pub use self::render::{GridHighlight, Series, render_pair_grid};
pub use self::scale::{LinearScale, extent};

pub struct PairGrid {
    config: PairGridConfig,
    width: Option<f64>,
    height: Option<f64>,
    title: Option<String>,
    samples: Option<Samples>,
    stale: Rc<Cell<bool>>,
    highlight: GridHighlight,
    /// Highlight state of the hovered nodes from before the hover.
    restore: Vec<(NodeId, bool)>,
    subscription: Option<SubscriptionId>,
}

impl PairGrid {
    /// Attach to `graph` and draw the first population.
    pub fn mount<R: Rng + ?Sized>(
        graph: &mut SamplingGraph,
        config: PairGridConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let samples = graph.sample(config.sample_count, rng)?;
        let stale = Rc::new(Cell::new(false));
        let subscription =
            graph.subscribe_weak(Topic::Parameters, &stale, |flag: &Cell<bool>, _event, _view| {
                flag.set(true);
            });
        Ok(PairGrid {
            config,
            width: None,
            height: None,
            title: None,
            samples: Some(samples),
            stale,
            highlight: GridHighlight::default(),
            restore: Vec::new(),
            subscription: Some(subscription),
        })
    }

    pub fn unmount(&mut self, graph: &mut SamplingGraph) {
        if let Some(id) = self.subscription.take() {
            graph.unsubscribe(id);
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = Some(width);
        self.height = Some(height);
    }

    pub fn samples(&self) -> Option<&Samples> {
        self.samples.as_ref()
    }

    /// Whether sampling parameters changed since the population was drawn.
    pub fn is_stale(&self) -> bool {
        self.stale.get()
    }

    /// Draw a fresh population with the graph's current parameters.
    pub fn resample<R: Rng + ?Sized>(&mut self, graph: &SamplingGraph, rng: &mut R) -> Result<()> {
        let samples = graph.sample(self.config.sample_count, rng)?;
        debug!(
            "resampled {} draws for {} nodes",
            samples.count(),
            graph.node_count()
        );
        self.samples = Some(samples);
        self.stale.set(false);
        Ok(())
    }

    /// Emphasize subplot `(column, row)` and dim the others; `None` clears.
    pub fn set_highlight_index(&mut self, index: Option<(usize, usize)>) {
        self.highlight.index = index;
    }

    pub fn highlight(&self) -> GridHighlight {
        self.highlight
    }

    /// Nodes in grid order: graph order, restricted to sampled nodes.
    fn grid_nodes(&self, graph: &SamplingGraph) -> Vec<NodeId> {
        let Some(samples) = self.samples.as_ref() else {
            return Vec::new();
        };
        graph
            .node_ids()
            .into_iter()
            .filter(|id| samples.get(*id).is_some())
            .collect()
    }

    /// Pointer entered subplot `(column, row)`: highlight both of its nodes
    /// and its row and column labels.
    pub fn hover(&mut self, graph: &mut SamplingGraph, column: usize, row: usize) -> Result<()> {
        self.unhover(graph)?;
        let nodes = self.grid_nodes(graph);
        let (Some(&x), Some(&y)) = (nodes.get(column), nodes.get(row)) else {
            return Ok(());
        };
        self.highlight.hovered = Some((column, row));
        for id in [x, y] {
            if self.restore.iter().any(|(seen, _)| *seen == id) {
                continue;
            }
            let was = graph.get_node(id).is_some_and(|n| n.is_highlighted());
            self.restore.push((id, was));
            graph.set_highlighted(id, true)?;
        }
        Ok(())
    }

    /// Pointer left the hovered subplot.  Nodes go back to the highlight
    /// they had before the hover, so highlights set elsewhere survive.
    pub fn unhover(&mut self, graph: &mut SamplingGraph) -> Result<()> {
        self.highlight.hovered = None;
        for (id, was) in mem::take(&mut self.restore) {
            graph.set_highlighted(id, was)?;
        }
        Ok(())
    }

    /// Subplot under `(x, y)`, once the grid has a size.
    pub fn subplot_at(&self, graph: &SamplingGraph, x: f64, y: f64) -> Option<(usize, usize)> {
        let (width, height) = (self.width?, self.height?);
        let layout = GridLayout::new(&self.config, width, height, self.grid_nodes(graph).len());
        layout.subplot_at(x, y)
    }

    /// The grid as SVG.  `Ok(None)` while the size is unknown or nothing has
    /// been sampled yet; an error if the population holds no draws.
    pub fn render_svg(&self, graph: &SamplingGraph) -> Result<Option<String>> {
        let (Some(width), Some(height), Some(samples)) = (self.width, self.height, &self.samples)
        else {
            return Ok(None);
        };
        if samples.is_empty() {
            return sampling_err!(EmptySamples, "no draws to plot".to_owned());
        }

        let nodes = self.grid_nodes(graph);
        let series: Vec<Series<'_>> = nodes
            .iter()
            .filter_map(|id| {
                Some(Series {
                    label: graph.get_node(*id)?.label(),
                    values: samples.get(*id)?,
                })
            })
            .collect();
        let layout = GridLayout::new(&self.config, width, height, series.len());
        Ok(Some(render_pair_grid(
            &series,
            &layout,
            &self.config,
            &self.highlight,
            self.title.as_deref(),
        )))
    }
}
