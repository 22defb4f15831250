// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

/// Maps a closed data interval linearly onto a pixel interval.  Values
/// outside the domain are clamped.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
    round: bool,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        LinearScale {
            domain,
            range,
            round: false,
        }
    }

    /// Snap outputs to whole pixels.
    pub fn rounded(mut self) -> Self {
        self.round = true;
        self
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let t = if d1 == d0 {
            // a degenerate domain maps everything to the middle
            0.5
        } else {
            ((value - d0) / (d1 - d0)).clamp(0.0, 1.0)
        };
        let out = r0 + t * (r1 - r0);
        if self.round { out.round() } else { out }
    }
}

/// Smallest and largest finite value, or `None` if there are none.
pub fn extent(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Tick label with one decimal place.
pub fn format_tick(value: f64) -> String {
    let s = format!("{value:.1}");
    if s == "-0.0" { "0.0".to_owned() } else { s }
}
