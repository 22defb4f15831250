// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

/// One histogram bar covering `[x0, x1)`; the last bar also holds `x1`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Bin {
    pub x0: f64,
    pub x1: f64,
    pub count: usize,
}

/// Count `values` into `n_bins` equal-width bins spanning `domain`.  Values
/// outside the domain (and non-finite values) are ignored.  A zero-width
/// domain puts every matching value in the first bin.
pub fn histogram(values: &[f64], domain: (f64, f64), n_bins: usize) -> Vec<Bin> {
    let n_bins = n_bins.max(1);
    let (lo, hi) = domain;
    let step = (hi - lo) / n_bins as f64;

    let mut bins: Vec<Bin> = (0..n_bins)
        .map(|i| Bin {
            x0: lo + i as f64 * step,
            x1: if i + 1 == n_bins {
                hi
            } else {
                lo + (i + 1) as f64 * step
            },
            count: 0,
        })
        .collect();

    for &value in values {
        if !value.is_finite() || value < lo || value > hi {
            continue;
        }
        let index = if step > 0.0 {
            (((value - lo) / step).floor() as usize).min(n_bins - 1)
        } else {
            0
        };
        bins[index].count += 1;
    }
    bins
}

/// Largest bin count across several histograms.
pub fn max_count<'a>(histograms: impl IntoIterator<Item = &'a [Bin]>) -> usize {
    histograms
        .into_iter()
        .flat_map(|bins| bins.iter().map(|b| b.count))
        .max()
        .unwrap_or(0)
}
