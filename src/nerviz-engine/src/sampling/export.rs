// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

#[cfg(feature = "file_io")]
use std::io;

#[cfg(feature = "file_io")]
use crate::common::{Error, ErrorCode, ErrorKind, Result};
use crate::sampling::graph::{SamplingGraph, Samples};

/// Sampled values labeled by node, in graph order.  Nodes without draws
/// are skipped.
pub fn labeled_columns<'a>(graph: &'a SamplingGraph, samples: &'a Samples) -> Vec<(&'a str, &'a [f64])> {
    graph
        .nodes()
        .filter_map(|node| Some((node.label(), samples.get(node.id())?)))
        .collect()
}

/// One column per node, one row per joint sample, with a header row of
/// node labels.
#[cfg(feature = "file_io")]
pub fn write_csv<W: io::Write>(
    graph: &SamplingGraph,
    samples: &Samples,
    writer: W,
    delimiter: u8,
) -> Result<()> {
    let to_err = |err: csv::Error| {
        Error::new(ErrorKind::Sampling, ErrorCode::Generic, Some(err.to_string()))
    };

    let columns = labeled_columns(graph, samples);
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    wtr.write_record(columns.iter().map(|(label, _)| *label))
        .map_err(to_err)?;
    for slot in 0..samples.count() {
        wtr.write_record(
            columns
                .iter()
                .map(|(_, values)| values.get(slot).map(f64::to_string).unwrap_or_default()),
        )
        .map_err(to_err)?;
    }
    wtr.flush()
        .map_err(|err| Error::new(ErrorKind::Sampling, ErrorCode::Generic, Some(err.to_string())))
}
