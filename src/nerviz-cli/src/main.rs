// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use nerviz_engine::sampling::{labeled_columns, write_csv};
use nerviz_engine::{
    ForceConfig, ForceGraph, GraphFile, PairGrid, PairGridConfig, SamplingGraph,
};

#[derive(Parser)]
#[command(name = "nerviz")]
#[command(version)]
#[command(about = "Sample and draw graphical models described in JSON")]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print node labels in topological order
    Order {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Draw joint samples from every node
    Sample {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[command(flatten)]
        draws: Draws,
        /// Write CSV with one column per node instead of JSON
        #[arg(long)]
        csv: bool,
    },
    /// Run the force layout to rest and write the drawing
    Layout {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[command(flatten)]
        canvas: Canvas,
        /// Upper bound on simulation frames
        #[arg(long, default_value_t = 1000)]
        ticks: usize,
        /// Shortest link rest length, before label padding
        #[arg(long, value_name = "D")]
        min_distance: Option<f64>,
        /// Rasterize to PNG
        #[arg(long)]
        png: bool,
    },
    /// Sample and write a scatterplot matrix of the population
    PairGrid {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[command(flatten)]
        draws: Draws,
        #[command(flatten)]
        canvas: Canvas,
    },
    /// Print the JSON Schema of the graph file format
    #[cfg(feature = "schema")]
    Schema,
}

#[derive(Args)]
struct Draws {
    /// Number of joint samples
    #[arg(short = 'n', long = "count", default_value_t = 30)]
    count: usize,
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Args)]
struct Canvas {
    #[arg(long, default_value_t = 600.0)]
    width: f64,
    #[arg(long, default_value_t = 400.0)]
    height: f64,
    /// Write here instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Command::Order { file } => order(&file),
        Command::Sample { file, draws, csv } => sample(&file, &draws, csv),
        Command::Layout {
            file,
            canvas,
            ticks,
            min_distance,
            png,
        } => layout(&file, &canvas, ticks, min_distance, png),
        Command::PairGrid {
            file,
            draws,
            canvas,
        } => pair_grid(&file, &draws, &canvas),
        #[cfg(feature = "schema")]
        Command::Schema => {
            let schema = nerviz_engine::json::generate_schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}

fn open_graph(path: &Path) -> Result<SamplingGraph> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let graph_file: GraphFile = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?;
    let (graph, keys) = graph_file
        .into_sampling_graph()
        .with_context(|| format!("building graph from {}", path.display()))?;
    debug!(
        "loaded {} nodes ({} keys) and {} edges from {}",
        graph.node_count(),
        keys.len(),
        graph.edge_count(),
        path.display()
    );
    Ok(graph)
}

fn write_output(output: Option<&Path>, contents: &[u8]) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
            info!("wrote {} bytes to {}", contents.len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(contents)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn order(path: &Path) -> Result<()> {
    let graph = open_graph(path)?;
    let sorted = graph.get_sorted_nodes().context("ordering nodes")?;
    for id in sorted {
        if let Some(node) = graph.get_node(id) {
            println!("{}", node.label());
        }
    }
    Ok(())
}

fn sample(path: &Path, draws: &Draws, csv: bool) -> Result<()> {
    let graph = open_graph(path)?;
    let mut rng = StdRng::seed_from_u64(draws.seed);
    let samples = graph.sample(draws.count, &mut rng).context("sampling")?;

    if csv {
        write_csv(&graph, &samples, io::stdout().lock(), b',')?;
        return Ok(());
    }

    let mut columns = serde_json::Map::new();
    for (label, values) in labeled_columns(&graph, &samples) {
        columns.insert(label.to_owned(), serde_json::json!(values));
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::Value::Object(columns))?
    );
    Ok(())
}

fn layout(
    path: &Path,
    canvas: &Canvas,
    ticks: usize,
    min_distance: Option<f64>,
    png: bool,
) -> Result<()> {
    let mut graph = open_graph(path)?;
    let defaults = ForceConfig::default();
    let config = ForceConfig {
        width: Some(canvas.width),
        height: Some(canvas.height),
        enable_simulation: true,
        min_node_distance: min_distance.unwrap_or(defaults.min_node_distance),
        ..defaults
    };

    let mut force_graph = ForceGraph::mount(&mut graph, config);
    let ran = force_graph.run_to_rest(ticks);
    if force_graph.is_running() {
        info!("stopped after {ran} ticks before the layout settled");
    } else {
        debug!("layout settled after {ran} ticks");
    }
    let Some(svg) = force_graph.render_svg() else {
        bail!("nothing was drawn");
    };
    force_graph.unmount(&mut graph);

    if png {
        return write_output(canvas.output.as_deref(), &rasterize(&svg)?);
    }
    write_output(canvas.output.as_deref(), svg.as_bytes())
}

#[cfg(feature = "png_render")]
fn rasterize(svg: &str) -> Result<Vec<u8>> {
    use nerviz_engine::render_png::{PngRenderOpts, svg_to_png};

    Ok(svg_to_png(svg, &PngRenderOpts::default())?)
}

#[cfg(not(feature = "png_render"))]
fn rasterize(_svg: &str) -> Result<Vec<u8>> {
    bail!("PNG output needs nerviz built with the png_render feature")
}

fn pair_grid(path: &Path, draws: &Draws, canvas: &Canvas) -> Result<()> {
    let mut graph = open_graph(path)?;
    let mut rng = StdRng::seed_from_u64(draws.seed);
    let config = PairGridConfig {
        sample_count: draws.count,
        ..PairGridConfig::default()
    };

    let mut grid = PairGrid::mount(&mut graph, config, &mut rng).context("sampling")?;
    grid.set_title(graph.describe());
    grid.resize(canvas.width, canvas.height);
    let svg = grid.render_svg(&graph)?;
    grid.unmount(&mut graph);

    let Some(svg) = svg else {
        bail!("nothing was drawn");
    };
    write_output(canvas.output.as_deref(), svg.as_bytes())
}
