//! layout-worker — runs the layout scheduler over a graph file.
//!
//! Loads a graph, binds every connected component to the configured
//! algorithm, drains progress updates until the layout settles (converged
//! or finished), then prints component bounding boxes and scheduler
//! metrics.

use std::fs;
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info, warn};

use tangle_graph::{GraphStore, NodePositions};
use tangle_layout::{
    bounding_box, DefaultLayoutFactory, LayoutConfig, LayoutScheduler, ProgressSink,
};

/// Graph layout worker — iterative force-directed layout per component.
#[derive(Parser, Debug)]
#[command(name = "layout-worker", version, about)]
struct Cli {
    /// Path to the graph JSON file: {"nodes": N, "edges": [[a, b], ...]}.
    #[arg(long, env = "LAYOUT_GRAPH")]
    graph: String,

    /// Path to a layout.toml config file.
    #[arg(long, env = "LAYOUT_CONFIG")]
    config: Option<String>,

    /// Give up after this many seconds even if the layout has not settled.
    #[arg(long, env = "LAYOUT_TIMEOUT", default_value_t = 30)]
    timeout: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let raw = fs::read_to_string(&cli.graph)
        .with_context(|| format!("reading graph file {}", cli.graph))?;
    let graph = GraphStore::from_json_str(&raw).context("parsing graph file")?;

    let config = match &cli.config {
        Some(path) => match LayoutConfig::from_toml_path(path) {
            Ok(cfg) => {
                info!(path = %path, "loaded layout config");
                cfg
            }
            Err(e) => {
                warn!(error = %e, path = %path, "failed to load config, using defaults");
                LayoutConfig::default()
            }
        },
        None => LayoutConfig::default(),
    };

    let components = graph.components();
    info!(
        nodes = graph.node_count(),
        components = components.len(),
        algorithm = ?config.algorithm,
        "graph loaded"
    );

    let positions = Arc::new(NodePositions::new(graph.node_count()));
    let (progress, progress_rx) = ProgressSink::channel();
    let factory = DefaultLayoutFactory::new(
        components.iter().cloned(),
        Arc::clone(&positions),
        config,
        progress,
    );

    let scheduler = LayoutScheduler::new(Box::new(factory));
    for view in &components {
        scheduler.add(view.id());
    }

    // Drain progress until the scheduler settles: parked on convergence,
    // stopped naturally, or out of time.
    let deadline = Instant::now() + Duration::from_secs(cli.timeout);
    loop {
        match progress_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(update) if update.percent >= 0 => {
                debug!(component = %update.component, percent = update.percent, "progress");
            }
            Ok(_) => {}
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        if scheduler.is_paused() || scheduler.is_stopped() {
            break;
        }
        if Instant::now() >= deadline {
            warn!(timeout = cli.timeout, "layout did not settle in time");
            break;
        }
    }

    // Quiesce the worker so the positions read below are final.
    scheduler.pause_and_wait();

    for view in &components {
        match bounding_box(view, &positions) {
            Some(bbox) => info!(
                component = %view.id(),
                nodes = view.node_count(),
                min = ?bbox.min(),
                max = ?bbox.max(),
                "component bounds"
            ),
            None => warn!(component = %view.id(), "component has no nodes"),
        }
    }

    let metrics = scheduler.metrics();
    println!("{}", serde_json::to_string_pretty(&metrics)?);

    scheduler.stop();
    info!("layout-worker exited cleanly");
    Ok(())
}
