//! voxlight - replays block-edit scenarios through the bulk light propagator
//!
//! Headless runner: loads a block pack and a scenario, relights a chunked
//! world batch by batch, checks the lighting fixed point and optionally
//! writes metrics and a JSONL event log.

mod config;
mod scenario;

use anyhow::{Context, Result};
use clap::Parser;
use config::{RunConfig, DEFAULT_BLOCKS_PATH, DEFAULT_CONFIG_PATH};
use scenario::{Scenario, ScenarioRunner};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use voxlight_assets::{registry_from_file, registry_from_str, AssetError, BlockRegistry};
use voxlight_testkit::{JsonlSink, MetricsSink, TestResult};

/// Pack used when no block file exists at the default location.
const BUILTIN_BLOCKS: &str = include_str!("../config/blocks.json");

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay block edits through the bulk light propagator", long_about = None)]
struct Args {
    /// Scenario JSON to replay
    #[arg(short, long)]
    scenario: PathBuf,

    /// Block pack JSON (overrides `blocks_path` from the config file)
    #[arg(short, long)]
    blocks: Option<PathBuf>,

    /// Run config TOML
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Write a metrics report (JSON) here
    #[arg(long)]
    metrics: Option<PathBuf>,

    /// Write one JSON line per batch here
    #[arg(long)]
    events: Option<PathBuf>,

    /// Skip the fixed-point check after each batch
    #[arg(long)]
    no_verify: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // The config may carry the log filter, so read it before tracing exists
    // and report any problem once the subscriber is up.
    let loaded = RunConfig::read(&args.config);
    let default_filter = loaded
        .as_ref()
        .map(|cfg| cfg.log_filter.clone())
        .unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(&default_filter))
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting voxlight v{}", env!("CARGO_PKG_VERSION"));

    let mut config = RunConfig::or_default(&args.config, loaded);
    apply_overrides(&mut config, &args);

    let registry = load_block_registry(&config.blocks_path, args.blocks.is_some())?;
    let scenario = Scenario::from_path(&args.scenario, &registry)?;
    info!(
        batches = scenario.batches().len(),
        blocks = registry.len(),
        "scenario loaded"
    );

    let mut runner = ScenarioRunner::new(&registry, config.verify_invariant);
    if let Some(path) = &config.events_path {
        let sink = JsonlSink::create(path)
            .with_context(|| format!("Failed to create event log {}", path.display()))?;
        runner = runner.with_events(sink);
    }

    let started = Instant::now();
    let outcome = runner.run(&scenario);
    let duration = started.elapsed().as_secs_f64();

    if let Some(path) = &config.metrics_path {
        let result = if outcome.is_ok() {
            TestResult::Pass
        } else {
            TestResult::Fail
        };
        let name = args
            .scenario
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "scenario".to_string());
        let report = runner.report(&name, result, duration);
        MetricsSink::create(path)
            .and_then(|sink| sink.write(&report))
            .with_context(|| format!("Failed to write metrics {}", path.display()))?;
    }
    outcome?;

    let summary = runner.summary();
    println!(
        "{} batches, {} records, {} light changes, {} frontier visits, {} positions verified, {} chunks resident",
        summary.lighting.batches,
        summary.lighting.records,
        summary.lighting.changed_voxels,
        summary.lighting.nodes_processed(),
        summary.positions_checked,
        runner.storage().len()
    );
    Ok(())
}

fn apply_overrides(config: &mut RunConfig, args: &Args) {
    if let Some(path) = &args.blocks {
        config.blocks_path = path.clone();
    }
    if let Some(path) = &args.metrics {
        config.metrics_path = Some(path.clone());
    }
    if let Some(path) = &args.events {
        config.events_path = Some(path.clone());
    }
    if args.no_verify {
        config.verify_invariant = false;
    }
}

/// Load the block pack. A missing file at the default location falls back to
/// the bundled pack; any other failure is an error.
fn load_block_registry(path: &Path, explicit: bool) -> Result<BlockRegistry> {
    match registry_from_file(path) {
        Ok(registry) => Ok(registry),
        Err(AssetError::Io(err))
            if !explicit
                && path == Path::new(DEFAULT_BLOCKS_PATH)
                && err.kind() == std::io::ErrorKind::NotFound =>
        {
            info!("Block pack not found at {}. Using built-in pack", path.display());
            registry_from_str(BUILTIN_BLOCKS).context("Built-in block pack is invalid")
        }
        Err(err) => Err(err).with_context(|| format!("Failed to load blocks from {}", path.display())),
    }
}
