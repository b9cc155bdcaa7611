use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{collections::BTreeSet, fs, path::Path, time::Instant};
use tracing::{debug, info};
use voxlight_assets::BlockRegistry;
use voxlight_core::BlockPos;
use voxlight_testkit::{
    assert_light_consistent, JsonlSink, LightEventRecord, LightingMetrics, MetricsReport,
    MetricsReportBuilder, TestExecutionMetrics, TestResult,
};
use voxlight_world::{
    BlockChange, BlockId, BulkLightPropagator, ChunkStorage, LightUpdate, RegistryWorldView,
};

#[derive(Debug, Deserialize)]
struct ScenarioFile {
    batches: Vec<BatchDef>,
}

#[derive(Debug, Deserialize)]
struct BatchDef {
    #[serde(default)]
    label: Option<String>,
    edits: Vec<EditDef>,
}

#[derive(Debug, Deserialize)]
struct EditDef {
    pos: [i32; 3],
    block: String,
}

/// One block substitution with its name already resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    pub pos: BlockPos,
    pub block: BlockId,
}

/// Edits handed to the propagator in a single call.
#[derive(Debug, Clone)]
pub struct Batch {
    pub label: String,
    pub edits: Vec<Edit>,
}

/// Sequence of edit batches replayed against an initially dark, empty world.
///
/// Scenario files look like
/// `{"batches": [{"label": "torch", "edits": [{"pos": [0, 0, 0], "block": "engine:torch"}]}]}`.
/// `label` is optional; block names resolve through the registry.
#[derive(Debug, Clone)]
pub struct Scenario {
    batches: Vec<Batch>,
}

impl Scenario {
    /// Load a scenario from a JSON file on disk.
    pub fn from_path(path: &Path, registry: &BlockRegistry) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        Self::from_str(&contents, registry)
            .with_context(|| format!("Invalid scenario {}", path.display()))
    }

    /// Load a scenario from an in-memory JSON string.
    pub fn from_str(contents: &str, registry: &BlockRegistry) -> Result<Self> {
        let file: ScenarioFile = serde_json::from_str(contents)?;
        if file.batches.is_empty() {
            bail!("scenario contains no batches");
        }

        let mut batches = Vec::with_capacity(file.batches.len());
        for (index, def) in file.batches.into_iter().enumerate() {
            if def.edits.is_empty() {
                bail!("batch {index} contains no edits");
            }
            let edits = def
                .edits
                .iter()
                .map(|edit| {
                    let block = registry
                        .id_by_name(&edit.block)
                        .with_context(|| format!("batch {index}: unknown block `{}`", edit.block))?;
                    Ok(Edit {
                        pos: BlockPos::from(edit.pos),
                        block,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            batches.push(Batch {
                label: def.label.unwrap_or_else(|| format!("batch-{index}")),
                edits,
            });
        }

        Ok(Self { batches })
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }
}

/// Totals for a finished run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub lighting: LightingMetrics,
    /// Positions checked against the fixed-point rule.
    pub positions_checked: usize,
}

/// Drives a chunk store and the propagator through scenario batches.
pub struct ScenarioRunner<'a> {
    registry: &'a BlockRegistry,
    storage: ChunkStorage,
    verify_invariant: bool,
    events: Option<JsonlSink>,
    summary: RunSummary,
}

impl<'a> ScenarioRunner<'a> {
    pub fn new(registry: &'a BlockRegistry, verify_invariant: bool) -> Self {
        Self {
            registry,
            storage: ChunkStorage::new(),
            verify_invariant,
            events: None,
            summary: RunSummary::default(),
        }
    }

    /// Log one JSON line per processed batch.
    pub fn with_events(mut self, sink: JsonlSink) -> Self {
        self.events = Some(sink);
        self
    }

    pub fn storage(&self) -> &ChunkStorage {
        &self.storage
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Replay every batch in order, stopping at the first failure.
    pub fn run(&mut self, scenario: &Scenario) -> Result<()> {
        for (index, batch) in scenario.batches().iter().enumerate() {
            self.run_batch(index, batch)
                .with_context(|| format!("batch {index} ({}) failed", batch.label))?;
        }
        Ok(())
    }

    /// Write the batch's blocks, relight, then check and record the outcome.
    pub fn run_batch(&mut self, index: usize, batch: &Batch) -> Result<LightUpdate> {
        let changes: Vec<BlockChange> = batch
            .edits
            .iter()
            .map(|edit| {
                self.storage
                    .replace_block(edit.pos, edit.block, self.registry)
            })
            .collect();

        let started = Instant::now();
        let update = {
            let mut view = RegistryWorldView::new(&mut self.storage, self.registry);
            BulkLightPropagator::new(&mut view).process(&changes)
        };
        let elapsed = started.elapsed();
        self.summary
            .lighting
            .record(changes.len(), &update, elapsed);

        if self.verify_invariant {
            let positions = neighborhood(
                update
                    .changed
                    .iter()
                    .copied()
                    .chain(batch.edits.iter().map(|edit| edit.pos)),
            );
            self.summary.positions_checked += positions.len();
            let view = RegistryWorldView::new(&mut self.storage, self.registry);
            assert_light_consistent(&view, positions)?;
        }

        if let Some(sink) = self.events.as_mut() {
            sink.write(&LightEventRecord::from_update(
                index,
                &batch.label,
                changes.len(),
                &update,
            ))?;
        }

        info!(
            batch = index,
            label = %batch.label,
            changed = update.changed.len(),
            nodes = update.nodes_processed(),
            "batch relit"
        );
        debug!(elapsed_us = elapsed.as_micros() as u64, "batch timing");
        Ok(update)
    }

    /// Metrics report for the run so far.
    pub fn report(&self, name: &str, result: TestResult, duration_seconds: f64) -> MetricsReport {
        let checked = self.verify_invariant.then_some(self.summary.positions_checked);
        MetricsReportBuilder::new(name)
            .result(result)
            .lighting(self.summary.lighting.clone())
            .execution(TestExecutionMetrics {
                duration_seconds,
                assertions_checked: checked,
                validations_passed: checked.filter(|_| result == TestResult::Pass),
            })
            .build()
    }
}

/// The given positions plus their six neighbours, deduplicated and ordered.
fn neighborhood<I: IntoIterator<Item = BlockPos>>(positions: I) -> BTreeSet<BlockPos> {
    let mut out = BTreeSet::new();
    for pos in positions {
        out.insert(pos);
        out.extend(pos.neighbors().map(|(_, n)| n));
    }
    out
}
