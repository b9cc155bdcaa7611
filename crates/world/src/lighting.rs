//! Incremental bulk block-light propagation.
//!
//! A batch of [`BlockChange`]s is relit in two relaxation passes. The decrease
//! pass clears every voxel whose light may have been sourced through a changed
//! position, walking outwards while values fall by exactly one per step. The
//! increase pass then refills from every surviving light on the edge of the
//! cleared region, from emitters inside it, and from the changed positions,
//! always expanding the brightest candidate first so each voxel settles the
//! first time it is raised.
//!
//! The fixed point reached is unique, so the result depends only on the net
//! change per position, never on the order records appear in the batch.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};
use voxlight_core::{BlockPos, MAX_LIGHT};

use crate::block::{can_cross, Block};
use crate::change::{BlockChange, ChangeBatch};
use crate::frontier::{DecreaseFrontier, IncreaseFrontier};
use crate::view::LightingWorldView;

/// Summary of one propagation call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LightUpdate {
    /// Positions whose stored light differs from before the call, sorted.
    pub changed: Vec<BlockPos>,
    /// Positions that seeded the passes after duplicate resolution.
    pub seeds: usize,
    /// Frontier entries drained by the decrease pass.
    pub decrease_visits: usize,
    /// Frontier entries drained by the increase pass.
    pub increase_visits: usize,
}

impl LightUpdate {
    /// Total frontier entries drained by both passes.
    pub fn nodes_processed(&self) -> usize {
        self.decrease_visits + self.increase_visits
    }

    /// True when no light value changed.
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Relights a world view after batches of block substitutions.
///
/// The host writes the new blocks into its storage first, then hands the
/// matching change records to [`BulkLightPropagator::process`].
pub struct BulkLightPropagator<'w, W: LightingWorldView + ?Sized> {
    world: &'w mut W,
}

impl<'w, W: LightingWorldView + ?Sized> BulkLightPropagator<'w, W> {
    pub fn new(world: &'w mut W) -> Self {
        Self { world }
    }

    /// Relight after a single substitution.
    pub fn process_change(&mut self, change: BlockChange) -> LightUpdate {
        self.process(&[change])
    }

    /// Relight after a batch of substitutions.
    pub fn process(&mut self, changes: &[BlockChange]) -> LightUpdate {
        let batch = ChangeBatch::from_changes(changes);
        if batch.is_empty() {
            trace!(records = changes.len(), "light batch has no effective change");
            return LightUpdate::default();
        }

        let span = tracing::debug_span!("bulk_light", records = changes.len(), seeds = batch.len());
        let _guard = span.enter();

        let previous: HashMap<BlockPos, Block> =
            changes.iter().rev().map(|c| (c.pos, c.from)).collect();
        let mut pass = Relight {
            world: &mut *self.world,
            previous,
            original: HashMap::new(),
            decrease_visits: 0,
            increase_visits: 0,
        };

        let deferred = pass.decrease(&batch);
        trace!(
            visits = pass.decrease_visits,
            deferred = deferred.len(),
            "decrease pass drained"
        );
        pass.increase(&batch, deferred);
        trace!(visits = pass.increase_visits, "increase pass drained");

        let update = pass.finish(batch.len());
        debug!(
            changed = update.changed.len(),
            nodes = update.nodes_processed(),
            "light batch settled"
        );
        update
    }
}

/// State of one `process` call.
struct Relight<'a, W: LightingWorldView + ?Sized> {
    world: &'a mut W,
    /// Blocks held before the batch, for changed positions only.
    previous: HashMap<BlockPos, Block>,
    /// Light held before the batch, for every position written so far.
    original: HashMap<BlockPos, u8>,
    decrease_visits: usize,
    increase_visits: usize,
}

impl<W: LightingWorldView + ?Sized> Relight<'_, W> {
    fn store(&mut self, pos: BlockPos, light: u8) {
        let before = self.world.light_at(pos);
        self.original.entry(pos).or_insert(before);
        self.world.set_light_at(pos, light);
    }

    fn previous_block(&self, pos: BlockPos) -> Block {
        self.previous
            .get(&pos)
            .copied()
            .unwrap_or_else(|| self.world.block_at(pos))
    }

    /// Clear light that may have flowed out of the decrease seeds.
    ///
    /// Returns the positions the increase pass must revisit: every cleared
    /// voxel plus every lit neighbour of one that was left alone.
    fn decrease(&mut self, batch: &ChangeBatch) -> Vec<BlockPos> {
        let mut frontier = DecreaseFrontier::new();
        let mut deferred = Vec::new();

        for pos in batch.decrease_seeds() {
            let old = self.world.light_at(pos);
            if old > 0 {
                self.store(pos, 0);
                frontier.push(pos, old);
            }
        }

        while let Some(node) = frontier.pop() {
            self.decrease_visits += 1;
            let block = self.previous_block(node.pos);
            for (side, neighbor) in node.pos.neighbors() {
                let light = self.world.light_at(neighbor);
                if light == 0 {
                    continue;
                }
                // Only faces light could cross before the batch can carry
                // light that is now stale.
                if !can_cross(&block, &self.previous_block(neighbor), side) {
                    continue;
                }
                if light + 1 == node.level {
                    self.store(neighbor, 0);
                    frontier.push(neighbor, light);
                }
                deferred.push(neighbor);
            }
        }

        deferred
    }

    /// Raise light back to the fixed point.
    ///
    /// A position's light is stored when its entry is queued, so each entry
    /// carries the value it wrote. An entry whose position has since been
    /// raised further is stale and skipped; the rest spread exactly once.
    fn increase(&mut self, batch: &ChangeBatch, deferred: Vec<BlockPos>) {
        let mut frontier = IncreaseFrontier::new();
        let mut seeded = HashSet::new();
        let seeds = batch.seeds().iter().map(|seed| seed.pos);
        for pos in seeds.chain(deferred) {
            if !seeded.insert(pos) {
                continue;
            }
            let candidate = self.candidate(pos);
            if candidate > self.world.light_at(pos) {
                self.store(pos, candidate);
            }
            frontier.push(pos, candidate);
        }

        while let Some(node) = frontier.pop() {
            self.increase_visits += 1;
            if node.level != self.world.light_at(node.pos) {
                continue;
            }

            let spread = node.level - 1;
            if spread == 0 {
                continue;
            }
            let block = self.world.block_at(node.pos);
            for (side, neighbor) in node.pos.neighbors() {
                if self.world.light_at(neighbor) >= spread {
                    continue;
                }
                if can_cross(&block, &self.world.block_at(neighbor), side) {
                    self.store(neighbor, spread);
                    frontier.push(neighbor, spread);
                }
            }
        }
    }

    /// Best level `pos` can currently justify: its stored light, its own
    /// emission, or a crossable neighbour's light minus one.
    fn candidate(&self, pos: BlockPos) -> u8 {
        let block = self.world.block_at(pos);
        let mut best = self.world.light_at(pos).max(block.luminance());
        for (side, neighbor) in pos.neighbors() {
            let light = self.world.light_at(neighbor);
            if light <= best + 1 {
                continue;
            }
            if can_cross(&self.world.block_at(neighbor), &block, side.reverse()) {
                best = light - 1;
            }
        }
        best.min(MAX_LIGHT)
    }

    fn finish(self, seeds: usize) -> LightUpdate {
        let mut changed: Vec<BlockPos> = self
            .original
            .iter()
            .filter(|(pos, before)| self.world.light_at(**pos) != **before)
            .map(|(pos, _)| *pos)
            .collect();
        changed.sort_unstable();
        LightUpdate {
            changed,
            seeds,
            decrease_visits: self.decrease_visits,
            increase_visits: self.increase_visits,
        }
    }
}
