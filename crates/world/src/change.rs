//! Block substitution records and their grouping into propagation batches.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use voxlight_core::{BlockPos, Side};

use crate::block::Block;

/// One voxel substitution: `from` was replaced by `to` at `pos`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockChange {
    pub pos: BlockPos,
    pub from: Block,
    pub to: Block,
}

impl BlockChange {
    pub fn new(pos: BlockPos, from: Block, to: Block) -> Self {
        Self { pos, from, to }
    }

    /// How this substitution can move light at its position.
    pub fn classify(&self) -> SeedClass {
        let mut class = SeedClass::empty();
        if self.to.luminance() < self.from.luminance() {
            class |= SeedClass::DECREASE;
        }
        if self.to.luminance() > self.from.luminance() {
            class |= SeedClass::INCREASE;
        }
        for side in Side::ALL {
            match (self.from.is_full_face(side), self.to.is_full_face(side)) {
                (false, true) => class |= SeedClass::DECREASE,
                (true, false) => class |= SeedClass::INCREASE,
                _ => {}
            }
        }
        class
    }
}

bitflags::bitflags! {
    /// Which relaxation passes a changed position seeds.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct SeedClass: u8 {
        /// Less emission or more covered faces: light may only drop here.
        const DECREASE = 0b01;
        /// More emission or fewer covered faces: light may only rise here.
        const INCREASE = 0b10;
    }
}

/// A position's net substitution after duplicate resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seed {
    pub pos: BlockPos,
    pub class: SeedClass,
}

/// The classified seeds of one `process` call.
///
/// When several records target the same position, the first record's `from`
/// and the last record's `to` form the effective change. Substitutions that do
/// not alter luminance or any face are dropped. Seeds are ordered by position.
#[derive(Debug, Clone, Default)]
pub struct ChangeBatch {
    seeds: Vec<Seed>,
}

impl ChangeBatch {
    pub fn from_changes(changes: &[BlockChange]) -> Self {
        let mut effective: BTreeMap<BlockPos, (Block, Block)> = BTreeMap::new();
        for change in changes {
            match effective.entry(change.pos) {
                Entry::Vacant(slot) => {
                    slot.insert((change.from, change.to));
                }
                Entry::Occupied(mut slot) => slot.get_mut().1 = change.to,
            }
        }

        let seeds = effective
            .into_iter()
            .filter_map(|(pos, (from, to))| {
                let class = BlockChange::new(pos, from, to).classify();
                (!class.is_empty()).then_some(Seed { pos, class })
            })
            .collect();
        Self { seeds }
    }

    pub fn seeds(&self) -> &[Seed] {
        &self.seeds
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    /// Positions that seed the decrease pass. The increase pass reseeds
    /// from every position in [`ChangeBatch::seeds`].
    pub fn decrease_seeds(&self) -> impl Iterator<Item = BlockPos> + '_ {
        self.seeds
            .iter()
            .filter(|seed| seed.class.contains(SeedClass::DECREASE))
            .map(|seed| seed.pos)
    }
}
