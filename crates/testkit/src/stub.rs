//! Map-backed world view for headless lighting tests.

use std::collections::{BTreeMap, HashMap};

use voxlight_core::{BlockPos, MAX_LIGHT};
use voxlight_world::{Block, BlockChange, LightingWorldView};

/// Unbounded world where unset positions are dark air.
///
/// Only non-air blocks and non-zero light are stored, so `lit()` lists exactly
/// the illuminated voxels.
#[derive(Debug, Clone, Default)]
pub struct StubLightingWorldView {
    blocks: HashMap<BlockPos, Block>,
    light: HashMap<BlockPos, u8>,
}

impl StubLightingWorldView {
    /// Empty, dark world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `block` at `pos` and return the substitution record.
    pub fn set_block(&mut self, pos: BlockPos, block: Block) -> BlockChange {
        let from = if block == Block::AIR {
            self.blocks.remove(&pos)
        } else {
            self.blocks.insert(pos, block)
        };
        BlockChange::new(pos, from.unwrap_or(Block::AIR), block)
    }

    /// Store `block` at every position, returning the records in input order.
    pub fn set_blocks<I>(&mut self, positions: I, block: Block) -> Vec<BlockChange>
    where
        I: IntoIterator<Item = BlockPos>,
    {
        positions
            .into_iter()
            .map(|pos| self.set_block(pos, block))
            .collect()
    }

    /// Positions holding a light-emitting block.
    pub fn emitters(&self) -> impl Iterator<Item = BlockPos> + '_ {
        self.blocks
            .iter()
            .filter(|(_, block)| block.luminance() > 0)
            .map(|(pos, _)| *pos)
    }

    /// Every lit voxel, ordered by position.
    pub fn lit(&self) -> BTreeMap<BlockPos, u8> {
        self.light.iter().map(|(pos, light)| (*pos, *light)).collect()
    }

    /// Number of lit voxels.
    pub fn lit_count(&self) -> usize {
        self.light.len()
    }
}

impl LightingWorldView for StubLightingWorldView {
    fn block_at(&self, pos: BlockPos) -> Block {
        self.blocks.get(&pos).copied().unwrap_or(Block::AIR)
    }

    fn light_at(&self, pos: BlockPos) -> u8 {
        self.light.get(&pos).copied().unwrap_or(0)
    }

    fn set_light_at(&mut self, pos: BlockPos, light: u8) {
        if light == 0 {
            self.light.remove(&pos);
        } else {
            self.light.insert(pos, light.min(MAX_LIGHT));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_positions_are_dark_air() {
        let view = StubLightingWorldView::new();
        assert_eq!(view.block_at(BlockPos::new(9, -9, 9)), Block::AIR);
        assert_eq!(view.light_at(BlockPos::new(9, -9, 9)), 0);
    }

    #[test]
    fn set_block_reports_previous_block() {
        let mut view = StubLightingWorldView::new();
        let torch = Block::light_source(1, 15);
        let first = view.set_block(BlockPos::ZERO, torch);
        assert_eq!(first.from, Block::AIR);
        let second = view.set_block(BlockPos::ZERO, Block::AIR);
        assert_eq!(second.from, torch);
        assert_eq!(view.emitters().count(), 0);
    }

    #[test]
    fn light_writes_clamp_and_forget_darkness() {
        let mut view = StubLightingWorldView::new();
        view.set_light_at(BlockPos::ZERO, 40);
        assert_eq!(view.light_at(BlockPos::ZERO), MAX_LIGHT);
        view.set_light_at(BlockPos::ZERO, 0);
        assert_eq!(view.lit_count(), 0);
    }
}
