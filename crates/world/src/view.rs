use voxlight_core::BlockPos;

use crate::block::Block;

/// The mutable surface light propagation reads and writes.
///
/// Hosts implement this over whatever voxel storage they own. The propagator
/// never changes blocks; it reads them and reads/writes light. Every position
/// must resolve to some block and light value (air and 0 for empty space).
pub trait LightingWorldView {
    /// Block currently stored at `pos`.
    fn block_at(&self, pos: BlockPos) -> Block;

    /// Light level currently stored at `pos`.
    fn light_at(&self, pos: BlockPos) -> u8;

    /// Store a light level at `pos`. Values above `MAX_LIGHT` must be clamped.
    fn set_light_at(&mut self, pos: BlockPos, light: u8);
}

impl<W: LightingWorldView + ?Sized> LightingWorldView for &mut W {
    fn block_at(&self, pos: BlockPos) -> Block {
        (**self).block_at(pos)
    }

    fn light_at(&self, pos: BlockPos) -> u8 {
        (**self).light_at(pos)
    }

    fn set_light_at(&mut self, pos: BlockPos, light: u8) {
        (**self).set_light_at(pos, light)
    }
}
