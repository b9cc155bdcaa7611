use std::collections::BTreeMap;

use voxlight_core::BlockPos;

use crate::block::{Block, BlockId, BlockLookup, BLOCK_AIR};
use crate::change::BlockChange;
use crate::chunk::{Chunk, ChunkPos, DirtyFlags, Voxel};
use crate::view::LightingWorldView;

/// Unbounded in-memory voxel store made of lazily allocated chunks.
/// Uses BTreeMap for deterministic iteration order.
#[derive(Default)]
pub struct ChunkStorage {
    chunks: BTreeMap<ChunkPos, Chunk>,
}

impl ChunkStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of resident chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns true when no chunks are currently stored.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Obtain mutable access to a chunk, creating it if necessary.
    pub fn ensure_chunk(&mut self, pos: ChunkPos) -> &mut Chunk {
        self.chunks.entry(pos).or_insert_with(|| Chunk::new(pos))
    }

    /// Attempt to fetch a chunk immutably.
    pub fn get(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&pos)
    }

    /// Fetch a chunk mutably (without creating it).
    pub fn get_mut(&mut self, pos: ChunkPos) -> Option<&mut Chunk> {
        self.chunks.get_mut(&pos)
    }

    /// Iterate over currently resident chunk positions.
    pub fn iter_positions(&self) -> impl Iterator<Item = ChunkPos> + '_ {
        self.chunks.keys().copied()
    }

    /// Voxel at a world position; absent chunks read as dark air.
    pub fn voxel_at(&self, pos: BlockPos) -> Voxel {
        let (chunk, local) = ChunkPos::split(pos);
        self.chunks
            .get(&chunk)
            .map(|c| c.voxel(local))
            .unwrap_or_default()
    }

    pub fn block_id_at(&self, pos: BlockPos) -> BlockId {
        self.voxel_at(pos).id
    }

    pub fn light_at(&self, pos: BlockPos) -> u8 {
        self.voxel_at(pos).light
    }

    /// Write a block id. Writing air into an absent chunk allocates nothing.
    pub fn set_block_id_at(&mut self, pos: BlockPos, id: BlockId) {
        let (chunk, local) = ChunkPos::split(pos);
        match self.chunks.get_mut(&chunk) {
            Some(c) => c.set_block_id(local, id),
            None if id == BLOCK_AIR => {}
            None => self.ensure_chunk(chunk).set_block_id(local, id),
        }
    }

    /// Write a light level. Writing darkness into an absent chunk allocates nothing.
    pub fn set_light_at(&mut self, pos: BlockPos, light: u8) {
        let (chunk, local) = ChunkPos::split(pos);
        match self.chunks.get_mut(&chunk) {
            Some(c) => c.set_light(local, light),
            None if light == 0 => {}
            None => self.ensure_chunk(chunk).set_light(local, light),
        }
    }

    /// Store `id` at `pos` and describe the substitution for the propagator.
    pub fn replace_block(
        &mut self,
        pos: BlockPos,
        id: BlockId,
        lookup: &dyn BlockLookup,
    ) -> BlockChange {
        let from = lookup.block(self.block_id_at(pos));
        self.set_block_id_at(pos, id);
        BlockChange::new(pos, from, lookup.block(id))
    }

    /// Positions of chunks carrying any of `mask`, clearing those flags.
    pub fn take_dirty_chunks(&mut self, mask: DirtyFlags) -> Vec<ChunkPos> {
        self.chunks
            .values_mut()
            .filter_map(|chunk| {
                (!chunk.take_dirty_flags(mask).is_empty()).then(|| chunk.position())
            })
            .collect()
    }
}

/// [`LightingWorldView`] over a [`ChunkStorage`] whose ids resolve through a
/// block registry.
pub struct RegistryWorldView<'a> {
    storage: &'a mut ChunkStorage,
    lookup: &'a dyn BlockLookup,
}

impl<'a> RegistryWorldView<'a> {
    pub fn new(storage: &'a mut ChunkStorage, lookup: &'a dyn BlockLookup) -> Self {
        Self { storage, lookup }
    }
}

impl LightingWorldView for RegistryWorldView<'_> {
    fn block_at(&self, pos: BlockPos) -> Block {
        self.lookup.block(self.storage.block_id_at(pos))
    }

    fn light_at(&self, pos: BlockPos) -> u8 {
        self.storage.light_at(pos)
    }

    fn set_light_at(&mut self, pos: BlockPos, light: u8) {
        self.storage.set_light_at(pos, light);
    }
}
