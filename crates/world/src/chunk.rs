use std::fmt;

use voxlight_core::{BlockPos, MAX_LIGHT};

use crate::block::{BlockId, BLOCK_AIR};

/// Chunk edge length in voxels (chunks are cubes).
pub const CHUNK_SIZE: usize = 16;
/// Total voxel count per chunk.
pub const CHUNK_VOLUME: usize = CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE;

/// Chunk-local position (X, Y, Z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalPos {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl LocalPos {
    /// Convert to a linear index within the voxel array.
    pub fn index(self) -> usize {
        debug_assert!(self.x < CHUNK_SIZE);
        debug_assert!(self.y < CHUNK_SIZE);
        debug_assert!(self.z < CHUNK_SIZE);
        (self.y * CHUNK_SIZE + self.z) * CHUNK_SIZE + self.x
    }
}

/// Chunk coordinate in chunk space.
/// Implements Ord for deterministic iteration in BTreeMap/BTreeSet (sorts by x, y, then z).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct ChunkPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Split a world position into its chunk and the offset inside it.
    /// Negative coordinates round towards negative infinity.
    pub fn split(pos: BlockPos) -> (ChunkPos, LocalPos) {
        let size = CHUNK_SIZE as i32;
        let chunk = ChunkPos::new(
            pos.x.div_euclid(size),
            pos.y.div_euclid(size),
            pos.z.div_euclid(size),
        );
        let local = LocalPos {
            x: pos.x.rem_euclid(size) as usize,
            y: pos.y.rem_euclid(size) as usize,
            z: pos.z.rem_euclid(size) as usize,
        };
        (chunk, local)
    }

    /// World position of `local` inside this chunk.
    pub fn world_pos(self, local: LocalPos) -> BlockPos {
        let size = CHUNK_SIZE as i32;
        BlockPos::new(
            self.x * size + local.x as i32,
            self.y * size + local.y as i32,
            self.z * size + local.z as i32,
        )
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Per-voxel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Voxel {
    pub id: BlockId,
    pub light: u8,
}

impl Default for Voxel {
    fn default() -> Self {
        Self {
            id: BLOCK_AIR,
            light: 0,
        }
    }
}

impl Voxel {
    #[inline]
    pub fn is_air(&self) -> bool {
        self.id == BLOCK_AIR
    }
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    /// Dirty flags set whenever chunk data changes.
    pub struct DirtyFlags: u8 {
        const BLOCKS = 0b0000_0001;
        const LIGHT = 0b0000_0010;
    }
}

impl Default for DirtyFlags {
    fn default() -> Self {
        DirtyFlags::empty()
    }
}

/// Chunk storing voxel data plus dirty flags.
pub struct Chunk {
    position: ChunkPos,
    voxels: Vec<Voxel>,
    dirty: DirtyFlags,
}

impl Chunk {
    /// Allocate a fresh chunk filled with dark air.
    pub fn new(position: ChunkPos) -> Self {
        Self {
            position,
            voxels: vec![Voxel::default(); CHUNK_VOLUME],
            dirty: DirtyFlags::empty(),
        }
    }

    #[inline]
    pub fn position(&self) -> ChunkPos {
        self.position
    }

    /// Fetch a voxel copy.
    pub fn voxel(&self, local: LocalPos) -> Voxel {
        self.voxels[local.index()]
    }

    /// Replace the block id, marking `BLOCKS` dirty if it changed.
    pub fn set_block_id(&mut self, local: LocalPos, id: BlockId) {
        let voxel = &mut self.voxels[local.index()];
        if voxel.id != id {
            voxel.id = id;
            self.dirty.insert(DirtyFlags::BLOCKS);
        }
    }

    /// Replace the light level (clamped), marking `LIGHT` dirty if it changed.
    pub fn set_light(&mut self, local: LocalPos, light: u8) {
        let light = light.min(MAX_LIGHT);
        let voxel = &mut self.voxels[local.index()];
        if voxel.light != light {
            voxel.light = light;
            self.dirty.insert(DirtyFlags::LIGHT);
        }
    }

    /// Peek at the dirty flags without clearing them.
    pub fn dirty_flags(&self) -> DirtyFlags {
        self.dirty
    }

    /// Consume and return the dirty flags in `mask`, leaving the others set.
    pub fn take_dirty_flags(&mut self, mask: DirtyFlags) -> DirtyFlags {
        let taken = self.dirty & mask;
        self.dirty.remove(mask);
        taken
    }

    /// True when every voxel is dark air.
    pub fn is_empty(&self) -> bool {
        self.voxels.iter().all(|v| *v == Voxel::default())
    }
}
