//! Lighting-relevant block metadata.
//!
//! A [`Block`] is the flat, copyable view of a block type that the light
//! propagator consumes: how much light it emits and which of its faces are
//! fully covered. Everything else about a block type lives in the registry.

use voxlight_core::{Side, MAX_LIGHT};

/// Block identifier referencing the registry.
pub type BlockId = u16;

/// Reserved ID for air.
pub const BLOCK_AIR: BlockId = 0;

bitflags::bitflags! {
    /// Set of faces, one bit per [`Side`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FaceMask: u8 {
        const UP = 1 << Side::Up.index();
        const DOWN = 1 << Side::Down.index();
        const NORTH = 1 << Side::North.index();
        const SOUTH = 1 << Side::South.index();
        const EAST = 1 << Side::East.index();
        const WEST = 1 << Side::West.index();
    }
}

impl FaceMask {
    /// Mask holding only `side`.
    pub const fn from_side(side: Side) -> Self {
        Self::from_bits_truncate(1 << side.index())
    }

    /// Whether `side` is in the mask.
    pub const fn has(self, side: Side) -> bool {
        self.contains(Self::from_side(side))
    }
}

impl FromIterator<Side> for FaceMask {
    fn from_iter<I: IntoIterator<Item = Side>>(iter: I) -> Self {
        iter.into_iter()
            .fold(FaceMask::empty(), |mask, side| mask | FaceMask::from_side(side))
    }
}

/// Immutable lighting descriptor for a block type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
    id: BlockId,
    luminance: u8,
    full_faces: FaceMask,
}

impl Block {
    /// Transparent, non-emitting air.
    pub const AIR: Block = Block {
        id: BLOCK_AIR,
        luminance: 0,
        full_faces: FaceMask::empty(),
    };

    /// Construct a descriptor; luminance saturates at [`MAX_LIGHT`].
    pub const fn new(id: BlockId, luminance: u8, full_faces: FaceMask) -> Self {
        let luminance = if luminance > MAX_LIGHT {
            MAX_LIGHT
        } else {
            luminance
        };
        Self {
            id,
            luminance,
            full_faces,
        }
    }

    /// A block with no full faces emitting `luminance`.
    pub const fn light_source(id: BlockId, luminance: u8) -> Self {
        Self::new(id, luminance, FaceMask::empty())
    }

    /// A block whose six faces are all full.
    pub const fn solid(id: BlockId) -> Self {
        Self::new(id, 0, FaceMask::all())
    }

    #[inline]
    pub const fn id(&self) -> BlockId {
        self.id
    }

    /// Light emitted by the block itself.
    #[inline]
    pub const fn luminance(&self) -> u8 {
        self.luminance
    }

    #[inline]
    pub const fn full_faces(&self) -> FaceMask {
        self.full_faces
    }

    /// Whether light is stopped at this block's `side` face.
    #[inline]
    pub const fn is_full_face(&self, side: Side) -> bool {
        self.full_faces.has(side)
    }

    /// All six faces full.
    pub fn is_solid(&self) -> bool {
        self.full_faces.is_all()
    }

    /// Whether this block and `other` behave identically for lighting.
    pub fn same_lighting(&self, other: &Block) -> bool {
        self.luminance == other.luminance && self.full_faces == other.full_faces
    }
}

impl Default for Block {
    fn default() -> Self {
        Block::AIR
    }
}

/// Whether light may cross from a voxel holding `from` into its neighbour
/// holding `to`, moving towards `side`.
///
/// Opacity is directional: the exit face of `from` and the entry face of `to`
/// are both consulted.
#[inline]
pub fn can_cross(from: &Block, to: &Block, side: Side) -> bool {
    !from.is_full_face(side) && !to.is_full_face(side.reverse())
}

/// Resolves registry ids into lighting descriptors.
pub trait BlockLookup {
    /// Descriptor for `id`; unknown ids should resolve to [`Block::AIR`].
    fn block(&self, id: BlockId) -> Block;
}
