use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Side;

/// Integer voxel coordinate in world space.
///
/// Implements `Ord` (x, then y, then z) so batches and reports iterate
/// deterministically.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct BlockPos {
    /// X coordinate (east is positive).
    pub x: i32,
    /// Y coordinate (up is positive).
    pub y: i32,
    /// Z coordinate (south is positive).
    pub z: i32,
}

impl BlockPos {
    /// The world origin.
    pub const ZERO: Self = Self { x: 0, y: 0, z: 0 };

    /// Construct a position.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The adjacent position across `side`.
    #[inline]
    pub const fn offset(self, side: Side) -> Self {
        let (dx, dy, dz) = side.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// All six face neighbours, paired with the side crossed to reach them.
    pub fn neighbors(self) -> impl Iterator<Item = (Side, BlockPos)> {
        Side::ALL.into_iter().map(move |side| (side, self.offset(side)))
    }

    /// Manhattan distance, i.e. the number of face steps between two positions.
    pub fn grid_distance(self, other: BlockPos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) + self.z.abs_diff(other.z)
    }
}

impl From<[i32; 3]> for BlockPos {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
