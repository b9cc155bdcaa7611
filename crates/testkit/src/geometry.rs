//! Position sets used to state lighting expectations.

use voxlight_core::BlockPos;

/// Every position at exactly grid distance `distance` from `center`.
///
/// The shell of an octahedron; distance 0 yields only the center. Order is
/// deterministic (x, then y, then z ascending).
pub fn diamond_at_distance(center: BlockPos, distance: u32) -> Vec<BlockPos> {
    let d = distance as i32;
    let mut out = Vec::new();
    for dx in -d..=d {
        let rest = d - dx.abs();
        for dy in -rest..=rest {
            let dz = rest - dy.abs();
            out.push(BlockPos::new(center.x + dx, center.y + dy, center.z - dz));
            if dz != 0 {
                out.push(BlockPos::new(center.x + dx, center.y + dy, center.z + dz));
            }
        }
    }
    out
}

/// Inclusive axis-aligned box of positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Lowest corner.
    pub min: BlockPos,
    /// Highest corner, inclusive.
    pub max: BlockPos,
}

impl Region {
    /// Box spanning `center ± extents` on each axis.
    pub fn from_center_extents(center: BlockPos, extents: [i32; 3]) -> Self {
        let [ex, ey, ez] = extents.map(i32::abs);
        Self {
            min: BlockPos::new(center.x - ex, center.y - ey, center.z - ez),
            max: BlockPos::new(center.x + ex, center.y + ey, center.z + ez),
        }
    }

    /// Box covering both corners.
    pub fn from_corners(a: BlockPos, b: BlockPos) -> Self {
        Self {
            min: BlockPos::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: BlockPos::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Whether `pos` lies inside.
    pub fn contains(&self, pos: BlockPos) -> bool {
        (self.min.x..=self.max.x).contains(&pos.x)
            && (self.min.y..=self.max.y).contains(&pos.y)
            && (self.min.z..=self.max.z).contains(&pos.z)
    }

    /// The same box grown by `margin` on every side.
    pub fn expand(&self, margin: i32) -> Self {
        Self {
            min: BlockPos::new(self.min.x - margin, self.min.y - margin, self.min.z - margin),
            max: BlockPos::new(self.max.x + margin, self.max.y + margin, self.max.z + margin),
        }
    }

    /// Number of positions inside.
    pub fn volume(&self) -> usize {
        let span = |lo: i32, hi: i32| (hi - lo + 1).max(0) as usize;
        span(self.min.x, self.max.x) * span(self.min.y, self.max.y) * span(self.min.z, self.max.z)
    }

    /// Positions inside, x-major.
    pub fn iter(&self) -> impl Iterator<Item = BlockPos> {
        let Region { min, max } = *self;
        (min.x..=max.x).flat_map(move |x| {
            (min.y..=max.y).flat_map(move |y| (min.z..=max.z).map(move |z| BlockPos::new(x, y, z)))
        })
    }
}
