use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the six axis-aligned directions out of a voxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Positive Y.
    Up,
    /// Negative Y.
    Down,
    /// Negative Z.
    North,
    /// Positive Z.
    South,
    /// Positive X.
    East,
    /// Negative X.
    West,
}

impl Side {
    /// All sides in a fixed order.
    pub const ALL: [Side; 6] = [
        Side::Up,
        Side::Down,
        Side::North,
        Side::South,
        Side::East,
        Side::West,
    ];

    /// The side facing the opposite way.
    pub const fn reverse(self) -> Side {
        match self {
            Side::Up => Side::Down,
            Side::Down => Side::Up,
            Side::North => Side::South,
            Side::South => Side::North,
            Side::East => Side::West,
            Side::West => Side::East,
        }
    }

    /// Unit step `(dx, dy, dz)` towards this side.
    pub const fn offset(self) -> (i32, i32, i32) {
        match self {
            Side::Up => (0, 1, 0),
            Side::Down => (0, -1, 0),
            Side::North => (0, 0, -1),
            Side::South => (0, 0, 1),
            Side::East => (1, 0, 0),
            Side::West => (-1, 0, 0),
        }
    }

    /// Stable index in `0..6`, matching [`Side::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase name used in data files.
    pub const fn name(self) -> &'static str {
        match self {
            Side::Up => "up",
            Side::Down => "down",
            Side::North => "north",
            Side::South => "south",
            Side::East => "east",
            Side::West => "west",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" | "top" => Ok(Side::Up),
            "down" | "bottom" => Ok(Side::Down),
            "north" => Ok(Side::North),
            "south" => Ok(Side::South),
            "east" => Ok(Side::East),
            "west" => Ok(Side::West),
            other => Err(format!("unknown side `{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_is_an_involution_and_negates_offset() {
        for side in Side::ALL {
            assert_eq!(side.reverse().reverse(), side);
            let (x, y, z) = side.offset();
            assert_eq!(side.reverse().offset(), (-x, -y, -z));
        }
    }

    #[test]
    fn index_matches_all_order() {
        for (i, side) in Side::ALL.iter().enumerate() {
            assert_eq!(side.index(), i);
        }
    }

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("EAST".parse::<Side>().unwrap(), Side::East);
        assert_eq!("top".parse::<Side>().unwrap(), Side::Up);
        assert!("sideways".parse::<Side>().is_err());
    }
}
