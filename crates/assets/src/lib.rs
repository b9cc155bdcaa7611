#![warn(missing_docs)]
//! Block pack schema, validation and the block registry built from it.

mod loader;
mod registry;

pub use loader::{registry_from_file, registry_from_str};
pub use registry::{BlockDescriptor, BlockRegistry};

use serde::Deserialize;
use thiserror::Error;
use voxlight_core::{BlockUri, BlockUriError};

/// Block definition as written in a pack.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockDefinition {
    /// Block URI (e.g. "engine:torch"); a bare name uses the `engine` namespace.
    pub name: String,
    /// Emitted light level (0-15).
    #[serde(default)]
    pub luminance: u8,
    /// Shorthand for all six faces being full.
    #[serde(default)]
    pub opaque: bool,
    /// Individually full faces: "up", "down", "north", "south", "east", "west".
    #[serde(default)]
    pub full_sides: Vec<String>,
}

/// Errors emitted during pack loading.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Wrap IO errors when reading packs.
    #[error("failed to read block pack: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap serde parsing issues.
    #[error("failed to parse block pack: {0}")]
    Parse(#[from] serde_json::Error),
    /// A block name is not a valid URI.
    #[error("invalid block name: {0}")]
    InvalidUri(#[from] BlockUriError),
    /// Luminance above the maximum light level.
    #[error("block {uri} has luminance {value}, above the maximum of {max}")]
    LuminanceOutOfRange {
        /// Offending block.
        uri: BlockUri,
        /// Declared luminance.
        value: u8,
        /// Highest accepted luminance.
        max: u8,
    },
    /// A `full_sides` entry names no known side.
    #[error("block {uri} lists unknown side `{side}`")]
    UnknownSide {
        /// Offending block.
        uri: BlockUri,
        /// Unrecognised side name.
        side: String,
    },
    /// Two definitions share a URI, or air is redefined with light properties.
    #[error("block {0} is defined more than once")]
    DuplicateBlock(BlockUri),
    /// Ran out of block ids.
    #[error("block pack defines more than {0} blocks")]
    TooManyBlocks(usize),
}

/// Parse a JSON string into a list of block definitions.
pub fn load_blocks_from_str(input: &str) -> Result<Vec<BlockDefinition>, AssetError> {
    Ok(serde_json::from_str(input)?)
}
