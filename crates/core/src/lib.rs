#![warn(missing_docs)]
//! Core primitives shared across the workspace.

mod pos;
mod side;
pub mod uri;

pub use pos::BlockPos;
pub use side::Side;
pub use uri::{BlockUri, BlockUriError, DEFAULT_NAMESPACE};

/// Brightest light level a voxel can hold.
pub const MAX_LIGHT: u8 = 15;
