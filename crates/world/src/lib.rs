//! Voxel storage, block descriptors and incremental block-light propagation.

mod block;
mod change;
mod chunk;
mod frontier;
mod lighting;
mod storage;
mod view;

pub use block::*;
pub use change::*;
pub use chunk::*;
pub use frontier::*;
pub use lighting::*;
pub use storage::*;
pub use view::*;
