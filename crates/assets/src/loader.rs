use std::fs;
use std::path::Path;

use crate::{AssetError, BlockRegistry};

/// Load a block registry from the provided JSON file path.
pub fn registry_from_file(path: &Path) -> Result<BlockRegistry, AssetError> {
    let data = fs::read_to_string(path)?;
    let registry = registry_from_str(&data)?;
    tracing::info!(
        path = %path.display(),
        blocks = registry.len(),
        "loaded block pack"
    );
    Ok(registry)
}

/// Load a block registry from an in-memory JSON string.
pub fn registry_from_str(input: &str) -> Result<BlockRegistry, AssetError> {
    let defs = crate::load_blocks_from_str(input)?;
    BlockRegistry::from_definitions(&defs)
}
