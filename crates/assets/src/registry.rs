use std::collections::HashMap;

use voxlight_core::{BlockUri, Side, MAX_LIGHT};
use voxlight_world::{Block, BlockId, BlockLookup, FaceMask, BLOCK_AIR};

use crate::{AssetError, BlockDefinition};

/// Block metadata loaded from packs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDescriptor {
    /// Stable identifier (e.g. `engine:torch`).
    pub uri: BlockUri,
    /// Lighting descriptor handed to the propagator.
    pub block: Block,
}

impl BlockDescriptor {
    /// Validate a definition and bind it to `id`.
    pub fn from_definition(def: &BlockDefinition, id: BlockId) -> Result<Self, AssetError> {
        let uri = BlockUri::parse(&def.name)?;
        if def.luminance > MAX_LIGHT {
            return Err(AssetError::LuminanceOutOfRange {
                uri,
                value: def.luminance,
                max: MAX_LIGHT,
            });
        }

        let mut faces = if def.opaque {
            FaceMask::all()
        } else {
            FaceMask::empty()
        };
        for name in &def.full_sides {
            let side: Side = name.parse().map_err(|_| AssetError::UnknownSide {
                uri: uri.clone(),
                side: name.clone(),
            })?;
            faces |= FaceMask::from_side(side);
        }

        Ok(Self {
            uri,
            block: Block::new(id, def.luminance, faces),
        })
    }
}

/// Registry storing block descriptors keyed by id. Id 0 is always air.
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    descriptors: Vec<BlockDescriptor>,
    uri_to_id: HashMap<BlockUri, BlockId>,
    explicit_air: bool,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRegistry {
    /// URI of the reserved air block.
    pub const AIR_URI: &'static str = "engine:air";

    /// A registry holding only air.
    pub fn new() -> Self {
        let air = BlockDescriptor {
            uri: BlockUri::parse(Self::AIR_URI).expect("air uri is valid"),
            block: Block::AIR,
        };
        let mut uri_to_id = HashMap::new();
        uri_to_id.insert(air.uri.clone(), BLOCK_AIR);
        Self {
            descriptors: vec![air],
            uri_to_id,
            explicit_air: false,
        }
    }

    /// Build a registry from pack definitions, assigning ids in file order
    /// after air. An explicit `engine:air` entry is accepted only if it is
    /// transparent and dark.
    pub fn from_definitions(defs: &[BlockDefinition]) -> Result<Self, AssetError> {
        let mut registry = Self::new();
        for def in defs {
            registry.register(def)?;
        }
        Ok(registry)
    }

    /// Add one definition, returning its id.
    pub fn register(&mut self, def: &BlockDefinition) -> Result<BlockId, AssetError> {
        let id = BlockId::try_from(self.descriptors.len())
            .map_err(|_| AssetError::TooManyBlocks(BlockId::MAX as usize + 1))?;
        let descriptor = BlockDescriptor::from_definition(def, id)?;

        if let Some(&existing) = self.uri_to_id.get(&descriptor.uri) {
            let plain_air = existing == BLOCK_AIR
                && !self.explicit_air
                && descriptor.block.same_lighting(&Block::AIR);
            if plain_air {
                self.explicit_air = true;
                tracing::debug!("block pack lists air explicitly; keeping id 0");
                return Ok(BLOCK_AIR);
            }
            return Err(AssetError::DuplicateBlock(descriptor.uri));
        }

        self.uri_to_id.insert(descriptor.uri.clone(), id);
        self.descriptors.push(descriptor);
        Ok(id)
    }

    /// Look up a descriptor by numeric id.
    pub fn descriptor(&self, id: BlockId) -> Option<&BlockDescriptor> {
        self.descriptors.get(id as usize)
    }

    /// Resolve a block id by its URI or bare name.
    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        let uri = BlockUri::parse(name).ok()?;
        self.uri_to_id.get(&uri).copied()
    }

    /// Resolve a lighting descriptor by URI or bare name.
    pub fn block_by_name(&self, name: &str) -> Option<Block> {
        self.id_by_name(name).map(|id| self.block(id))
    }

    /// Number of registered blocks, air included.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Always false once constructed; air is always registered.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Iterate descriptors in id order.
    pub fn iter(&self) -> impl Iterator<Item = &BlockDescriptor> {
        self.descriptors.iter()
    }
}

impl BlockLookup for BlockRegistry {
    fn block(&self, id: BlockId) -> Block {
        self.descriptor(id).map(|d| d.block).unwrap_or(Block::AIR)
    }
}
