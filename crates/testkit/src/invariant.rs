//! Fixed-point checks and a from-scratch reference relight.
//!
//! A settled world satisfies, at every position, `light == expected_light`:
//! the block's own luminance or the best crossable neighbour minus one,
//! whichever is larger. [`reference_light`] recomputes that fixed point with
//! no history so incremental results can be compared against it.

use std::collections::{BTreeMap, HashMap};

use anyhow::{bail, Result};
use serde::Serialize;
use voxlight_core::{BlockPos, MAX_LIGHT};
use voxlight_world::{can_cross, LightingWorldView};

/// A position whose stored light disagrees with its neighbourhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LightViolation {
    /// Offending position.
    pub pos: BlockPos,
    /// Light currently stored.
    pub stored: u8,
    /// Light the neighbourhood implies.
    pub expected: u8,
}

/// Light `pos` should hold given its block and its neighbours' stored light.
pub fn expected_light<W: LightingWorldView + ?Sized>(view: &W, pos: BlockPos) -> u8 {
    let block = view.block_at(pos);
    let mut best = block.luminance();
    for (side, neighbor) in pos.neighbors() {
        let light = view.light_at(neighbor);
        if light <= best + 1 {
            continue;
        }
        if can_cross(&view.block_at(neighbor), &block, side.reverse()) {
            best = light - 1;
        }
    }
    best.min(MAX_LIGHT)
}

/// Every position in `positions` that breaks the fixed-point rule.
pub fn find_violations<W, I>(view: &W, positions: I) -> Vec<LightViolation>
where
    W: LightingWorldView + ?Sized,
    I: IntoIterator<Item = BlockPos>,
{
    positions
        .into_iter()
        .filter_map(|pos| {
            let stored = view.light_at(pos);
            let expected = expected_light(view, pos);
            (stored != expected).then_some(LightViolation {
                pos,
                stored,
                expected,
            })
        })
        .collect()
}

/// Fail with the first few violations if any position is inconsistent.
pub fn assert_light_consistent<W, I>(view: &W, positions: I) -> Result<()>
where
    W: LightingWorldView + ?Sized,
    I: IntoIterator<Item = BlockPos>,
{
    let violations = find_violations(view, positions);
    if violations.is_empty() {
        return Ok(());
    }
    let sample: Vec<String> = violations
        .iter()
        .take(5)
        .map(|v| format!("{} stored {} expected {}", v.pos, v.stored, v.expected))
        .collect();
    bail!(
        "{} light violation(s): {}",
        violations.len(),
        sample.join("; ")
    )
}

/// Light every voxel would hold if the world were lit from nothing, given
/// the blocks in `view` and the emitters at `emitters`.
///
/// Only lit positions are returned. Stored light in `view` is ignored.
pub fn reference_light<W, I>(view: &W, emitters: I) -> BTreeMap<BlockPos, u8>
where
    W: LightingWorldView + ?Sized,
    I: IntoIterator<Item = BlockPos>,
{
    let mut buckets: Vec<Vec<BlockPos>> = vec![Vec::new(); MAX_LIGHT as usize + 1];
    for pos in emitters {
        let level = view.block_at(pos).luminance().min(MAX_LIGHT);
        buckets[level as usize].push(pos);
    }

    let mut settled: HashMap<BlockPos, u8> = HashMap::new();
    for level in (1..=MAX_LIGHT).rev() {
        let positions = std::mem::take(&mut buckets[level as usize]);
        for pos in positions {
            if settled.contains_key(&pos) {
                continue;
            }
            settled.insert(pos, level);
            if level == 1 {
                continue;
            }
            let block = view.block_at(pos);
            for (side, neighbor) in pos.neighbors() {
                if settled.contains_key(&neighbor) {
                    continue;
                }
                if can_cross(&block, &view.block_at(neighbor), side) {
                    buckets[level as usize - 1].push(neighbor);
                }
            }
        }
    }

    settled.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StubLightingWorldView;
    use voxlight_world::Block;

    #[test]
    fn reference_light_of_a_single_torch() {
        let mut view = StubLightingWorldView::new();
        view.set_block(BlockPos::ZERO, Block::light_source(1, 3));
        let light = reference_light(&view, view.emitters().collect::<Vec<_>>());
        // 1 + 6 + 18 voxels at levels 3, 2, 1.
        assert_eq!(light.len(), 25);
        assert_eq!(light[&BlockPos::ZERO], 3);
        assert_eq!(light[&BlockPos::new(1, 1, 0)], 1);
    }

    #[test]
    fn reference_light_respects_walls() {
        let mut view = StubLightingWorldView::new();
        view.set_block(BlockPos::ZERO, Block::light_source(1, 2));
        view.set_block(BlockPos::new(1, 0, 0), Block::solid(2));
        let light = reference_light(&view, [BlockPos::ZERO]);
        assert!(!light.contains_key(&BlockPos::new(1, 0, 0)));
        assert_eq!(light.len(), 6);
    }

    #[test]
    fn violations_are_reported() {
        let mut view = StubLightingWorldView::new();
        view.set_block(BlockPos::ZERO, Block::light_source(1, 4));
        let near = BlockPos::ZERO.neighbors().map(|(_, p)| p);
        let violations = find_violations(&view, std::iter::once(BlockPos::ZERO).chain(near));
        assert_eq!(
            violations,
            vec![LightViolation {
                pos: BlockPos::ZERO,
                stored: 0,
                expected: 4,
            }]
        );
        assert!(assert_light_consistent(&view, [BlockPos::ZERO]).is_err());

        view.set_light_at(BlockPos::ZERO, 4);
        let violations = find_violations(&view, BlockPos::ZERO.neighbors().map(|(_, p)| p));
        assert_eq!(violations.len(), 6);
        assert!(violations.iter().all(|v| v.expected == 3));
    }
}
