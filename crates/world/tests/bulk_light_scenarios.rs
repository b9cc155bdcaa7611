//! Reference lighting scenarios for the bulk propagator.
//!
//! Each scenario edits a map-backed world, relights it, checks the expected
//! light values and then checks the whole field against a from-scratch
//! relight, so stale or missing light anywhere is caught too.

use std::collections::{BTreeMap, BTreeSet};

use voxlight_core::{BlockPos, Side, MAX_LIGHT};
use voxlight_testkit::{diamond_at_distance, reference_light, Region, StubLightingWorldView};
use voxlight_world::{Block, BlockChange, BulkLightPropagator, FaceMask, LightUpdate, LightingWorldView};

const TORCH: Block = Block::light_source(1, 15);
const WEAK_LIGHT: Block = Block::light_source(2, 2);
const MEDIUM_LIGHT: Block = Block::light_source(3, 5);
const SOLID: Block = Block::solid(4);
const SOLID_MEDIUM_LIGHT: Block = Block::new(5, 5, FaceMask::all());

fn x(x: i32) -> BlockPos {
    BlockPos::new(x, 0, 0)
}

/// Relight `changes` and check the result against a from-scratch relight,
/// including the reported change set.
fn relight(view: &mut StubLightingWorldView, changes: &[BlockChange]) -> LightUpdate {
    let before = view.lit();
    let update = BulkLightPropagator::new(view).process(changes);
    assert_settled(view);
    assert_eq!(update.changed, changed_between(&before, &view.lit()));
    update
}

fn assert_settled(view: &StubLightingWorldView) {
    let emitters: Vec<_> = view.emitters().collect();
    assert_eq!(view.lit(), reference_light(view, emitters));
}

fn changed_between(before: &BTreeMap<BlockPos, u8>, after: &BTreeMap<BlockPos, u8>) -> Vec<BlockPos> {
    let keys: BTreeSet<BlockPos> = before.keys().chain(after.keys()).copied().collect();
    keys.into_iter()
        .filter(|pos| before.get(pos) != after.get(pos))
        .collect()
}

fn assert_diamond(view: &StubLightingWorldView, center: BlockPos, distance: u32, expected: u8) {
    for pos in diamond_at_distance(center, distance) {
        assert_eq!(
            view.light_at(pos),
            expected,
            "light at {pos} (distance {distance} from {center})"
        );
    }
}

#[test]
fn add_light_in_vacuum() {
    let mut view = StubLightingWorldView::new();
    let change = view.set_block(BlockPos::ZERO, TORCH);
    let update = relight(&mut view, &[change]);

    for d in 0..MAX_LIGHT as u32 {
        assert_diamond(&view, BlockPos::ZERO, d, MAX_LIGHT - d as u8);
    }
    assert_diamond(&view, BlockPos::ZERO, MAX_LIGHT as u32, 0);
    assert_eq!(update.changed.len(), 4089);
    assert_eq!(update.seeds, 1);
}

#[test]
fn remove_light_in_vacuum() {
    let mut view = StubLightingWorldView::new();
    let placed = view.set_block(BlockPos::ZERO, TORCH);
    relight(&mut view, &[placed]);

    let removed = view.set_block(BlockPos::ZERO, Block::AIR);
    let update = relight(&mut view, &[removed]);

    for d in 0..=MAX_LIGHT as u32 {
        assert_diamond(&view, BlockPos::ZERO, d, 0);
    }
    assert_eq!(view.lit_count(), 0);
    assert_eq!(update.changed.len(), 4089);
}

#[test]
fn reduce_light() {
    let mut view = StubLightingWorldView::new();
    let placed = view.set_block(BlockPos::ZERO, TORCH);
    relight(&mut view, &[placed]);

    let dimmed = view.set_block(BlockPos::ZERO, MEDIUM_LIGHT);
    relight(&mut view, &[dimmed]);

    for d in 0..5 {
        assert_diamond(&view, BlockPos::ZERO, d, 5 - d as u8);
    }
    for d in 5..=MAX_LIGHT as u32 {
        assert_diamond(&view, BlockPos::ZERO, d, 0);
    }
}

#[test]
fn add_overlapping_lights() {
    let mut view = StubLightingWorldView::new();
    let changes = [
        view.set_block(BlockPos::ZERO, TORCH),
        view.set_block(x(5), TORCH),
    ];
    relight(&mut view, &changes);

    assert_eq!(view.light_at(x(2)), 13);
    assert_eq!(view.light_at(x(3)), 13);
    for i in -16i32..=21 {
        let nearest = i.abs().min((i - 5).abs());
        assert_eq!(view.light_at(x(i)), 15u8.saturating_sub(nearest as u8), "x = {i}");
    }
}

#[test]
fn remove_overlapping_light() {
    let mut view = StubLightingWorldView::new();
    let changes = [
        view.set_block(BlockPos::ZERO, TORCH),
        view.set_block(x(5), TORCH),
    ];
    relight(&mut view, &changes);

    let removed = view.set_block(x(5), Block::AIR);
    relight(&mut view, &[removed]);

    for d in 0..MAX_LIGHT as u32 {
        assert_diamond(&view, BlockPos::ZERO, d, MAX_LIGHT - d as u8);
    }
    assert_diamond(&view, BlockPos::ZERO, MAX_LIGHT as u32, 0);
}

#[test]
fn remove_light_overlapping_at_edge() {
    let mut view = StubLightingWorldView::new();
    let changes = [
        view.set_block(BlockPos::ZERO, TORCH),
        view.set_block(x(28), TORCH),
    ];
    relight(&mut view, &changes);
    // Both torches reach x = 14 with a single level.
    assert_eq!(view.light_at(x(14)), 1);

    let removed = view.set_block(x(28), Block::AIR);
    relight(&mut view, &[removed]);

    assert_eq!(view.light_at(x(14)), 1);
    assert_eq!(view.light_at(x(15)), 0);
    assert_eq!(view.light_at(x(27)), 0);
    assert_diamond(&view, BlockPos::ZERO, 14, 1);
}

#[test]
fn add_light_in_light() {
    let mut view = StubLightingWorldView::new();
    let placed = view.set_block(BlockPos::ZERO, TORCH);
    relight(&mut view, &[placed]);

    let inner = view.set_block(x(3), MEDIUM_LIGHT);
    let update = relight(&mut view, &[inner]);

    assert_eq!(view.light_at(x(3)), 12);
    assert!(update.is_empty());
}

#[test]
fn add_adjacent_lights() {
    let mut view = StubLightingWorldView::new();
    let changes = [
        view.set_block(BlockPos::ZERO, TORCH),
        view.set_block(x(1), TORCH),
    ];
    relight(&mut view, &changes);

    for i in -15i32..=16 {
        let nearest = i.abs().min((i - 1).abs());
        assert_eq!(view.light_at(x(i)), 15u8.saturating_sub(nearest as u8), "x = {i}");
    }
}

#[test]
fn remove_adjacent_lights() {
    let mut view = StubLightingWorldView::new();
    let placed = [
        view.set_block(BlockPos::ZERO, TORCH),
        view.set_block(x(1), TORCH),
    ];
    relight(&mut view, &placed);

    let removed = [
        view.set_block(BlockPos::ZERO, Block::AIR),
        view.set_block(x(1), Block::AIR),
    ];
    relight(&mut view, &removed);

    assert_eq!(view.lit_count(), 0);
}

#[test]
fn add_weak_light_next_to_strong_light() {
    let mut view = StubLightingWorldView::new();
    let torch = view.set_block(BlockPos::ZERO, TORCH);
    relight(&mut view, &[torch]);

    let weak = view.set_block(x(1), WEAK_LIGHT);
    relight(&mut view, &[weak]);

    assert_eq!(view.light_at(x(1)), 14);
}

#[test]
fn add_solid_blocks_light() {
    let mut view = StubLightingWorldView::new();
    let lamp = view.set_block(BlockPos::ZERO, MEDIUM_LIGHT);
    relight(&mut view, &[lamp]);

    let wall = view.set_block(x(1), SOLID);
    relight(&mut view, &[wall]);

    assert_eq!(view.light_at(BlockPos::ZERO), 5);
    assert_eq!(view.light_at(x(1)), 0);
    assert_eq!(view.light_at(x(2)), 1);
}

#[test]
fn remove_solid_allows_light() {
    let mut view = StubLightingWorldView::new();
    let wall = Region::from_center_extents(x(1), [0, 30, 30]);
    let built = view.set_blocks(wall.iter(), SOLID);
    relight(&mut view, &built);

    let torch = view.set_block(BlockPos::ZERO, TORCH);
    relight(&mut view, &[torch]);
    assert_eq!(view.light_at(x(1)), 0);
    assert_eq!(view.light_at(x(2)), 0);

    let opened = view.set_block(x(1), Block::AIR);
    relight(&mut view, &[opened]);

    assert_eq!(view.light_at(x(1)), 14);
    assert_eq!(view.light_at(x(2)), 13);
}

#[test]
fn remove_solid_and_light() {
    let mut view = StubLightingWorldView::new();
    let wall = Region::from_center_extents(x(1), [0, 2, 2]);
    let mut setup = view.set_blocks(wall.iter(), SOLID);
    setup.push(view.set_block(BlockPos::ZERO, TORCH));
    relight(&mut view, &setup);
    assert_eq!(view.light_at(x(2)), 15 - 8);

    let removed = [
        view.set_block(x(1), Block::AIR),
        view.set_block(BlockPos::ZERO, Block::AIR),
    ];
    relight(&mut view, &removed);

    assert_eq!(view.lit_count(), 0);
}

#[test]
fn solid_emitter_lights_only_itself() {
    let mut view = StubLightingWorldView::new();
    let glow = view.set_block(BlockPos::ZERO, SOLID_MEDIUM_LIGHT);
    relight(&mut view, &[glow]);

    assert_eq!(view.light_at(BlockPos::ZERO), 5);
    assert_diamond(&view, BlockPos::ZERO, 1, 0);

    let gone = view.set_block(BlockPos::ZERO, Block::AIR);
    relight(&mut view, &[gone]);
    assert_eq!(view.lit_count(), 0);
}

#[test]
fn slab_stops_light_leaving_downwards_only() {
    let slab = Block::new(6, 0, FaceMask::from_side(Side::Down));
    let mut view = StubLightingWorldView::new();
    let changes = [
        view.set_block(BlockPos::new(0, 1, 0), TORCH),
        view.set_block(BlockPos::ZERO, slab),
    ];
    relight(&mut view, &changes);

    // Light enters through the open top face.
    assert_eq!(view.light_at(BlockPos::ZERO), 14);
    // Below the slab it must come around the side.
    assert_eq!(view.light_at(BlockPos::new(0, -1, 0)), 11);
}

#[test]
fn opening_a_face_brightens_the_far_side() {
    let shutter = Block::new(6, 8, FaceMask::from_side(Side::East));
    let mut view = StubLightingWorldView::new();
    let closed = view.set_block(BlockPos::ZERO, shutter);
    relight(&mut view, &[closed]);
    assert_eq!(view.light_at(x(-1)), 7);
    assert_eq!(view.light_at(x(1)), 5);

    let opened = view.set_block(BlockPos::ZERO, Block::light_source(7, 8));
    let update = relight(&mut view, &[opened]);
    assert_eq!(view.light_at(x(1)), 7);
    assert!(update.changed.contains(&x(1)));
}

#[test]
fn duplicate_records_resolve_to_net_change() {
    let mut view = StubLightingWorldView::new();
    let changes = [
        view.set_block(BlockPos::ZERO, TORCH),
        view.set_block(BlockPos::ZERO, SOLID),
        view.set_block(BlockPos::ZERO, MEDIUM_LIGHT),
    ];
    let update = relight(&mut view, &changes);

    assert_eq!(update.seeds, 1);
    assert_eq!(view.light_at(BlockPos::ZERO), 5);

    // Placing and removing within one batch nets out to nothing.
    let flicker = [
        view.set_block(x(20), TORCH),
        view.set_block(x(20), Block::AIR),
    ];
    let update = relight(&mut view, &flicker);
    assert!(update.is_empty());
    assert_eq!(update.seeds, 0);
}

#[test]
fn batch_order_does_not_change_the_field() {
    let edits = [
        (BlockPos::ZERO, TORCH),
        (x(4), TORCH),
        (x(2), SOLID),
        (BlockPos::new(2, 1, 0), SOLID),
        (BlockPos::new(2, 0, 1), WEAK_LIGHT),
        (BlockPos::new(-3, 2, 0), MEDIUM_LIGHT),
    ];
    let run = |order: &[usize]| {
        let mut view = StubLightingWorldView::new();
        let records: Vec<_> = edits
            .iter()
            .map(|(pos, block)| view.set_block(*pos, *block))
            .collect();
        let batch: Vec<_> = order.iter().map(|&i| records[i]).collect();
        relight(&mut view, &batch);
        view.lit()
    };

    let reference = run(&[0, 1, 2, 3, 4, 5]);
    assert_eq!(run(&[5, 4, 3, 2, 1, 0]), reference);
    assert_eq!(run(&[2, 5, 0, 3, 1, 4]), reference);
}

#[test]
fn batched_and_sequential_edits_agree() {
    let edits = [
        (BlockPos::ZERO, TORCH),
        (x(3), SOLID),
        (BlockPos::new(3, 0, 1), MEDIUM_LIGHT),
        (BlockPos::new(0, 2, 0), SOLID_MEDIUM_LIGHT),
    ];

    let mut batched = StubLightingWorldView::new();
    let records: Vec<_> = edits
        .iter()
        .map(|(pos, block)| batched.set_block(*pos, *block))
        .collect();
    relight(&mut batched, &records);

    let mut sequential = StubLightingWorldView::new();
    for (pos, block) in edits {
        let record = sequential.set_block(pos, block);
        relight(&mut sequential, &[record]);
    }

    assert_eq!(batched.lit(), sequential.lit());
}
