//! # Grid Storage Properties
//!
//! Randomized round-trips through chunk storage. Regions are drawn so they
//! straddle chunk boundaries, including negative coordinates.

use glam::IVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use voxmesh::{Cell, Grid, Region, VoxelBox};

fn random_region(rng: &mut ChaCha8Rng) -> Region {
    let begin = IVec3::new(
        rng.gen_range(-80..80),
        rng.gen_range(-80..80),
        rng.gen_range(-80..80),
    );
    let size = IVec3::new(
        rng.gen_range(1..48),
        rng.gen_range(1..48),
        rng.gen_range(1..48),
    );
    Region::with_size(begin, size)
}

fn random_box(rng: &mut ChaCha8Rng, region: &Region) -> VoxelBox {
    let size = region.size().as_uvec3();
    VoxelBox::from_fn(size.x, size.y, size.z, |_, _, _| {
        Cell::new(rng.gen(), rng.gen())
    })
}

/// Test: write then read returns the written box.
#[test]
fn test_write_read_round_trip() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let grid = Grid::new();

    for _ in 0..32 {
        let region = random_region(&mut rng);
        let cells = random_box(&mut rng, &region);
        grid.write(region, &cells);
        assert_eq!(grid.read(region), cells, "region {region:?}");
    }
}

/// Test: a disjoint write does not disturb an earlier one.
#[test]
fn test_disjoint_writes_are_independent() {
    let mut rng = ChaCha8Rng::seed_from_u64(2);

    for _ in 0..16 {
        let first = random_region(&mut rng);
        let second = loop {
            let candidate = random_region(&mut rng);
            if first.intersect(&candidate).is_empty() {
                break candidate;
            }
        };

        let grid = Grid::new();
        let a = random_box(&mut rng, &first);
        let b = random_box(&mut rng, &second);
        grid.write(first, &a);
        grid.write(second, &b);

        assert_eq!(grid.read(first), a);
        assert_eq!(grid.read(second), b);
    }
}

/// Test: reads outside every write are all zero.
#[test]
fn test_unwritten_reads_are_zero() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let grid = Grid::new();
    let written = Region::new(IVec3::new(-8, -8, -8), IVec3::new(8, 8, 8));
    grid.fill(written, Cell::solid(3));

    for _ in 0..16 {
        let region = random_region(&mut rng);
        let read = grid.read(region);
        let overlap = region.intersect(&written);

        for (i, cell) in read.cells().iter().enumerate() {
            let size = region.size();
            let i = i as i32;
            let local = IVec3::new(i % size.x, (i / size.x) % size.y, i / (size.x * size.y));
            if overlap.contains(region.begin() + local) {
                assert_eq!(*cell, Cell::solid(3));
            } else {
                assert_eq!(*cell, Cell::EMPTY);
            }
        }
    }

    assert!(Grid::new().read(written).cells().iter().all(|c| c.is_empty()));
}

/// Test: overlapping writes keep the latest value per cell.
#[test]
fn test_overlapping_write_overrides() {
    let grid = Grid::new();
    let big = Region::new(IVec3::splat(-20), IVec3::splat(20));
    let small = Region::new(IVec3::splat(-2), IVec3::splat(30));
    grid.fill(big, Cell::new(10, 1));
    grid.fill(small, Cell::new(20, 2));

    assert_eq!(grid.get_cell(IVec3::splat(-20)), Cell::new(10, 1));
    assert_eq!(grid.get_cell(IVec3::splat(0)), Cell::new(20, 2));
    assert_eq!(grid.get_cell(IVec3::splat(29)), Cell::new(20, 2));
}
