//! Benchmark for grid-region extraction on the hill terrain.
//!
//! Run with: cargo bench --package voxmesh --bench extract_benchmark

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use voxmesh::terrain::{hill_region, hill_terrain};
use voxmesh::{Algorithm, Extractor, Grid, MesherConfig, PlacementKind};

fn extractor(algorithm: Algorithm, placement: PlacementKind) -> Extractor {
    Extractor::new(MesherConfig {
        algorithm,
        placement,
        ..MesherConfig::default()
    })
    .expect("benchmark config is valid")
}

fn benchmark_mesh_region(c: &mut Criterion) {
    let grid = Grid::new();
    hill_terrain(&grid);
    let region = hill_region();

    let cases = [
        ("marching_cubes", extractor(Algorithm::MarchingCubes, PlacementKind::Naive)),
        ("surface_nets_naive", extractor(Algorithm::SurfaceNets, PlacementKind::Naive)),
        (
            "surface_nets_dual_contouring",
            extractor(Algorithm::SurfaceNets, PlacementKind::DualContouring),
        ),
    ];

    let mut group = c.benchmark_group("mesh_region");
    group.throughput(Throughput::Elements(region.volume() as u64));
    group.sample_size(20);
    for (name, extractor) in &cases {
        group.bench_function(*name, |b| {
            b.iter(|| extractor.mesh_region(black_box(&grid), black_box(region)));
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_mesh_region);
criterion_main!(benches);
