//! Benchmark for both extractors on an analytic field.
//!
//! Run with: cargo bench --package voxmesh_mesher --bench mesher_benchmark

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glam::{Quat, UVec3, Vec3};
use voxmesh_field::SdfNode;
use voxmesh_mesher::{
    AdjustableNaive, DualContouring, Fixed, Lattice, MarchingCubes, Naive, SurfaceNets,
};

fn scene() -> SdfNode {
    SdfNode::sphere(6.0)
        .subtract(SdfNode::cuboid(Vec3::new(8.0, 2.0, 2.0)))
        .union(SdfNode::cone(3.0, 5.0).rotate(Quat::from_rotation_x(0.4)).twist(0.2))
}

fn lattice() -> Lattice {
    Lattice::new(Vec3::splat(-8.0), 0.25, UVec3::splat(65)).expect("valid bench lattice")
}

fn benchmark_marching_cubes(c: &mut Criterion) {
    let field = scene();
    let lattice = lattice();

    let mut group = c.benchmark_group("marching_cubes");
    group.throughput(Throughput::Elements(lattice.sample_count() as u64));
    for lod in [0u32, 1, 2] {
        group.bench_with_input(BenchmarkId::from_parameter(lod), &lod, |b, &lod| {
            let mc = MarchingCubes::new(0.0).with_lod(lod);
            b.iter(|| black_box(mc.extract(black_box(&field), &lattice)));
        });
    }
    group.finish();
}

fn benchmark_surface_nets(c: &mut Criterion) {
    let field = scene();
    let lattice = lattice();

    let mut group = c.benchmark_group("surface_nets");
    group.throughput(Throughput::Elements(lattice.sample_count() as u64));
    group.bench_function("naive", |b| {
        let nets = SurfaceNets::new(0.0, Naive);
        b.iter(|| black_box(nets.extract(black_box(&field), &lattice)));
    });
    group.bench_function("adjustable_fixed", |b| {
        let nets = SurfaceNets::new(0.0, AdjustableNaive::new(Fixed::default()));
        b.iter(|| black_box(nets.extract(black_box(&field), &lattice)));
    });
    group.bench_function("dual_contouring", |b| {
        let nets = SurfaceNets::new(0.0, DualContouring::default());
        b.iter(|| black_box(nets.extract(black_box(&field), &lattice)));
    });
    group.bench_function("naive_welded", |b| {
        let nets = SurfaceNets::new(0.0, Naive).with_weld(16);
        b.iter(|| black_box(nets.extract(black_box(&field), &lattice)));
    });
    group.finish();
}

criterion_group!(benches, benchmark_marching_cubes, benchmark_surface_nets);
criterion_main!(benches);
