//! # Terrain Demo
//!
//! Builds the hill world, digs a crater and piles up a mound with sphere
//! brushes, then meshes the result with every extractor.
//!
//! ```bash
//! # Built-in extractor set
//! cargo run --bin terrain_demo
//!
//! # One extractor from a config file
//! cargo run --bin terrain_demo -- mesher.toml
//! ```

use std::time::Instant;

use glam::Vec3;
use voxmesh::mesher::BlendKind;
use voxmesh::terrain::{hill_region, hill_terrain};
use voxmesh::{Algorithm, Extractor, Grid, MeshResult, MesherConfig, PlacementKind, SphereBrush};

fn main() {
    println!("═══════════════════════════════════════════════════════════════════");
    println!("                      VOXMESH TERRAIN DEMO");
    println!("═══════════════════════════════════════════════════════════════════");
    println!();

    if let Err(err) = run() {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
}

fn run() -> MeshResult<()> {
    let grid = Grid::new();
    let started = Instant::now();
    hill_terrain(&grid);

    // A mound on the hill's flank and a crater on the plain.
    SphereBrush::new(Vec3::new(8.0, 0.0, 9.0), 4.0)
        .with_strength(255)
        .with_material(2)
        .apply(&grid);
    SphereBrush::new(Vec3::new(-20.0, -20.0, 4.0), 6.0).apply(&grid);

    println!(
        "  World:    {} chunks written in {:?}",
        grid.chunk_count(),
        started.elapsed()
    );
    println!();

    let configs = match std::env::args().nth(1) {
        Some(path) => vec![(path.clone(), MesherConfig::load(path)?)],
        None => builtin_configs(),
    };

    for (name, config) in configs {
        let extractor = Extractor::new(config)?;
        let started = Instant::now();
        let mesh = extractor.mesh_region(&grid, hill_region())?;
        let elapsed = started.elapsed();

        let (lo, hi) = mesh.bounds().unwrap_or_default();
        println!(
            "  {name:<28} {:>7} vertices {:>7} triangles  {elapsed:>10.2?}",
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        println!("  {:<28} bounds {lo:.2} .. {hi:.2}", "");
    }

    println!();
    println!("✓ Done");
    Ok(())
}

fn builtin_configs() -> Vec<(String, MesherConfig)> {
    let base = MesherConfig::default();
    let mut configs = vec![
        (
            "marching_cubes".to_string(),
            MesherConfig {
                algorithm: Algorithm::MarchingCubes,
                ..base.clone()
            },
        ),
        (
            "marching_cubes lod 1".to_string(),
            MesherConfig {
                algorithm: Algorithm::MarchingCubes,
                lod: 1,
                ..base.clone()
            },
        ),
        ("surface_nets naive".to_string(), base.clone()),
    ];

    for (name, blend) in [
        ("surface_nets fixed", BlendKind::Fixed { factor: 0.5 }),
        ("surface_nets terraced", BlendKind::HeightSmoothstep { low: 6.0, high: 10.0 }),
        ("surface_nets jitter", BlendKind::Jitter { seed: 7, amplitude: 0.3 }),
        ("surface_nets quantized", BlendKind::Quantize { step: 1.0 / 3.0 }),
    ] {
        configs.push((
            name.to_string(),
            MesherConfig {
                placement: PlacementKind::Adjustable { blend },
                ..base.clone()
            },
        ));
    }

    configs.push((
        "surface_nets dual_contouring".to_string(),
        MesherConfig {
            placement: PlacementKind::DualContouring,
            ..base
        },
    ));
    configs
}
