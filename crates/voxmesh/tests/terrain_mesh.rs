//! # Terrain Meshing Tests
//!
//! The demo hill world meshed through the extractor.

use glam::{IVec3, Vec3};
use voxmesh::mesher::BlendKind;
use voxmesh::terrain::{hill_region, hill_terrain};
use voxmesh::{Algorithm, Extractor, Grid, Mesh, MesherConfig, PlacementKind, Region, SphereBrush};

fn assert_well_formed(mesh: &Mesh, region: &Region) {
    assert!(mesh.triangle_count() > 0);
    assert_eq!(mesh.indices.len() % 3, 0);
    let count = mesh.vertex_count() as u32;
    assert!(mesh.indices.iter().all(|&i| i < count));

    let lo = (region.begin() - IVec3::ONE).as_vec3();
    let hi = region.end().as_vec3();
    for v in &mesh.vertices {
        let p = v.position();
        assert!(p.is_finite());
        assert!(p.cmpge(lo).all() && p.cmple(hi).all(), "{p} outside {lo}..{hi}");
        let length = v.normal().length();
        assert!(length < 1e-6 || (length - 1.0).abs() < 1e-3);
    }
}

/// Test: every algorithm and placement meshes the hill.
#[test]
fn test_hill_meshes_with_every_configuration() {
    let grid = Grid::new();
    hill_terrain(&grid);
    let region = hill_region();

    let placements = [
        PlacementKind::Naive,
        PlacementKind::Adjustable {
            blend: BlendKind::Jitter {
                seed: 11,
                amplitude: 0.3,
            },
        },
        PlacementKind::DualContouring,
    ];

    let mc = Extractor::new(MesherConfig {
        algorithm: Algorithm::MarchingCubes,
        ..MesherConfig::default()
    })
    .unwrap();
    assert_well_formed(&mc.mesh_region(&grid, region).unwrap(), &region);

    for placement in placements {
        let extractor = Extractor::new(MesherConfig {
            placement,
            ..MesherConfig::default()
        })
        .unwrap();
        assert_well_formed(&extractor.mesh_region(&grid, region).unwrap(), &region);
    }
}

/// Test: the ground layer meshes as an upward-facing floor near the plain.
#[test]
fn test_plain_faces_up() {
    let grid = Grid::new();
    hill_terrain(&grid);

    // Far from the hill the surface is the top of the z < 5 layer.
    let region = Region::new(IVec3::new(-30, -30, 0), IVec3::new(-22, -22, 12));
    let mesh = Extractor::default().mesh_region(&grid, region).unwrap();

    let mut up = 0;
    for v in &mesh.vertices {
        let p = v.position();
        if p.z > 3.0 && p.z < 6.0 && p.x > -29.0 && p.x < -23.0 && p.y > -29.0 && p.y < -23.0 {
            assert!(v.normal().dot(Vec3::Z) > 0.99);
            up += 1;
        }
    }
    assert!(up > 0);
}

/// Test: brushing new material changes the mesh only near the brush.
#[test]
fn test_brush_edit_grows_surface() {
    let grid = Grid::new();
    hill_terrain(&grid);
    let region = Region::new(IVec3::new(-30, -30, 0), IVec3::new(-10, -10, 16));
    let extractor = Extractor::default();

    let before = extractor.mesh_region(&grid, region).unwrap();
    SphereBrush::new(Vec3::new(-20.0, -20.0, 6.0), 3.0)
        .with_strength(255)
        .apply(&grid);
    let after = extractor.mesh_region(&grid, region).unwrap();

    assert!(after.triangle_count() > before.triangle_count());
    let (_, hi_before) = before.bounds().unwrap();
    let (_, hi_after) = after.bounds().unwrap();
    assert!(hi_after.z > hi_before.z);
}
