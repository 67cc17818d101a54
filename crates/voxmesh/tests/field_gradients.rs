//! # Field Gradient Tests
//!
//! Gradients from dual numbers against central finite differences.

use glam::{Quat, Vec3};
use voxmesh::{ScalarField, SdfNode};

const STEP: f32 = 1e-3;

fn finite_difference(field: &SdfNode, p: Vec3) -> Vec3 {
    let d = |axis: Vec3| (field.distance(p + axis * STEP) - field.distance(p - axis * STEP)) / (2.0 * STEP);
    Vec3::new(d(Vec3::X), d(Vec3::Y), d(Vec3::Z))
}

/// Test: sphere of radius 5 sampled on its surface.
#[test]
fn test_sphere_surface_sample() {
    let sphere = SdfNode::sphere(5.0);
    let sample = sphere.sample(Vec3::new(5.0, 0.0, 0.0));

    assert!(sample.iso.abs() < 1e-6);
    assert!((sample.gradient - Vec3::X).length() < 1e-6);
    assert!((sample.gradient - finite_difference(&sphere, Vec3::new(5.0, 0.0, 0.0))).length() < 1e-2);
}

/// Test: a composed scene agrees with finite differences away from seams.
#[test]
fn test_composed_scene_matches_finite_differences() {
    let scene = SdfNode::sphere(3.0)
        .subtract(SdfNode::cuboid(Vec3::new(4.0, 1.0, 1.0)))
        .union(
            SdfNode::cone(1.5, 3.0)
                .rotate(Quat::from_rotation_z(0.3))
                .translate(Vec3::new(0.0, 5.0, 0.0)),
        )
        .twist(0.15);

    let points = [
        Vec3::new(2.0, 2.1, 0.7),
        Vec3::new(-1.3, -2.4, 1.9),
        Vec3::new(0.4, 4.2, 0.3),
        Vec3::new(3.5, 0.2, -2.2),
        Vec3::new(-0.6, 6.5, 0.9),
    ];

    for p in points {
        let sample = scene.sample(p);
        assert!((sample.iso - scene.distance(p)).abs() < 1e-6);
        let fd = finite_difference(&scene, p);
        assert!(
            (sample.gradient - fd).length() < 2e-2,
            "at {p}: exact {} vs fd {fd}",
            sample.gradient
        );
    }
}
