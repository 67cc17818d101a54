//! # Vertex Placement
//!
//! Surface Nets places exactly one vertex in every active cell. Where it
//! goes is decided by a [`VertexPlacement`] policy in two steps:
//!
//! 1. `intersect` finds where the surface crosses one cell edge
//! 2. `average` reduces all crossings of the cell to a single vertex
//!
//! Policies are resolved at compile time: the extractor is generic over
//! the policy, and [`PlacementKind`] maps configuration onto one of the
//! monomorphized variants.
//!
//! Positions handed to and returned from a policy are cell-local: relative
//! to the cell's lowest corner, in world units. Normals are field gradient
//! directions; the extractor orients them afterwards.

use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};
use voxmesh_field::{GridVertex, ScalarField};

use crate::blend::{Blend, BlendKind, Smooth};
use crate::marching_cubes::EDGE_EPSILON;

/// A surface crossing: point plus normal.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Hermite {
    /// Cell-local position.
    pub position: Vec3,
    /// Surface normal, unit length unless degenerate.
    pub normal: Vec3,
}

impl Hermite {
    /// Creates a crossing.
    #[inline]
    #[must_use]
    pub const fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

/// One crossed cell edge, as seen by a placement policy.
#[derive(Debug, Clone, Copy)]
pub struct EdgeCrossing {
    /// World position of the cell's lowest corner.
    pub corner: Vec3,
    /// Cell-local position of the edge's first end.
    pub p0: Vec3,
    /// Cell-local position of the edge's second end.
    pub p1: Vec3,
    /// Lattice sample at `p0`.
    pub g0: GridVertex,
    /// Lattice sample at `p1`.
    pub g1: GridVertex,
}

/// Strategy for placing the single vertex of an active cell.
pub trait VertexPlacement {
    /// Locates the surface on one crossed edge.
    fn intersect<F: ScalarField + ?Sized>(
        &self,
        field: &F,
        isolevel: f32,
        edge: &EdgeCrossing,
    ) -> Hermite;

    /// Reduces a cell's crossings (never empty) to one vertex.
    fn average(&self, points: &[Hermite], cell_size: f32, corner: Vec3) -> Hermite;
}

/// Mean position and mean normal.
fn centroid(points: &[Hermite]) -> Hermite {
    let n = points.len().max(1) as f32;
    let (position, normal) = points
        .iter()
        .fold((Vec3::ZERO, Vec3::ZERO), |(p, g), h| (p + h.position, g + h.normal));
    Hermite::new(position / n, normal / n)
}

/// Linear interpolation between the two lattice samples.
fn lerp_crossing(isolevel: f32, edge: &EdgeCrossing) -> Hermite {
    let t = if (edge.g0.iso - edge.g1.iso).abs() > EDGE_EPSILON {
        (isolevel - edge.g0.iso) / (edge.g1.iso - edge.g0.iso)
    } else {
        0.0
    };
    Hermite::new(
        edge.p0.lerp(edge.p1, t),
        edge.g0.gradient.lerp(edge.g1.gradient, t).normalize_or_zero(),
    )
}

// =============================================================================
// NAIVE
// =============================================================================

/// Centroid of the interpolated edge crossings.
///
/// Cheap, but ignores curvature: sharp and concave features come out
/// faceted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Naive;

impl VertexPlacement for Naive {
    #[inline]
    fn intersect<F: ScalarField + ?Sized>(
        &self,
        _field: &F,
        isolevel: f32,
        edge: &EdgeCrossing,
    ) -> Hermite {
        lerp_crossing(isolevel, edge)
    }

    #[inline]
    fn average(&self, points: &[Hermite], _cell_size: f32, _corner: Vec3) -> Hermite {
        centroid(points)
    }
}

// =============================================================================
// ADJUSTABLE NAIVE
// =============================================================================

/// Naive crossings, with the centroid passed through a [`Blend`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AdjustableNaive<B = Smooth> {
    /// Maps the centroid to the final position.
    pub blend: B,
}

impl<B: Blend> AdjustableNaive<B> {
    /// Creates the policy.
    #[inline]
    #[must_use]
    pub const fn new(blend: B) -> Self {
        Self { blend }
    }
}

impl<B: Blend> VertexPlacement for AdjustableNaive<B> {
    #[inline]
    fn intersect<F: ScalarField + ?Sized>(
        &self,
        _field: &F,
        isolevel: f32,
        edge: &EdgeCrossing,
    ) -> Hermite {
        lerp_crossing(isolevel, edge)
    }

    fn average(&self, points: &[Hermite], cell_size: f32, corner: Vec3) -> Hermite {
        let naive = centroid(points);
        let center = Vec3::splat(cell_size * 0.5);
        Hermite::new(self.blend.blend(corner, naive.position, center), naive.normal)
    }
}

// =============================================================================
// DUAL CONTOURING
// =============================================================================

/// Exact crossings and a least-squares vertex.
///
/// `intersect` bisects the edge against the field itself, so crossings are
/// not limited by the linear lattice interpolation, and takes the exact
/// gradient there. `average` minimizes the quadratic error
/// `sum((n_i . (x - p_i))^2)` over all crossing planes, which lets the
/// vertex sit on sharp creases and corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualContouring {
    /// Bisection steps per edge.
    pub bisection_steps: u32,
    /// Conjugate gradient steps of the QEF solve.
    pub solver_steps: u32,
}

impl DualContouring {
    /// Default bisection steps per edge.
    pub const BISECTION_STEPS: u32 = 10;
    /// Default conjugate gradient steps.
    pub const SOLVER_STEPS: u32 = 3;
    /// Inner products below this stop the solver.
    pub const SOLVER_EPSILON: f32 = 1e-8;
}

impl Default for DualContouring {
    fn default() -> Self {
        Self {
            bisection_steps: Self::BISECTION_STEPS,
            solver_steps: Self::SOLVER_STEPS,
        }
    }
}

impl VertexPlacement for DualContouring {
    fn intersect<F: ScalarField + ?Sized>(
        &self,
        field: &F,
        isolevel: f32,
        edge: &EdgeCrossing,
    ) -> Hermite {
        let below = edge.g0.iso < isolevel;
        let (mut a, mut b) = (edge.p0, edge.p1);

        for _ in 0..self.bisection_steps {
            let mid = (a + b) * 0.5;
            if (field.value(edge.corner + mid) < isolevel) == below {
                a = mid;
            } else {
                b = mid;
            }
        }

        let position = (a + b) * 0.5;
        let normal = field.sample(edge.corner + position).gradient.normalize_or_zero();
        Hermite::new(position, normal)
    }

    fn average(&self, points: &[Hermite], _cell_size: f32, _corner: Vec3) -> Hermite {
        let naive = centroid(points);
        let position = solve_qef(points, naive.position, self.solver_steps);
        Hermite::new(position, naive.normal)
    }
}

/// Minimizes `sum((n . (x - p))^2)` with conjugate gradient on the normal
/// equations `AtA x = Atb`, starting at `seed`. Returns `seed` if the
/// system is too degenerate to produce a finite answer.
#[must_use]
pub fn solve_qef(points: &[Hermite], seed: Vec3, steps: u32) -> Vec3 {
    let mut ata = Mat3::ZERO;
    let mut atb = Vec3::ZERO;
    for h in points {
        let n = h.normal;
        ata += Mat3::from_cols(n * n.x, n * n.y, n * n.z);
        atb += n * n.dot(h.position);
    }

    let mut x = seed;
    let mut r = atb - ata * x;
    let mut p = r;

    for _ in 0..steps {
        let rr = r.dot(r);
        if rr < DualContouring::SOLVER_EPSILON {
            break;
        }
        let ap = ata * p;
        let pap = p.dot(ap);
        if pap < DualContouring::SOLVER_EPSILON {
            break;
        }
        let alpha = rr / pap;
        x += p * alpha;
        r -= ap * alpha;
        p = r + p * (r.dot(r) / rr);
    }

    if x.is_finite() {
        x
    } else {
        seed
    }
}

// =============================================================================
// CONFIGURABLE PLACEMENT
// =============================================================================

/// Placement policy chosen by configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacementKind {
    /// [`Naive`]
    #[default]
    Naive,
    /// [`AdjustableNaive`] with a configured blend.
    Adjustable {
        /// Blend applied to the centroid.
        #[serde(default)]
        blend: BlendKind,
    },
    /// [`DualContouring`] with default step counts.
    DualContouring,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blend::Fixed;
    use voxmesh_field::SdfNode;

    fn edge<F: ScalarField>(field: &F, corner: Vec3, p0: Vec3, p1: Vec3) -> EdgeCrossing {
        EdgeCrossing {
            corner,
            p0,
            p1,
            g0: field.sample(corner + p0),
            g1: field.sample(corner + p1),
        }
    }

    #[test]
    fn test_naive_interpolates_lattice_samples() {
        let plane = SdfNode::plane(Vec3::Z, 0.25);
        let e = edge(&plane, Vec3::ZERO, Vec3::ZERO, Vec3::Z);
        let h = Naive.intersect(&plane, 0.0, &e);
        assert!((h.position - Vec3::new(0.0, 0.0, 0.25)).length() < 1e-6);
        assert!((h.normal - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_bisection_refines_against_the_field() {
        // Linear interpolation of a sphere's distance along a chord is off
        // the surface; bisection is not.
        let sphere = SdfNode::sphere(1.0);
        let corner = Vec3::new(0.0, 0.5, 0.0);
        let e = edge(&sphere, corner, Vec3::ZERO, Vec3::X);

        let naive = Naive.intersect(&sphere, 0.0, &e);
        let exact = DualContouring::default().intersect(&sphere, 0.0, &e);

        let on_sphere = |h: Hermite| ((corner + h.position).length() - 1.0).abs();
        assert!(on_sphere(exact) < 1e-3);
        assert!(on_sphere(naive) > on_sphere(exact));
        assert!((exact.normal - (corner + exact.position).normalize()).length() < 1e-3);
    }

    #[test]
    fn test_qef_keeps_planar_vertex_on_plane() {
        let normal = Vec3::new(0.3, -0.2, 1.0).normalize();
        let points: Vec<Hermite> = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        ]
        .iter()
        .map(|&p| Hermite::new(p - normal * normal.dot(p - Vec3::splat(0.5)), normal))
        .collect();

        let v = DualContouring::default().average(&points, 1.0, Vec3::ZERO);
        assert!(normal.dot(v.position - Vec3::splat(0.5)).abs() < 1e-4);
    }

    #[test]
    fn test_qef_finds_crease() {
        let points = [
            Hermite::new(Vec3::new(0.55, 0.0, 0.0), Vec3::X),
            Hermite::new(Vec3::new(0.55, 0.0, 1.0), Vec3::X),
            Hermite::new(Vec3::new(0.0, 0.45, 0.0), Vec3::Y),
            Hermite::new(Vec3::new(0.0, 0.45, 1.0), Vec3::Y),
        ];
        let naive = Naive.average(&points, 1.0, Vec3::ZERO);
        let qef = DualContouring::default().average(&points, 1.0, Vec3::ZERO);

        assert!((naive.position - Vec3::new(0.275, 0.225, 0.5)).length() < 1e-6);
        assert!((qef.position - Vec3::new(0.55, 0.45, 0.5)).length() < 1e-4);
    }

    #[test]
    fn test_qef_degenerate_falls_back_to_seed() {
        let points = [Hermite::new(Vec3::splat(0.5), Vec3::ZERO)];
        let seed = Vec3::new(0.1, 0.2, 0.3);
        assert_eq!(solve_qef(&points, seed, 3), seed);

        let nan = [Hermite::new(Vec3::splat(0.5), Vec3::splat(f32::NAN))];
        assert_eq!(solve_qef(&nan, seed, 3), seed);
    }

    #[test]
    fn test_adjustable_applies_blend() {
        let points = [Hermite::new(Vec3::ZERO, Vec3::Z)];
        let policy = AdjustableNaive::new(Fixed { factor: 1.0 });
        let v = policy.average(&points, 2.0, Vec3::ZERO);
        assert_eq!(v.position, Vec3::ONE);
        assert_eq!(v.normal, Vec3::Z);

        let smooth = AdjustableNaive::<Smooth>::default().average(&points, 2.0, Vec3::ZERO);
        assert_eq!(smooth.position, Vec3::ZERO);
    }
}
