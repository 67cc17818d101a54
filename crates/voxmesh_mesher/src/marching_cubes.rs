//! # Marching Cubes
//!
//! Classic table-driven triangulation, one unit cube at a time.
//!
//! Each cube emits its own vertices, one per distinct crossed edge, so
//! neighboring cubes duplicate the vertices on their shared edges. Edge
//! interpolation always runs from the lower lattice corner to the upper
//! one, so those duplicates are bit-identical.
//!
//! ## LOD refinement
//!
//! With `lod > 0` every coarse cube is tessellated into a 3x3x3 grid whose
//! iso values are averages of the contributing corners and whose gradients
//! are copied from the nearest coarse corner. The 8 half-size sub-cubes are
//! refined again at `lod - 1`. This raises triangle density without any
//! additional field evaluations; interior values are approximations and
//! normals stay coarse.

use glam::Vec3;
use voxmesh_field::{GridVertex, Orientation, ScalarField};

use crate::lattice::{sample_lattice, sign_index, Lattice, LatticeSamples};
use crate::mesh::{Mesh, MeshVertex};
use crate::mesher::Mesher;
use crate::tables::{CORNER_OFFSETS, EDGE_CORNERS, EDGE_TABLE, TRI_TABLE};

/// Iso differences below this leave the crossing at the edge's first corner.
pub const EDGE_EPSILON: f32 = 1e-4;

/// Highest accepted LOD; each level multiplies cube count by 8.
pub const MAX_LOD: u32 = 4;

/// Marching cubes extractor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchingCubes {
    /// Surface threshold.
    pub isolevel: f32,
    /// Recursive refinement depth, clamped to `MAX_LOD`.
    pub lod: u32,
}

impl Default for MarchingCubes {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// One cube being polygonized: its lowest corner, edge length and samples.
#[derive(Clone, Copy)]
struct Cube {
    min: Vec3,
    size: f32,
    corners: [GridVertex; 8],
}

impl Cube {
    #[inline]
    fn corner_position(&self, corner: usize) -> Vec3 {
        let [x, y, z] = CORNER_OFFSETS[corner];
        self.min + Vec3::new(x as f32, y as f32, z as f32) * self.size
    }

    /// Splits into 8 half-size cubes without evaluating the field.
    fn refine(&self) -> [Self; 8] {
        // 3x3x3 grid, index x + 3 * (y + 3 * z)
        let mut grid = [GridVertex::default(); 27];
        for z in 0..3u32 {
            for y in 0..3u32 {
                for x in 0..3u32 {
                    let mut iso = 0.0;
                    let mut count = 0u32;
                    for (corner, offset) in CORNER_OFFSETS.iter().enumerate() {
                        let contributes = [x, y, z]
                            .iter()
                            .zip(offset)
                            .all(|(&g, &o)| g == 1 || g == 2 * o);
                        if contributes {
                            iso += self.corners[corner].iso;
                            count += 1;
                        }
                    }

                    let nearest = corner_at(x / 2, y / 2, z / 2);
                    grid[(x + 3 * (y + 3 * z)) as usize] =
                        GridVertex::new(iso / count as f32, self.corners[nearest].gradient);
                }
            }
        }

        let half = self.size * 0.5;
        let mut cubes = [*self; 8];
        for (sub, cube) in cubes.iter_mut().enumerate() {
            let [sx, sy, sz] = CORNER_OFFSETS[sub];
            cube.min = self.min + Vec3::new(sx as f32, sy as f32, sz as f32) * half;
            cube.size = half;
            for (corner, [dx, dy, dz]) in CORNER_OFFSETS.iter().enumerate() {
                cube.corners[corner] = grid[(sx + dx + 3 * (sy + dy + 3 * (sz + dz))) as usize];
            }
        }
        cubes
    }
}

/// Corner index for a unit offset.
#[inline]
fn corner_at(x: u32, y: u32, z: u32) -> usize {
    CORNER_OFFSETS
        .iter()
        .position(|&o| o == [x, y, z])
        .unwrap_or(0)
}

impl MarchingCubes {
    /// Creates an extractor with no refinement.
    #[inline]
    #[must_use]
    pub const fn new(isolevel: f32) -> Self {
        Self { isolevel, lod: 0 }
    }

    /// Sets the refinement depth.
    #[inline]
    #[must_use]
    pub const fn with_lod(mut self, lod: u32) -> Self {
        self.lod = lod;
        self
    }

    /// Samples `field` on `lattice` and polygonizes every cube.
    pub fn extract<F: ScalarField + ?Sized>(&self, field: &F, lattice: &Lattice) -> Mesh {
        let samples = sample_lattice(field, lattice);
        self.extract_samples(&samples, field.orientation())
    }

    /// Polygonizes pre-sampled values.
    #[must_use]
    pub fn extract_samples(&self, samples: &LatticeSamples, orientation: Orientation) -> Mesh {
        let lattice = samples.lattice();
        let cubes = lattice.cubes();
        let lod = self.lod.min(MAX_LOD);
        let mut mesh = Mesh::new();

        for z in 0..cubes.z {
            for y in 0..cubes.y {
                for x in 0..cubes.x {
                    let cube = Cube {
                        min: lattice.point(x, y, z),
                        size: lattice.cell_size(),
                        corners: samples.cube(x, y, z),
                    };
                    self.march(&mut mesh, &cube, lod, orientation);
                }
            }
        }

        tracing::debug!(
            samples = lattice.sample_count(),
            lod,
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "marching cubes extracted"
        );

        mesh
    }

    fn march(&self, mesh: &mut Mesh, cube: &Cube, lod: u32, orientation: Orientation) {
        let index = sign_index(&cube.corners, self.isolevel);
        if EDGE_TABLE[index as usize] == 0 {
            return;
        }

        if lod > 0 {
            for sub in &cube.refine() {
                self.march(mesh, sub, lod - 1, orientation);
            }
            return;
        }

        self.polygonize(mesh, cube, index, orientation);
    }

    fn polygonize(&self, mesh: &mut Mesh, cube: &Cube, index: u8, orientation: Orientation) {
        let edge_mask = EDGE_TABLE[index as usize];
        let mut edge_vertex = [0u32; 12];

        for (edge, &[a, b]) in EDGE_CORNERS.iter().enumerate() {
            if edge_mask & (1 << edge) == 0 {
                continue;
            }
            // Interpolate from the lower corner so shared edges agree exactly.
            let (lo, hi) = if corner_rank(a) < corner_rank(b) { (a, b) } else { (b, a) };
            let vertex = interpolate(
                self.isolevel,
                cube.corner_position(lo),
                cube.corner_position(hi),
                cube.corners[lo],
                cube.corners[hi],
                orientation,
            );
            edge_vertex[edge] = mesh.push_vertex(vertex);
        }

        for tri in TRI_TABLE[index as usize].chunks_exact(3) {
            if tri[0] < 0 {
                break;
            }
            let a = edge_vertex[tri[0] as usize];
            let b = edge_vertex[tri[1] as usize];
            let c = edge_vertex[tri[2] as usize];
            // Table triangles face the below side.
            if orientation.below_is_outside() {
                mesh.push_triangle(a, b, c);
            } else {
                mesh.push_triangle(a, c, b);
            }
        }
    }
}

impl Mesher for MarchingCubes {
    fn generate<F: ScalarField + ?Sized>(&self, field: &F, lattice: &Lattice) -> Mesh {
        self.extract(field, lattice)
    }
}

#[inline]
fn corner_rank(corner: usize) -> u32 {
    CORNER_OFFSETS[corner].iter().sum()
}

/// Crossing point on the edge `p0 -> p1`.
fn interpolate(
    isolevel: f32,
    p0: Vec3,
    p1: Vec3,
    g0: GridVertex,
    g1: GridVertex,
    orientation: Orientation,
) -> MeshVertex {
    let t = if (g0.iso - g1.iso).abs() > EDGE_EPSILON {
        (isolevel - g0.iso) / (g1.iso - g0.iso)
    } else {
        0.0
    };
    let position = p0.lerp(p1, t);
    let gradient = g0.gradient.lerp(g1.gradient, t);
    MeshVertex::new(position, orientation.outward(gradient).normalize_or_zero())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::UVec3;
    use voxmesh_field::SdfNode;

    fn unit_cube(index: u8) -> Cube {
        let mut corners = [GridVertex::new(1.0, Vec3::Z); 8];
        for (i, c) in corners.iter_mut().enumerate() {
            if index & (1 << i) != 0 {
                c.iso = 0.0;
            }
        }
        Cube {
            min: Vec3::ZERO,
            size: 1.0,
            corners,
        }
    }

    #[test]
    fn test_uniform_cubes_emit_nothing() {
        let mc = MarchingCubes::new(0.5);
        for index in [0x00, 0xFF] {
            let mut mesh = Mesh::new();
            mc.march(&mut mesh, &unit_cube(index), 0, Orientation::InsideBelow);
            assert!(mesh.is_empty());
            assert_eq!(mesh.vertex_count(), 0);
        }
    }

    #[test]
    fn test_single_corner_emits_one_triangle() {
        let mc = MarchingCubes::new(0.5);
        for corner in 0..8 {
            let mut mesh = Mesh::new();
            mc.march(&mut mesh, &unit_cube(1 << corner), 0, Orientation::InsideBelow);
            assert_eq!(mesh.triangle_count(), 1, "corner {corner}");
            assert_eq!(mesh.vertex_count(), 3);
        }
    }

    #[test]
    fn test_winding_faces_out_of_the_solid() {
        // Corner 0 below the threshold.
        let cube = unit_cube(0x01);
        let mc = MarchingCubes::new(0.5);

        let normal = |orientation| {
            let mut mesh = Mesh::new();
            mc.march(&mut mesh, &cube, 0, orientation);
            let [a, b, c] = mesh.triangles().next().unwrap();
            let p = |i: u32| mesh.vertices[i as usize].position();
            (p(b) - p(a)).cross(p(c) - p(a))
        };

        // Corner 0 is solid: the face points away from it.
        assert!(normal(Orientation::InsideBelow).dot(Vec3::ONE) > 0.0);
        // Corner 0 is empty: the face points towards it.
        assert!(normal(Orientation::InsideAbove).dot(Vec3::ONE) < 0.0);
    }

    #[test]
    fn test_flat_edge_falls_back_to_first_corner() {
        let g = GridVertex::new(0.5, Vec3::X);
        let v = interpolate(0.5, Vec3::ZERO, Vec3::X, g, g, Orientation::InsideBelow);
        assert_eq!(v.position(), Vec3::ZERO);
        assert_eq!(v.normal(), Vec3::X);
    }

    #[test]
    fn test_sphere_vertices_lie_on_surface() {
        let sphere = SdfNode::sphere(2.0);
        let lattice = Lattice::new(Vec3::splat(-3.0), 0.25, UVec3::splat(25)).unwrap();
        let mesh = MarchingCubes::new(0.0).extract(&sphere, &lattice);

        assert!(mesh.triangle_count() > 100);
        for v in &mesh.vertices {
            assert!((v.position().length() - 2.0).abs() < 0.05);
            assert!(v.normal().dot(v.position().normalize()) > 0.9);
        }
    }

    #[test]
    fn test_lod_refines_without_resampling() {
        let sphere = SdfNode::sphere(2.0);
        let lattice = Lattice::new(Vec3::splat(-3.0), 1.0, UVec3::splat(7)).unwrap();

        let coarse = MarchingCubes::new(0.0).extract(&sphere, &lattice);
        let fine = MarchingCubes::new(0.0).with_lod(2).extract(&sphere, &lattice);

        assert!(fine.triangle_count() > 4 * coarse.triangle_count());
        let (lo, hi) = fine.bounds().unwrap();
        assert!(lo.cmpge(Vec3::splat(-3.0)).all());
        assert!(hi.cmple(Vec3::splat(3.0)).all());
    }

    #[test]
    fn test_refine_averages_and_copies_gradients() {
        let mut cube = unit_cube(0x01);
        for (i, c) in cube.corners.iter_mut().enumerate() {
            c.gradient = Vec3::splat(i as f32);
        }
        let subs = cube.refine();

        // Sub-cube 0 keeps coarse corner 0 and gets the cube center as corner 6.
        assert_eq!(subs[0].corners[0].iso, 0.0);
        assert!((subs[0].corners[6].iso - 7.0 / 8.0).abs() < 1e-6);
        assert_eq!(subs[0].corners[6].gradient, Vec3::ZERO);
        // Edge midpoint between corners 0 and 1.
        assert!((subs[0].corners[1].iso - 0.5).abs() < 1e-6);
        // Sub-cube 6 reaches coarse corner 6 and inherits its gradient.
        assert_eq!(subs[6].corners[6].gradient, Vec3::splat(6.0));
        assert_eq!(subs[6].min, Vec3::splat(0.5));
        assert_eq!(subs[6].size, 0.5);
    }
}
