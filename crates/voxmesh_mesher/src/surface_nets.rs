//! # Surface Nets
//!
//! One shared vertex per active cell, connected by quads.
//!
//! ## Passes
//!
//! 1. Sample the field on the lattice
//! 2. For every cube with a nonzero edge mask, collect the crossings of its
//!    edges and let the [`VertexPlacement`] policy reduce them to a vertex
//! 3. For every lattice edge whose ends straddle the threshold, emit a quad
//!    joining the vertices of the 4 cubes around that edge
//! 4. Optionally blend each quad's face normal into its corner normals
//! 5. Optionally weld normals across the whole mesh
//!
//! Quads are only emitted around lattice edges whose 4 surrounding cubes
//! all exist, so an edge needs a cube on the low side of both axes spanning
//! its quad. Cubes on the lattice boundary still get a vertex, which may end
//! up without faces.

use glam::{UVec3, Vec3};
use voxmesh_field::{Orientation, ScalarField};

use crate::lattice::{sample_lattice, sign_index, Lattice, LatticeSamples};
use crate::mesh::{Mesh, MeshVertex};
use crate::mesher::Mesher;
use crate::placement::{EdgeCrossing, Hermite, Naive, VertexPlacement};
use crate::tables::{CORNER_OFFSETS, EDGE_CORNERS, EDGE_TABLE};

/// Default weld grid resolution, in steps per cell.
pub const DEFAULT_WELD_SUBDIVISIONS: u32 = 16;

/// For each quad axis: the two axes spanning the quad.
const QUAD_PLANES: [(usize, usize); 3] = [(1, 2), (0, 2), (0, 1)];

/// Whether the cell cycle `p, p-u, p-u-v, p-v` winds counter-clockwise
/// around the positive direction of each axis.
const CYCLE_POSITIVE: [bool; 3] = [true, false, true];

/// Surface Nets extractor, generic over the vertex placement policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceNets<P = Naive> {
    /// Surface threshold.
    pub isolevel: f32,
    /// Places the vertex of each active cell.
    pub placement: P,
    /// Blend quad face normals into vertex normals.
    pub refine_normals: bool,
    /// Weld grid resolution; `None` skips the weld pass.
    pub weld: Option<u32>,
}

impl Default for SurfaceNets<Naive> {
    fn default() -> Self {
        Self::new(0.0, Naive)
    }
}

/// Vertex bookkeeping for one active cell.
#[derive(Debug, Clone, Copy)]
struct CellVertex {
    index: u32,
    /// Centroid of the raw edge crossings, before placement.
    naive: Vec3,
}

impl<P: VertexPlacement> SurfaceNets<P> {
    /// Creates an extractor with refinement on and welding off.
    #[must_use]
    pub const fn new(isolevel: f32, placement: P) -> Self {
        Self {
            isolevel,
            placement,
            refine_normals: true,
            weld: None,
        }
    }

    /// Enables or disables normal refinement.
    #[must_use]
    pub const fn with_refine_normals(mut self, refine: bool) -> Self {
        self.refine_normals = refine;
        self
    }

    /// Welds normals on a grid of `subdivisions` steps per cell.
    #[must_use]
    pub const fn with_weld(mut self, subdivisions: u32) -> Self {
        self.weld = Some(subdivisions);
        self
    }

    /// Extracts a mesh.
    pub fn extract<F: ScalarField + ?Sized>(&self, field: &F, lattice: &Lattice) -> Mesh {
        self.extract_with_cells(field, lattice).0
    }

    /// Extracts a mesh and, for every vertex, the lattice cube it was placed
    /// in.
    pub fn extract_with_cells<F: ScalarField + ?Sized>(
        &self,
        field: &F,
        lattice: &Lattice,
    ) -> (Mesh, Vec<UVec3>) {
        let samples = sample_lattice(field, lattice);
        let orientation = field.orientation();
        let mut mesh = Mesh::new();

        let (cell_vertices, cells) = self.place_vertices(field, &samples, orientation, &mut mesh);
        let quads = self.emit_quads(&samples, &cell_vertices, orientation, &mut mesh);

        if let Some(subdivisions) = self.weld {
            mesh.weld_normals(lattice.origin(), lattice.cell_size(), subdivisions);
        }

        tracing::debug!(
            samples = lattice.sample_count(),
            active_cells = cells.len(),
            quads,
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "surface nets extracted"
        );

        (mesh, cells)
    }

    /// Places one vertex in every cube with a nonzero edge mask.
    fn place_vertices<F: ScalarField + ?Sized>(
        &self,
        field: &F,
        samples: &LatticeSamples,
        orientation: Orientation,
        mesh: &mut Mesh,
    ) -> (Vec<Option<CellVertex>>, Vec<UVec3>) {
        let lattice = samples.lattice();
        let cell_size = lattice.cell_size();
        let cubes = lattice.cubes();

        // Indexed like the samples; the last slice on each axis stays empty.
        let mut cell_vertices = vec![None; lattice.sample_count()];
        let mut cells = Vec::new();
        let mut crossings: Vec<Hermite> = Vec::with_capacity(12);

        for z in 0..cubes.z {
            for y in 0..cubes.y {
                for x in 0..cubes.x {
                    let corners = samples.cube(x, y, z);
                    let edge_mask = EDGE_TABLE[sign_index(&corners, self.isolevel) as usize];
                    if edge_mask == 0 {
                        continue;
                    }

                    let corner = lattice.point(x, y, z);
                    crossings.clear();
                    for (edge, &[a, b]) in EDGE_CORNERS.iter().enumerate() {
                        if edge_mask & (1 << edge) == 0 {
                            continue;
                        }
                        let crossing = EdgeCrossing {
                            corner,
                            p0: local_corner(a, cell_size),
                            p1: local_corner(b, cell_size),
                            g0: corners[a],
                            g1: corners[b],
                        };
                        crossings.push(self.placement.intersect(field, self.isolevel, &crossing));
                    }

                    let naive = crossings.iter().map(|h| h.position).sum::<Vec3>()
                        / crossings.len() as f32;
                    let placed = self.placement.average(&crossings, cell_size, corner);
                    let normal = orientation.outward(placed.normal).normalize_or_zero();

                    let index = mesh.push_vertex(MeshVertex::new(corner + placed.position, normal));
                    cell_vertices[lattice.index(x, y, z)] = Some(CellVertex {
                        index,
                        naive: corner + naive,
                    });
                    cells.push(UVec3::new(x, y, z));
                }
            }
        }

        (cell_vertices, cells)
    }

    /// Emits quads around sign-changing lattice edges and returns
    /// how many were emitted.
    fn emit_quads(
        &self,
        samples: &LatticeSamples,
        cell_vertices: &[Option<CellVertex>],
        orientation: Orientation,
        mesh: &mut Mesh,
    ) -> usize {
        let lattice = samples.lattice();
        let dims = lattice.dims();
        let cell_size = lattice.cell_size();
        let vertex_count = mesh.vertex_count();

        // Refined normals are accumulated per vertex and normalized at the end.
        let mut refined = if self.refine_normals {
            vec![Vec3::ZERO; vertex_count]
        } else {
            Vec::new()
        };
        let mut quads = 0;

        for z in 0..dims.z - 1 {
            for y in 0..dims.y - 1 {
                for x in 0..dims.x - 1 {
                    let p = [x, y, z];
                    let p_below = samples.get(x, y, z).iso < self.isolevel;

                    for (axis, &(u, v)) in QUAD_PLANES.iter().enumerate() {
                        if p[u] == 0 || p[v] == 0 {
                            continue;
                        }
                        let mut q = p;
                        q[axis] += 1;
                        let q_below = samples.get(q[0], q[1], q[2]).iso < self.isolevel;
                        if p_below == q_below {
                            continue;
                        }

                        let cell = |du: u32, dv: u32| {
                            let mut c = p;
                            c[u] -= du;
                            c[v] -= dv;
                            cell_vertices[lattice.index(c[0], c[1], c[2])]
                        };
                        let (Some(c0), Some(c1), Some(c2), Some(c3)) =
                            (cell(0, 0), cell(1, 0), cell(1, 1), cell(0, 1))
                        else {
                            continue;
                        };

                        // Front faces point from the solid towards the empty side.
                        let q_outside = q_below == orientation.below_is_outside();
                        let ring = if q_outside == CYCLE_POSITIVE[axis] {
                            [c0, c1, c2, c3]
                        } else {
                            [c0, c3, c2, c1]
                        };

                        emit_quad(mesh, &ring);
                        if self.refine_normals {
                            refine_quad(mesh, &ring, cell_size, &mut refined);
                        }
                        quads += 1;
                    }
                }
            }
        }

        if self.refine_normals {
            for (vertex, sum) in mesh.vertices.iter_mut().zip(&refined) {
                if *sum != Vec3::ZERO {
                    vertex.normal = sum.normalize_or_zero().to_array();
                }
            }
        }

        quads
    }
}

impl<P: VertexPlacement> Mesher for SurfaceNets<P> {
    fn generate<F: ScalarField + ?Sized>(&self, field: &F, lattice: &Lattice) -> Mesh {
        self.extract(field, lattice)
    }
}

#[inline]
fn local_corner(corner: usize, cell_size: f32) -> Vec3 {
    let [x, y, z] = CORNER_OFFSETS[corner];
    Vec3::new(x as f32, y as f32, z as f32) * cell_size
}

/// Two triangles along the shorter diagonal of a counter-clockwise ring.
fn emit_quad(mesh: &mut Mesh, ring: &[CellVertex; 4]) {
    let p = |i: usize| mesh.vertices[ring[i].index as usize].position();
    let [a, b, c, d] = ring.map(|v| v.index);

    if p(0).distance_squared(p(2)) <= p(1).distance_squared(p(3)) {
        mesh.push_triangle(a, b, c);
        mesh.push_triangle(a, c, d);
    } else {
        mesh.push_triangle(a, b, d);
        mesh.push_triangle(b, c, d);
    }
}

/// Face normal of a quad ring, taken at the corner whose two adjacent
/// edges span the largest area.
fn quad_normal(p: [Vec3; 4]) -> Vec3 {
    let edge = |i: usize| p[i].distance_squared(p[(i + 1) % 4]);
    let e = [edge(0), edge(1), edge(2), edge(3)];

    let (best, _) = (0..4).fold((0, f32::NEG_INFINITY), |(best, best_weight), i| {
        let weight = e[i] * e[(i + 1) % 4];
        if weight > best_weight {
            (i, weight)
        } else {
            (best, best_weight)
        }
    });

    // Corner between edges `best` and `best + 1`.
    let o = p[(best + 1) % 4];
    (p[(best + 2) % 4] - o)
        .cross(p[best] - o)
        .normalize_or_zero()
}

/// Adds the quad's face normal, blended with each corner's own normal, to
/// the per-vertex accumulators.
///
/// Corners close to their naive centroid mostly take the face normal,
/// which hides per-quad faceting. Corners the placement moved far away sit
/// on a feature and mostly keep their own normal.
fn refine_quad(mesh: &Mesh, ring: &[CellVertex; 4], cell_size: f32, refined: &mut [Vec3]) {
    let positions = ring.map(|v| mesh.vertices[v.index as usize].position());
    let face = quad_normal(positions);
    let inv_cell2 = 1.0 / (cell_size * cell_size);

    for (cv, position) in ring.iter().zip(positions) {
        let own = mesh.vertices[cv.index as usize].normal();
        let k = (position.distance_squared(cv.naive) * inv_cell2).min(1.0);
        let k = 1.0 - (1.0 - k) * (1.0 - k);
        refined[cv.index as usize] += face.lerp(own, k).normalize_or_zero();
    }
}
