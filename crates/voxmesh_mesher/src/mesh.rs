//! # Mesh Output
//!
//! The contract handed to rendering and collision: a vertex buffer of
//! position + normal and a triangle index buffer. Every index triple is one
//! counter-clockwise, front-facing triangle.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::{IVec3, Vec3};

// =============================================================================
// VERTEX FORMAT
// =============================================================================

/// Mesh vertex, laid out for direct upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    /// Position in world space [x, y, z]
    pub position: [f32; 3],
    /// Unit normal [nx, ny, nz]
    pub normal: [f32; 3],
}

impl MeshVertex {
    /// Creates a vertex.
    #[inline]
    #[must_use]
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }

    /// Position as a vector.
    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    /// Normal as a vector.
    #[inline]
    #[must_use]
    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }
}

// =============================================================================
// MESH
// =============================================================================

/// Triangle mesh produced by one extraction call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex buffer data
    pub vertices: Vec<MeshVertex>,
    /// Index buffer data, always a multiple of 3
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Creates an empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if nothing was extracted.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends a vertex and returns its index.
    #[inline]
    pub fn push_vertex(&mut self, vertex: MeshVertex) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    /// Appends one triangle.
    #[inline]
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Iterates over triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Axis-aligned bounds of all vertices, `None` for an empty mesh.
    #[must_use]
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.vertices.iter().map(MeshVertex::position);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }

    /// Vertex buffer as raw bytes.
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer as raw bytes.
    #[must_use]
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Rebuilds every normal from the faces around it.
    ///
    /// Positions are bucketed on a grid of `subdivisions` steps per cell,
    /// measured from `origin`. Each triangle adds its unnormalized face
    /// normal (so larger faces weigh more) to the buckets of its three
    /// corners, and every vertex then takes the normalized sum of its
    /// bucket. Vertices that coincide after quantization end up with the
    /// same normal, which removes seams between independently built faces.
    /// A bucket whose contributions cancel yields a zero normal.
    pub fn weld_normals(&mut self, origin: Vec3, cell_size: f32, subdivisions: u32) {
        let scale = subdivisions as f32 / cell_size;
        let key = |p: Vec3| -> IVec3 { ((p - origin) * scale + 0.5).floor().as_ivec3() };

        let mut buckets: HashMap<IVec3, Vec3> = HashMap::with_capacity(self.vertices.len());

        for [a, b, c] in self.triangles() {
            let p0 = self.vertices[a as usize].position();
            let p1 = self.vertices[b as usize].position();
            let p2 = self.vertices[c as usize].position();
            let face = (p1 - p0).cross(p2 - p0);

            for p in [p0, p1, p2] {
                *buckets.entry(key(p)).or_insert(Vec3::ZERO) += face;
            }
        }

        for vertex in &mut self.vertices {
            let sum = buckets
                .get(&key(vertex.position()))
                .copied()
                .unwrap_or(Vec3::ZERO);
            vertex.normal = sum.normalize_or_zero().to_array();
        }

        tracing::trace!(
            buckets = buckets.len(),
            vertices = self.vertices.len(),
            "welded normals"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        let mut mesh = Mesh::new();
        let n = Vec3::X;
        let a = mesh.push_vertex(MeshVertex::new(Vec3::new(0.0, 0.0, 0.0), n));
        let b = mesh.push_vertex(MeshVertex::new(Vec3::new(1.0, 0.0, 0.0), n));
        let c = mesh.push_vertex(MeshVertex::new(Vec3::new(1.0, 1.0, 0.0), n));
        let d = mesh.push_vertex(MeshVertex::new(Vec3::new(0.0, 1.0, 0.0), n));
        mesh.push_triangle(a, b, c);
        mesh.push_triangle(a, c, d);
        mesh
    }

    #[test]
    fn test_counts_and_bounds() {
        let mesh = quad();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(!mesh.is_empty());
        assert_eq!(mesh.bounds(), Some((Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0))));
        assert_eq!(mesh.vertex_bytes().len(), 4 * 24);
        assert_eq!(mesh.index_bytes().len(), 6 * 4);
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.bounds(), None);
    }

    #[test]
    fn test_weld_rebuilds_face_normals() {
        let mut mesh = quad();
        mesh.weld_normals(Vec3::ZERO, 1.0, 16);
        for v in &mesh.vertices {
            assert!((v.normal() - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn test_weld_merges_coincident_vertices() {
        // Two triangles meeting at a ridge along the x axis, with the shared
        // edge duplicated (and jittered below the bucket size).
        let mut mesh = Mesh::new();
        let up = Vec3::new(0.0, -1.0, 1.0).normalize();
        let v = |p: Vec3| MeshVertex::new(p, Vec3::ZERO);

        let a = mesh.push_vertex(v(Vec3::new(0.0, 0.0, 0.0)));
        let b = mesh.push_vertex(v(Vec3::new(1.0, 0.0, 0.0)));
        let c = mesh.push_vertex(v(Vec3::new(0.0, -1.0, -1.0)));
        mesh.push_triangle(a, c, b);

        let d = mesh.push_vertex(v(Vec3::new(0.001, 0.0, 0.0)));
        let e = mesh.push_vertex(v(Vec3::new(1.0, 0.001, 0.0)));
        let f = mesh.push_vertex(v(Vec3::new(0.0, 1.0, -1.0)));
        mesh.push_triangle(d, e, f);

        mesh.weld_normals(Vec3::ZERO, 1.0, 16);

        assert!(up.dot(mesh.vertices[c as usize].normal()) > 0.99);
        let ridge = mesh.vertices[a as usize].normal();
        assert!((ridge - Vec3::Z).length() < 1e-3);
        assert_eq!(mesh.vertices[a as usize].normal, mesh.vertices[d as usize].normal);
        assert_eq!(mesh.vertices[b as usize].normal, mesh.vertices[e as usize].normal);
    }
}
