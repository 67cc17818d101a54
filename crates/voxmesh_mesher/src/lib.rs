//! # VOXMESH Mesher
//!
//! Isosurface extraction from any [`ScalarField`](voxmesh_field::ScalarField).
//!
//! ## Extractors
//!
//! - [`MarchingCubes`]: per-cube table triangulation, optional recursive
//!   LOD refinement without extra field evaluations
//! - [`SurfaceNets`]: one vertex per active cell joined by quads, generic
//!   over a [`VertexPlacement`] policy:
//!   - [`Naive`]: centroid of the edge crossings
//!   - [`AdjustableNaive`]: centroid passed through a [`Blend`]
//!   - [`DualContouring`]: bisected crossings and a QEF-solved vertex
//!
//! Both produce a [`Mesh`] of position + normal vertices and triangle
//! indices whose front faces point out of the solid.
//!
//! ## Example
//!
//! ```rust
//! use glam::{UVec3, Vec3};
//! use voxmesh_field::SdfNode;
//! use voxmesh_mesher::{DualContouring, Lattice, SurfaceNets};
//!
//! let field = SdfNode::cuboid(Vec3::splat(1.0));
//! let lattice = Lattice::new(Vec3::splat(-2.0), 0.25, UVec3::splat(17)).unwrap();
//!
//! let mesh = SurfaceNets::new(0.0, DualContouring::default()).extract(&field, &lattice);
//! assert!(mesh.triangle_count() > 0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod blend;
pub mod config;
pub mod error;
pub mod lattice;
pub mod marching_cubes;
pub mod mesh;
pub mod mesher;
pub mod placement;
pub mod surface_nets;
pub mod tables;

pub use blend::{Axis, Blend, BlendKind, Fixed, Gated, HeightSmoothstep, Jitter, Quantize, Smooth};
pub use config::{Algorithm, MesherConfig, DEFAULT_ISOLEVEL};
pub use error::{MeshError, MeshResult};
pub use lattice::{sample_lattice, sign_index, Lattice, LatticeSamples};
pub use marching_cubes::{MarchingCubes, MAX_LOD};
pub use mesh::{Mesh, MeshVertex};
pub use mesher::Mesher;
pub use placement::{
    solve_qef, AdjustableNaive, DualContouring, EdgeCrossing, Hermite, Naive, PlacementKind,
    VertexPlacement,
};
pub use surface_nets::{SurfaceNets, DEFAULT_WELD_SUBDIVISIONS};
