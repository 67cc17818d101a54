//! # VOXMESH
//!
//! Converts volumetric fields into triangle meshes and stores the voxel
//! data behind them.
//!
//! ## Crates
//!
//! - [`grid`]: sparse chunked storage of occupancy cells
//! - [`field`]: scalar fields with exact gradients (SDF trees, voxel boxes)
//! - [`mesher`]: Marching Cubes, Surface Nets and vertex placement policies
//!
//! ## Example
//!
//! ```rust
//! use glam::IVec3;
//! use voxmesh::{Cell, Extractor, Grid, MesherConfig, Region};
//!
//! let grid = Grid::new();
//! grid.fill(Region::cube(IVec3::ZERO, 4), Cell::solid(1));
//!
//! let extractor = Extractor::new(MesherConfig::default()).unwrap();
//! let mesh = extractor.mesh_region(&grid, Region::cube(IVec3::ZERO, 4)).unwrap();
//! assert!(mesh.triangle_count() > 0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod extractor;
pub mod terrain;

pub use voxmesh_field as field;
pub use voxmesh_grid as grid;
pub use voxmesh_mesher as mesher;

pub use extractor::{Extractor, REGION_PADDING};
pub use voxmesh_field::{GridVertex, Orientation, ScalarField, SdfNode, VoxelField};
pub use voxmesh_grid::{Cell, Grid, GridError, Region, SphereBrush, VoxelBox};
pub use voxmesh_mesher::{
    Algorithm, Lattice, MarchingCubes, Mesh, MeshError, MeshResult, MeshVertex, Mesher,
    MesherConfig, PlacementKind, SurfaceNets,
};
