//! # VOXMESH Grid
//!
//! Sparse storage for arbitrarily large, mostly empty voxel worlds.
//!
//! ## Design Principles
//!
//! 1. **Sparse**: chunks exist only where something was written
//! 2. **Region addressed**: all bulk access goes through half-open integer boxes
//! 3. **Row copies**: cell runs along X are contiguous and copied as slices
//!
//! ## Core Components
//!
//! - `Cell`: occupancy + material byte pair
//! - `Region`: half-open integer box `[begin, end)`
//! - `VoxelBox`: dense, owned 3-D cell array (X fastest)
//! - `Grid`: chunk map with `read(region)` / `write(region, box)`
//! - `SphereBrush`: additive spherical occupancy brush
//!
//! ## Example
//!
//! ```rust
//! use glam::IVec3;
//! use voxmesh_grid::{Cell, Grid, Region, VoxelBox};
//!
//! let grid = Grid::new();
//! let region = Region::new(IVec3::new(-2, -2, -2), IVec3::new(2, 2, 2));
//!
//! let mut cells = VoxelBox::new(4, 4, 4);
//! cells.fill(Cell::new(255, 1));
//! grid.write(region, &cells);
//!
//! assert_eq!(grid.read(region), cells);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod brush;
pub mod cell;
pub mod chunk;
pub mod error;
pub mod grid;
pub mod region;
pub mod voxel_box;

pub use brush::SphereBrush;
pub use cell::Cell;
pub use chunk::{Chunk, ChunkCoord, CHUNK_SIZE, CHUNK_SIZE_LOG2, CHUNK_VOLUME};
pub use error::{GridError, GridResult};
pub use grid::Grid;
pub use region::Region;
pub use voxel_box::VoxelBox;
