//! # VOXMESH Field
//!
//! Scalar fields sampled by the mesh extractors.
//!
//! A field answers one question: given a point, what is the iso value and
//! which way does it increase? Continuous fields are `SdfNode` expression
//! trees evaluated with dual numbers, so the gradient is exact and costs no
//! extra evaluations. Discrete fields wrap a `VoxelBox` of occupancy cells
//! and report a fixed gradient.
//!
//! ## Example
//!
//! ```rust
//! use glam::Vec3;
//! use voxmesh_field::{ScalarField, SdfNode};
//!
//! let sphere = SdfNode::sphere(5.0);
//! let sample = sphere.sample(Vec3::new(5.0, 0.0, 0.0));
//! assert!(sample.iso.abs() < 1e-6);
//! assert!((sample.gradient - Vec3::X).length() < 1e-6);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod dual;
pub mod field;
pub mod sdf;
pub mod voxel_field;

pub use dual::{Dual3, DualVec3};
pub use field::{GridVertex, Orientation, ScalarField};
pub use sdf::SdfNode;
pub use voxel_field::VoxelField;
