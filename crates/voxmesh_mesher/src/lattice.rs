//! # Sampling Lattice
//!
//! The regular grid of points a field is evaluated at before extraction.
//! Both extractors sample every lattice point exactly once into a
//! `LatticeSamples` buffer and then walk the unit cubes between them.

use glam::{UVec3, Vec3};
use voxmesh_field::{GridVertex, ScalarField};
use voxmesh_grid::Region;

use crate::error::{MeshError, MeshResult};
use crate::tables::CORNER_OFFSETS;

/// Regular sampling lattice: `dims` points per axis, `cell_size` apart,
/// starting at `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lattice {
    origin: Vec3,
    cell_size: f32,
    dims: UVec3,
}

impl Lattice {
    /// Creates a lattice with `dims` sample points per axis.
    ///
    /// # Errors
    ///
    /// `DegenerateLattice` if any axis has fewer than two samples (no
    /// cubes), `InvalidCellSize` if `cell_size` is not positive and finite.
    pub fn new(origin: Vec3, cell_size: f32, dims: UVec3) -> MeshResult<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(MeshError::InvalidCellSize(cell_size));
        }
        if dims.min_element() < 2 {
            return Err(MeshError::DegenerateLattice { dims });
        }
        Ok(Self {
            origin,
            cell_size,
            dims,
        })
    }

    /// Covers `[min, max]` with cubes of edge `cubesize`. The cube count per
    /// axis is the extent divided by `cubesize`, rounded to nearest.
    ///
    /// # Errors
    ///
    /// Same as [`Lattice::new`]; an extent shorter than half a cube is
    /// degenerate.
    pub fn from_bounds(min: Vec3, max: Vec3, cubesize: f32) -> MeshResult<Self> {
        if !(cubesize.is_finite() && cubesize > 0.0) {
            return Err(MeshError::InvalidCellSize(cubesize));
        }
        let cubes = ((max - min) / cubesize).round().max(Vec3::ZERO);
        Self::new(min, cubesize, cubes.as_uvec3() + UVec3::ONE)
    }

    /// One sample per cell of `region`, cell `c` sampled at `c * cell_size`.
    ///
    /// # Errors
    ///
    /// Same as [`Lattice::new`].
    pub fn for_region(region: &Region, cell_size: f32) -> MeshResult<Self> {
        let origin = region.begin().as_vec3() * cell_size;
        Self::new(origin, cell_size, region.size().max(glam::IVec3::ZERO).as_uvec3())
    }

    /// World position of the first sample.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Distance between neighboring samples.
    #[inline]
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Samples per axis.
    #[inline]
    #[must_use]
    pub const fn dims(&self) -> UVec3 {
        self.dims
    }

    /// Cubes per axis.
    #[inline]
    #[must_use]
    pub fn cubes(&self) -> UVec3 {
        self.dims - UVec3::ONE
    }

    /// Total number of samples.
    #[inline]
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.dims.x as usize * self.dims.y as usize * self.dims.z as usize
    }

    /// Linear index of a sample (X fastest).
    #[inline]
    #[must_use]
    pub fn index(&self, x: u32, y: u32, z: u32) -> usize {
        debug_assert!(x < self.dims.x && y < self.dims.y && z < self.dims.z);
        x as usize + self.dims.x as usize * (y as usize + self.dims.y as usize * z as usize)
    }

    /// World position of a sample.
    #[inline]
    #[must_use]
    pub fn point(&self, x: u32, y: u32, z: u32) -> Vec3 {
        self.origin + UVec3::new(x, y, z).as_vec3() * self.cell_size
    }
}

/// Field values at every lattice point.
#[derive(Debug, Clone)]
pub struct LatticeSamples {
    lattice: Lattice,
    samples: Vec<GridVertex>,
}

impl LatticeSamples {
    /// Lattice the samples were taken on.
    #[inline]
    #[must_use]
    pub const fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Sample at a lattice point.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u32, y: u32, z: u32) -> GridVertex {
        self.samples[self.lattice.index(x, y, z)]
    }

    /// The eight corner samples of the cube whose lowest corner is
    /// `(x, y, z)`, in sign index order.
    #[must_use]
    pub fn cube(&self, x: u32, y: u32, z: u32) -> [GridVertex; 8] {
        CORNER_OFFSETS.map(|[dx, dy, dz]| self.get(x + dx, y + dy, z + dz))
    }

    /// All samples (X fastest).
    #[inline]
    #[must_use]
    pub fn samples(&self) -> &[GridVertex] {
        &self.samples
    }
}

/// Evaluates `field` once at every point of `lattice`.
pub fn sample_lattice<F: ScalarField + ?Sized>(field: &F, lattice: &Lattice) -> LatticeSamples {
    let dims = lattice.dims();
    let mut samples = Vec::with_capacity(lattice.sample_count());

    for z in 0..dims.z {
        for y in 0..dims.y {
            for x in 0..dims.x {
                samples.push(field.sample(lattice.point(x, y, z)));
            }
        }
    }

    LatticeSamples {
        lattice: *lattice,
        samples,
    }
}

/// Sign index of eight corner samples: bit `i` set when corner `i` is below
/// `isolevel`.
#[inline]
#[must_use]
pub fn sign_index(corners: &[GridVertex; 8], isolevel: f32) -> u8 {
    corners
        .iter()
        .enumerate()
        .fold(0u8, |acc, (i, g)| if g.iso < isolevel { acc | (1 << i) } else { acc })
}
