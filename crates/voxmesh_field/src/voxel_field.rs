//! Occupancy grids viewed as a scalar field.
//!
//! The iso value is `occupancy / 255`. There is nothing to differentiate,
//! so every sample reports the same fixed gradient; shading built on these
//! normals is lower fidelity than for continuous fields. Extractors can
//! rebuild normals from geometry instead (see the mesher's weld pass).

use glam::{IVec3, Vec3};
use voxmesh_grid::{Region, VoxelBox};

use crate::field::{GridVertex, Orientation, ScalarField};

/// Coordinates this close to an integer are treated as lattice points.
const SNAP_EPSILON: f32 = 1e-4;

/// A box of cells placed in world space.
#[derive(Debug, Clone)]
pub struct VoxelField {
    cells: VoxelBox,
    origin: IVec3,
    cell_size: f32,
}

impl VoxelField {
    /// Gradient reported by every sample.
    pub const DEFAULT_GRADIENT: Vec3 = Vec3::Z;

    /// Wraps `cells`, whose cell (0, 0, 0) sits at cell coordinate `origin`.
    /// Cell `c` is sampled at world position `c * cell_size`.
    #[must_use]
    pub fn new(cells: VoxelBox, origin: IVec3, cell_size: f32) -> Self {
        Self {
            cells,
            origin,
            cell_size,
        }
    }

    /// Wraps a box previously read from `region`.
    #[must_use]
    pub fn from_region(cells: VoxelBox, region: &Region, cell_size: f32) -> Self {
        debug_assert_eq!(cells.size(), region.size());
        Self::new(cells, region.begin(), cell_size)
    }

    /// Cell region covered by the field.
    #[must_use]
    pub fn region(&self) -> Region {
        Region::with_size(self.origin, self.cells.size())
    }

    /// Distance between neighboring samples.
    #[inline]
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Underlying cells.
    #[inline]
    #[must_use]
    pub const fn cells(&self) -> &VoxelBox {
        &self.cells
    }

    /// Density at a local cell, clamped to the box.
    #[inline]
    fn density(&self, local: IVec3) -> f32 {
        let max = self.cells.size() - IVec3::ONE;
        let c = local.clamp(IVec3::ZERO, max.max(IVec3::ZERO)).as_uvec3();
        self.cells.get(c.x, c.y, c.z).density()
    }
}

impl ScalarField for VoxelField {
    /// Lattice points read their cell exactly; anything in between is
    /// trilinearly interpolated from the eight surrounding cells.
    fn sample(&self, position: Vec3) -> GridVertex {
        let local = position / self.cell_size - self.origin.as_vec3();
        let snapped = local.round();

        let iso = if (local - snapped).abs().max_element() < SNAP_EPSILON {
            self.density(snapped.as_ivec3())
        } else {
            let base = local.floor();
            let t = local - base;
            let b = base.as_ivec3();

            let c000 = self.density(b);
            let c100 = self.density(b + IVec3::X);
            let c010 = self.density(b + IVec3::Y);
            let c110 = self.density(b + IVec3::new(1, 1, 0));
            let c001 = self.density(b + IVec3::Z);
            let c101 = self.density(b + IVec3::new(1, 0, 1));
            let c011 = self.density(b + IVec3::new(0, 1, 1));
            let c111 = self.density(b + IVec3::ONE);

            let x00 = c000 + (c100 - c000) * t.x;
            let x10 = c010 + (c110 - c010) * t.x;
            let x01 = c001 + (c101 - c001) * t.x;
            let x11 = c011 + (c111 - c011) * t.x;
            let y0 = x00 + (x10 - x00) * t.y;
            let y1 = x01 + (x11 - x01) * t.y;
            y0 + (y1 - y0) * t.z
        };

        GridVertex::new(iso, Self::DEFAULT_GRADIENT)
    }

    fn orientation(&self) -> Orientation {
        Orientation::InsideAbove
    }
}
