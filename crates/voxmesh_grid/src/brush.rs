//! Editing brushes.
//!
//! Brushes are read-modify-write helpers on top of `Grid::read` and
//! `Grid::write`. They touch only the bounding region of the stroke.

use glam::{IVec3, Vec3};

use crate::grid::Grid;
use crate::region::Region;

/// Additive spherical brush.
///
/// Occupancy falls off linearly from `strength` at the center to zero at
/// `radius`, and never lowers existing occupancy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereBrush {
    /// Stroke center in cell coordinates.
    pub center: Vec3,
    /// Stroke radius in cells.
    pub radius: f32,
    /// Occupancy at the center.
    pub strength: u8,
    /// Material assigned to cells the stroke raises from empty.
    pub material: Option<u8>,
}

impl SphereBrush {
    /// Default center occupancy.
    pub const DEFAULT_STRENGTH: u8 = 200;

    /// Creates a brush with default strength that keeps existing materials.
    #[must_use]
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius,
            strength: Self::DEFAULT_STRENGTH,
            material: None,
        }
    }

    /// Sets the center occupancy.
    #[must_use]
    pub const fn with_strength(mut self, strength: u8) -> Self {
        self.strength = strength;
        self
    }

    /// Sets the material painted into previously empty cells.
    #[must_use]
    pub const fn with_material(mut self, material: u8) -> Self {
        self.material = Some(material);
        self
    }

    /// Cells the stroke can affect.
    #[must_use]
    pub fn region(&self) -> Region {
        let min = (self.center - self.radius).floor().as_ivec3();
        let max = (self.center + self.radius).ceil().as_ivec3();
        Region::new(min, max.max(min))
    }

    /// Applies the stroke to the grid.
    pub fn apply(&self, grid: &Grid) {
        if self.radius <= 0.0 {
            return;
        }

        let region = self.region();
        let mut cells = grid.read(region);
        let begin = region.begin();

        for z in 0..cells.depth() {
            for y in 0..cells.height() {
                for x in 0..cells.width() {
                    let at = begin + IVec3::new(x as i32, y as i32, z as i32);
                    let distance = self.center.distance(at.as_vec3());
                    let falloff = 1.0 - (distance / self.radius).clamp(0.0, 1.0);
                    let occupancy = (falloff * f32::from(self.strength)) as u8;

                    let cell = cells.get_mut(x, y, z);
                    if occupancy > cell.occupancy {
                        if let (true, Some(material)) = (cell.is_empty(), self.material) {
                            cell.material = material;
                        }
                        cell.occupancy = occupancy;
                    }
                }
            }
        }

        grid.write(region, &cells);
    }
}
