//! Voxel cell.

use bytemuck::{Pod, Zeroable};

/// A single voxel cell - packed into 2 bytes.
///
/// Occupancy acts as a discretized density: 0 is empty, 255 is fully solid.
/// The material byte is carried through storage untouched.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Cell {
    /// Occupancy (0 = empty, 255 = solid).
    pub occupancy: u8,
    /// Material ID.
    pub material: u8,
}

impl Cell {
    /// Empty cell. This is what never-written coordinates read back as.
    pub const EMPTY: Self = Self { occupancy: 0, material: 0 };

    /// Creates a new cell.
    #[inline]
    #[must_use]
    pub const fn new(occupancy: u8, material: u8) -> Self {
        Self { occupancy, material }
    }

    /// Creates a fully solid cell of the given material.
    #[inline]
    #[must_use]
    pub const fn solid(material: u8) -> Self {
        Self { occupancy: u8::MAX, material }
    }

    /// Returns true if occupancy is zero.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.occupancy == 0
    }

    /// Occupancy normalized to `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn density(self) -> f32 {
        f32::from(self.occupancy) / 255.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert_eq!(Cell::default(), Cell::EMPTY);
        assert!(Cell::default().is_empty());
        assert_eq!(std::mem::size_of::<Cell>(), 2);
    }

    #[test]
    fn test_density() {
        assert_eq!(Cell::new(0, 3).density(), 0.0);
        assert_eq!(Cell::solid(1).density(), 1.0);
    }
}
