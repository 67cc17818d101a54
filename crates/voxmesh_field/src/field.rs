//! The scalar field contract shared by every extractor.

use glam::Vec3;

/// One field sample: iso value and gradient.
///
/// Produced per lattice point during an extraction pass and discarded
/// afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GridVertex {
    /// Field value.
    pub iso: f32,
    /// Direction of increasing iso. Not necessarily unit length.
    pub gradient: Vec3,
}

impl GridVertex {
    /// Creates a sample.
    #[inline]
    #[must_use]
    pub const fn new(iso: f32, gradient: Vec3) -> Self {
        Self { iso, gradient }
    }
}

/// Which side of the iso-threshold is solid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Values below the threshold are inside (signed distance fields).
    #[default]
    InsideBelow,
    /// Values above the threshold are inside (occupancy and density).
    InsideAbove,
}

impl Orientation {
    /// Turns a field gradient into an outward-facing direction.
    #[inline]
    #[must_use]
    pub fn outward(self, gradient: Vec3) -> Vec3 {
        match self {
            Self::InsideBelow => gradient,
            Self::InsideAbove => -gradient,
        }
    }

    /// Returns true if the region below the threshold is outside the solid.
    #[inline]
    #[must_use]
    pub const fn below_is_outside(self) -> bool {
        matches!(self, Self::InsideAbove)
    }
}

/// A field that can be sampled anywhere in space.
pub trait ScalarField {
    /// Samples value and gradient at a point.
    fn sample(&self, position: Vec3) -> GridVertex;

    /// Samples only the value.
    fn value(&self, position: Vec3) -> f32 {
        self.sample(position).iso
    }

    /// Which side of the threshold is solid.
    fn orientation(&self) -> Orientation {
        Orientation::InsideBelow
    }
}

impl<F: ScalarField + ?Sized> ScalarField for &F {
    #[inline]
    fn sample(&self, position: Vec3) -> GridVertex {
        (**self).sample(position)
    }

    #[inline]
    fn value(&self, position: Vec3) -> f32 {
        (**self).value(position)
    }

    #[inline]
    fn orientation(&self) -> Orientation {
        (**self).orientation()
    }
}
