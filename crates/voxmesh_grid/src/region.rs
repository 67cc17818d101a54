//! Half-open integer boxes in cell coordinates.

use glam::IVec3;

/// Axis-aligned half-open box `[begin, end)` in cell coordinates.
///
/// `end` is never smaller than `begin` on any axis, so `size()` is never
/// negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    begin: IVec3,
    end: IVec3,
}

impl Region {
    /// Creates a region from its corners.
    ///
    /// # Panics
    ///
    /// Debug builds panic if `begin > end` on any axis.
    #[inline]
    #[must_use]
    pub fn new(begin: IVec3, end: IVec3) -> Self {
        debug_assert!(
            begin.cmple(end).all(),
            "region begin {begin} must not exceed end {end}"
        );
        Self { begin, end: end.max(begin) }
    }

    /// Creates a region from a corner and a per-axis size.
    #[inline]
    #[must_use]
    pub fn with_size(begin: IVec3, size: IVec3) -> Self {
        Self::new(begin, begin + size)
    }

    /// Creates a cube-shaped region with edge length `size`.
    #[inline]
    #[must_use]
    pub fn cube(begin: IVec3, size: i32) -> Self {
        Self::with_size(begin, IVec3::splat(size))
    }

    /// Inclusive lower corner.
    #[inline]
    #[must_use]
    pub const fn begin(&self) -> IVec3 {
        self.begin
    }

    /// Exclusive upper corner.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> IVec3 {
        self.end
    }

    /// Extent along each axis.
    #[inline]
    #[must_use]
    pub fn size(&self) -> IVec3 {
        self.end - self.begin
    }

    /// Number of cells covered.
    #[inline]
    #[must_use]
    pub fn volume(&self) -> usize {
        let size = self.size();
        size.x as usize * size.y as usize * size.z as usize
    }

    /// Returns true if any axis has zero extent.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.begin.cmpeq(self.end).any()
    }

    /// Returns true if the cell lies inside the region.
    #[inline]
    #[must_use]
    pub fn contains(&self, cell: IVec3) -> bool {
        cell.cmpge(self.begin).all() && cell.cmplt(self.end).all()
    }

    /// Clamps two regions to their overlap.
    ///
    /// Disjoint regions produce an empty region, never a negative extent.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        let begin = self.begin.max(other.begin);
        let end = self.end.min(other.end);
        Self { begin, end: begin.max(end) }
    }

    /// Grows the region by `amount` cells on every side.
    #[must_use]
    pub fn expand(&self, amount: i32) -> Self {
        Self::new(self.begin - IVec3::splat(amount), self.end + IVec3::splat(amount))
    }
}
