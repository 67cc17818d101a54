//! Dense, owned 3-D cell arrays.

use glam::IVec3;

use crate::cell::Cell;
use crate::region::Region;

/// Dense 3-D array of cells.
///
/// Layout: `cells[x + width * (y + height * z)]`, so rows along X are
/// contiguous. New boxes are zero-filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoxelBox {
    width: u32,
    height: u32,
    depth: u32,
    cells: Vec<Cell>,
}

impl VoxelBox {
    /// Creates a zero-filled box.
    #[must_use]
    pub fn new(width: u32, height: u32, depth: u32) -> Self {
        let len = width as usize * height as usize * depth as usize;
        Self {
            width,
            height,
            depth,
            cells: vec![Cell::EMPTY; len],
        }
    }

    /// Creates a zero-filled box with the same extent as `region`.
    #[must_use]
    pub fn for_region(region: &Region) -> Self {
        let size = region.size();
        Self::new(size.x as u32, size.y as u32, size.z as u32)
    }

    /// Creates a box by evaluating `f` at every local coordinate.
    #[must_use]
    pub fn from_fn<F>(width: u32, height: u32, depth: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32, u32) -> Cell,
    {
        let mut result = Self::new(width, height, depth);
        for z in 0..depth {
            for y in 0..height {
                for x in 0..width {
                    let idx = result.index(x, y, z);
                    result.cells[idx] = f(x, y, z);
                }
            }
        }
        result
    }

    /// Width (X extent).
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height (Y extent).
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Depth (Z extent).
    #[inline]
    #[must_use]
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Extent as a vector, comparable with `Region::size`.
    #[inline]
    #[must_use]
    pub fn size(&self) -> IVec3 {
        IVec3::new(self.width as i32, self.height as i32, self.depth as i32)
    }

    /// Linear index of a local coordinate.
    ///
    /// # Panics
    ///
    /// Debug builds panic on out-of-bounds coordinates.
    #[inline]
    #[must_use]
    pub fn index(&self, x: u32, y: u32, z: u32) -> usize {
        debug_assert!(
            x < self.width && y < self.height && z < self.depth,
            "cell ({x}, {y}, {z}) outside {}x{}x{} box",
            self.width,
            self.height,
            self.depth
        );
        x as usize + self.width as usize * (y as usize + self.height as usize * z as usize)
    }

    /// Reads a cell.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u32, y: u32, z: u32) -> Cell {
        self.cells[self.index(x, y, z)]
    }

    /// Mutable access to a cell.
    #[inline]
    pub fn get_mut(&mut self, x: u32, y: u32, z: u32) -> &mut Cell {
        let idx = self.index(x, y, z);
        &mut self.cells[idx]
    }

    /// Writes a cell.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, z: u32, cell: Cell) {
        let idx = self.index(x, y, z);
        self.cells[idx] = cell;
    }

    /// Sets every cell to `cell`.
    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// All cells in storage order.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// All cells in storage order, mutable.
    #[inline]
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Copies the overlap of two regions from `source` into `self`.
    ///
    /// `self` covers `target_region`, `source` covers `source_region`. Each
    /// overlapping X row is copied as one slice.
    pub fn copy_from(&mut self, target_region: &Region, source: &Self, source_region: &Region) {
        let overlap = source_region.intersect(target_region);
        if overlap.is_empty() {
            return;
        }

        let source_offset = (overlap.begin() - source_region.begin()).as_uvec3();
        let target_offset = (overlap.begin() - target_region.begin()).as_uvec3();
        let size = overlap.size().as_uvec3();
        let run = size.x as usize;

        for z in 0..size.z {
            for y in 0..size.y {
                let src = source.index(source_offset.x, source_offset.y + y, source_offset.z + z);
                let dst = self.index(target_offset.x, target_offset.y + y, target_offset.z + z);
                self.cells[dst..dst + run].copy_from_slice(&source.cells[src..src + run]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zero_filled() {
        let b = VoxelBox::new(3, 4, 5);
        assert_eq!(b.cells().len(), 60);
        assert!(b.cells().iter().all(|c| *c == Cell::EMPTY));
    }

    #[test]
    fn test_x_fastest_layout() {
        let b = VoxelBox::new(3, 4, 5);
        assert_eq!(b.index(1, 0, 0), 1);
        assert_eq!(b.index(0, 1, 0), 3);
        assert_eq!(b.index(0, 0, 1), 12);
    }

    #[test]
    fn test_copy_from_partial_overlap() {
        let source_region = Region::new(IVec3::ZERO, IVec3::splat(4));
        let source = VoxelBox::from_fn(4, 4, 4, |x, y, z| Cell::new((x + y * 4 + z * 16) as u8, 1));

        let target_region = Region::new(IVec3::splat(2), IVec3::splat(6));
        let mut target = VoxelBox::for_region(&target_region);
        target.copy_from(&target_region, &source, &source_region);

        // Overlap is [2, 4) on each axis.
        assert_eq!(target.get(0, 0, 0), source.get(2, 2, 2));
        assert_eq!(target.get(1, 1, 1), source.get(3, 3, 3));
        assert_eq!(target.get(2, 0, 0), Cell::EMPTY);
        assert_eq!(target.get(3, 3, 3), Cell::EMPTY);
    }
}
