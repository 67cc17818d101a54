//! Sparse chunked voxel grid.
//!
//! The grid maps chunk coordinates to 32^3 chunks. Chunks are created the
//! first time a write touches them and are never removed. Reads of
//! coordinates that were never written return empty cells.

use std::collections::HashMap;

use glam::IVec3;
use parking_lot::RwLock;

use crate::cell::Cell;
use crate::chunk::{Chunk, ChunkCoord};
use crate::error::{GridError, GridResult};
use crate::region::Region;
use crate::voxel_box::VoxelBox;

/// Initial chunk map capacity.
const INITIAL_CHUNK_CAPACITY: usize = 64;

/// Sparse voxel grid.
///
/// Thread-safe: the chunk map sits behind a `RwLock`, so lazy chunk creation
/// cannot race between concurrent writers. Readers must still serialize
/// against writers if they need a consistent snapshot across several calls.
pub struct Grid {
    chunks: RwLock<HashMap<ChunkCoord, Chunk>>,
}

impl Grid {
    /// Creates an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunks: RwLock::new(HashMap::with_capacity(INITIAL_CHUNK_CAPACITY)),
        }
    }

    /// Copies `region` out of the grid into a freshly allocated box.
    ///
    /// Cells of chunks that do not exist stay empty.
    #[must_use]
    pub fn read(&self, region: Region) -> VoxelBox {
        let mut result = VoxelBox::for_region(&region);
        let chunks = self.chunks.read();

        for coord in ChunkCoord::covering(&region) {
            if let Some(chunk) = chunks.get(&coord) {
                result.copy_from(&region, chunk.cells(), &chunk.region());
            }
        }

        result
    }

    /// Copies `source` into the grid at `region`, creating chunks as needed.
    ///
    /// The box size must equal the region size. Violating that is a
    /// programming error: debug builds panic, release builds log and copy
    /// nothing. Use [`Grid::try_write`] for a recoverable check.
    ///
    /// # Panics
    ///
    /// Debug builds panic if `source.size() != region.size()`.
    pub fn write(&self, region: Region, source: &VoxelBox) {
        if let Err(err) = self.try_write(region, source) {
            tracing::error!(%err, "grid write rejected");
            if cfg!(debug_assertions) {
                panic!("grid write rejected: {err}");
            }
        }
    }

    /// Checked variant of [`Grid::write`].
    ///
    /// # Errors
    ///
    /// Returns `GridError::SizeMismatch` if the box does not match the region.
    pub fn try_write(&self, region: Region, source: &VoxelBox) -> GridResult<()> {
        if source.size() != region.size() {
            return Err(GridError::SizeMismatch {
                region_size: region.size(),
                box_size: source.size(),
            });
        }

        let mut chunks = self.chunks.write();
        for coord in ChunkCoord::covering(&region) {
            let chunk = chunk_mut(&mut chunks, coord);
            let chunk_region = chunk.region();
            chunk.cells_mut().copy_from(&chunk_region, source, &region);
        }

        Ok(())
    }

    /// Fills `region` with a single cell value.
    pub fn fill(&self, region: Region, cell: Cell) {
        let mut cells = VoxelBox::for_region(&region);
        cells.fill(cell);
        self.write(region, &cells);
    }

    /// Reads a single cell.
    #[must_use]
    pub fn get_cell(&self, cell: IVec3) -> Cell {
        let coord = ChunkCoord::from_cell(cell);
        let local = (cell - coord.origin()).as_uvec3();

        self.chunks
            .read()
            .get(&coord)
            .map_or(Cell::EMPTY, |chunk| chunk.cells().get(local.x, local.y, local.z))
    }

    /// Writes a single cell, creating its chunk if needed.
    pub fn set_cell(&self, cell: IVec3, value: Cell) {
        let coord = ChunkCoord::from_cell(cell);
        let local = (cell - coord.origin()).as_uvec3();

        chunk_mut(&mut self.chunks.write(), coord)
            .cells_mut()
            .set(local.x, local.y, local.z, value);
    }

    /// Returns the number of allocated chunks.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.read().len()
    }

    /// Returns true if the chunk has been allocated.
    #[must_use]
    pub fn contains_chunk(&self, coord: ChunkCoord) -> bool {
        self.chunks.read().contains_key(&coord)
    }

    /// Coordinates of all allocated chunks, in no particular order.
    #[must_use]
    pub fn chunk_coords(&self) -> Vec<ChunkCoord> {
        self.chunks.read().keys().copied().collect()
    }
}

/// Looks up a chunk, creating it on first touch.
fn chunk_mut(chunks: &mut HashMap<ChunkCoord, Chunk>, coord: ChunkCoord) -> &mut Chunk {
    chunks.entry(coord).or_insert_with(|| {
        tracing::trace!(x = coord.x, y = coord.y, z = coord.z, "chunk created");
        Chunk::new(coord)
    })
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::CHUNK_SIZE;

    fn pattern(region: &Region) -> VoxelBox {
        let size = region.size().as_uvec3();
        VoxelBox::from_fn(size.x, size.y, size.z, |x, y, z| {
            Cell::new(((x * 7 + y * 13 + z * 29) % 251) as u8 + 1, (x % 3) as u8)
        })
    }

    #[test]
    fn test_read_unwritten_is_empty() {
        let grid = Grid::new();
        let region = Region::new(IVec3::splat(-40), IVec3::splat(40));
        let cells = grid.read(region);
        assert!(cells.cells().iter().all(|c| *c == Cell::EMPTY));
        assert_eq!(grid.chunk_count(), 0);
    }

    #[test]
    fn test_write_read_roundtrip_across_chunks() {
        let grid = Grid::new();
        let region = Region::new(IVec3::new(-35, -3, 20), IVec3::new(10, 40, 70));
        let cells = pattern(&region);

        grid.write(region, &cells);
        assert_eq!(grid.read(region), cells);
    }

    #[test]
    fn test_chunks_created_lazily() {
        let grid = Grid::new();
        let region = Region::new(IVec3::new(30, 0, 0), IVec3::new(34, 4, 4));
        grid.write(region, &pattern(&region));

        assert_eq!(grid.chunk_count(), 2);
        assert!(grid.contains_chunk(ChunkCoord::new(0, 0, 0)));
        assert!(grid.contains_chunk(ChunkCoord::new(1, 0, 0)));
    }

    #[test]
    fn test_disjoint_writes_do_not_interfere() {
        let grid = Grid::new();
        let a = Region::new(IVec3::ZERO, IVec3::splat(5));
        let b = Region::new(IVec3::new(5, 0, 0), IVec3::new(9, 5, 5));

        let cells_a = pattern(&a);
        grid.write(a, &cells_a);
        let mut cells_b = VoxelBox::for_region(&b);
        cells_b.fill(Cell::solid(9));
        grid.write(b, &cells_b);

        assert_eq!(grid.read(a), cells_a);
        assert_eq!(grid.read(b), cells_b);
    }

    #[test]
    fn test_read_larger_than_written() {
        let grid = Grid::new();
        let written = Region::cube(IVec3::ZERO, 2);
        grid.fill(written, Cell::solid(1));

        let region = Region::cube(IVec3::splat(-1), 4);
        let cells = grid.read(region);
        assert_eq!(cells.get(1, 1, 1), Cell::solid(1));
        assert_eq!(cells.get(2, 2, 2), Cell::solid(1));
        assert_eq!(cells.get(0, 0, 0), Cell::EMPTY);
        assert_eq!(cells.get(3, 3, 3), Cell::EMPTY);
    }

    #[test]
    fn test_try_write_size_mismatch() {
        let grid = Grid::new();
        let region = Region::cube(IVec3::ZERO, 4);
        let err = grid.try_write(region, &VoxelBox::new(4, 4, 3)).unwrap_err();
        assert_eq!(
            err,
            GridError::SizeMismatch {
                region_size: IVec3::splat(4),
                box_size: IVec3::new(4, 4, 3),
            }
        );
        assert_eq!(grid.chunk_count(), 0);
    }

    #[test]
    fn test_cell_access_negative_coords() {
        let grid = Grid::new();
        let at = IVec3::new(-1, -(CHUNK_SIZE as i32), 5);
        grid.set_cell(at, Cell::new(128, 2));
        assert_eq!(grid.get_cell(at), Cell::new(128, 2));
        assert_eq!(grid.get_cell(at + IVec3::X), Cell::EMPTY);
        assert!(grid.contains_chunk(ChunkCoord::new(-1, -1, 0)));
    }

    #[test]
    fn test_set_cell_and_write_share_chunks() {
        let grid = Grid::new();
        grid.set_cell(IVec3::ONE, Cell::solid(3));
        assert_eq!(grid.chunk_count(), 1);

        let region = Region::cube(IVec3::splat(4), 2);
        grid.fill(region, Cell::solid(5));
        assert_eq!(grid.chunk_count(), 1);
        assert_eq!(grid.get_cell(IVec3::ONE), Cell::solid(3));
        assert_eq!(grid.get_cell(IVec3::splat(5)), Cell::solid(5));

        grid.set_cell(IVec3::splat(CHUNK_SIZE as i32), Cell::solid(7));
        assert_eq!(grid.chunk_count(), 2);
        assert!(grid.contains_chunk(ChunkCoord::new(1, 1, 1)));
    }

    #[test]
    fn test_concurrent_writers() {
        let grid = Grid::new();
        std::thread::scope(|scope| {
            for i in 0..4 {
                let grid = &grid;
                scope.spawn(move || {
                    let region = Region::cube(IVec3::new(i * 40, 0, 0), 8);
                    grid.fill(region, Cell::solid(i as u8));
                });
            }
        });

        assert_eq!(grid.chunk_count(), 4);
        for i in 0..4 {
            assert_eq!(grid.get_cell(IVec3::new(i * 40 + 3, 3, 3)), Cell::solid(i as u8));
        }
    }
}
