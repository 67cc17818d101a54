//! Voxel chunk data structures.
//!
//! Chunks are 32x32x32 cells, addressed by `floor(cell / 32)` per axis.

use glam::IVec3;

use crate::region::Region;
use crate::voxel_box::VoxelBox;

/// log2 of the chunk edge length.
pub const CHUNK_SIZE_LOG2: u32 = 5;

/// Chunk dimension - 32 cells per axis.
pub const CHUNK_SIZE: u32 = 1 << CHUNK_SIZE_LOG2;

/// Total cells per chunk.
pub const CHUNK_VOLUME: usize = (CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE) as usize;

/// Chunk coordinate in chunk space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not cells).
    pub x: i32,
    /// Y coordinate (in chunks, not cells).
    pub y: i32,
    /// Z coordinate (in chunks, not cells).
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Chunk containing a cell. Arithmetic shift floors negative coordinates.
    #[inline]
    #[must_use]
    pub const fn from_cell(cell: IVec3) -> Self {
        Self::new(
            cell.x >> CHUNK_SIZE_LOG2,
            cell.y >> CHUNK_SIZE_LOG2,
            cell.z >> CHUNK_SIZE_LOG2,
        )
    }

    /// Cell coordinate of the chunk's lower corner.
    #[inline]
    #[must_use]
    pub const fn origin(self) -> IVec3 {
        IVec3::new(
            self.x << CHUNK_SIZE_LOG2,
            self.y << CHUNK_SIZE_LOG2,
            self.z << CHUNK_SIZE_LOG2,
        )
    }

    /// Cell region covered by this chunk.
    #[inline]
    #[must_use]
    pub fn region(self) -> Region {
        Region::cube(self.origin(), CHUNK_SIZE as i32)
    }

    /// Every chunk coordinate overlapped by a region, Z outermost.
    #[must_use]
    pub fn covering(region: &Region) -> Vec<Self> {
        if region.is_empty() {
            return Vec::new();
        }

        let min = Self::from_cell(region.begin());
        let max = Self::from_cell(region.end() - IVec3::ONE);

        let count = (max.x - min.x + 1) as usize * (max.y - min.y + 1) as usize * (max.z - min.z + 1) as usize;
        let mut result = Vec::with_capacity(count);
        for z in min.z..=max.z {
            for y in min.y..=max.y {
                for x in min.x..=max.x {
                    result.push(Self::new(x, y, z));
                }
            }
        }
        result
    }
}

/// A chunk of cells - 32x32x32 = 32,768 cells.
#[derive(Debug, Clone)]
pub struct Chunk {
    coord: ChunkCoord,
    cells: VoxelBox,
}

impl Chunk {
    /// Creates a new empty chunk at the given coordinate.
    ///
    /// Note: This allocates. The grid only calls it on first write.
    #[must_use]
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            cells: VoxelBox::new(CHUNK_SIZE, CHUNK_SIZE, CHUNK_SIZE),
        }
    }

    /// Returns the chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Cell region covered by this chunk.
    #[inline]
    #[must_use]
    pub fn region(&self) -> Region {
        self.coord.region()
    }

    /// Chunk storage.
    #[inline]
    #[must_use]
    pub const fn cells(&self) -> &VoxelBox {
        &self.cells
    }

    /// Mutable chunk storage.
    #[inline]
    pub fn cells_mut(&mut self) -> &mut VoxelBox {
        &mut self.cells
    }
}
