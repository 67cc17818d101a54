//! Procedural demo terrain.

use glam::IVec3;
use voxmesh_grid::{Cell, Grid, Region, VoxelBox};

/// Material written by [`hill_terrain`].
pub const TERRAIN_MATERIAL: u8 = 1;

/// Region covered by [`hill_terrain`]: 64 x 64 x 32 cells.
#[must_use]
pub fn hill_region() -> Region {
    Region::new(IVec3::new(-32, -32, 0), IVec3::new(32, 32, 32))
}

/// Occupancy of the hill world at box-local cell `(x, y, z)`.
///
/// Solid below `z = 5`, empty above `z = 10`, and in between a cone-shaped
/// hill centered on the box, full at its axis and fading out 8 cells away.
#[must_use]
pub fn hill_occupancy(x: u32, y: u32, z: u32) -> u8 {
    if z < 5 {
        return 255;
    }
    if z > 10 {
        return 0;
    }
    let dx = (x as f32 - 32.0) / 8.0;
    let dy = (y as f32 - 32.0) / 8.0;
    let falloff = (dx * dx + dy * dy).sqrt().clamp(0.0, 1.0);
    ((1.0 - falloff) * 255.0) as u8
}

/// Writes the hill world into `grid`.
pub fn hill_terrain(grid: &Grid) {
    let region = hill_region();
    let size = region.size().as_uvec3();
    let cells = VoxelBox::from_fn(size.x, size.y, size.z, |x, y, z| {
        Cell::new(hill_occupancy(x, y, z), TERRAIN_MATERIAL)
    });
    grid.write(region, &cells);
    tracing::debug!(chunks = grid.chunk_count(), "wrote hill terrain");
}
