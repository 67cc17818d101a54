//! # Extractor
//!
//! Glue between storage and meshing: reads a region from a [`Grid`], views
//! it as a [`VoxelField`] and runs the configured extractor over it.

use std::path::Path;

use voxmesh_field::{ScalarField, VoxelField};
use voxmesh_grid::{Grid, Region};
use voxmesh_mesher::{Lattice, Mesh, MeshResult, Mesher, MesherConfig};

/// Extra cells read on every side of a meshed region.
///
/// One cell of margin holds the empty samples a surface on the region
/// boundary crosses into, so both extractors close it.
pub const REGION_PADDING: i32 = 1;

/// Config-driven mesher for grid regions and analytic fields.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: MesherConfig,
}

impl Extractor {
    /// Creates an extractor from a validated config.
    ///
    /// # Errors
    ///
    /// Anything [`MesherConfig::validate`] rejects.
    pub fn new(config: MesherConfig) -> MeshResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Creates an extractor from a TOML file.
    ///
    /// # Errors
    ///
    /// See [`MesherConfig::load`].
    pub fn load(path: impl AsRef<Path>) -> MeshResult<Self> {
        Ok(Self {
            config: MesherConfig::load(path)?,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &MesherConfig {
        &self.config
    }

    /// Meshes an arbitrary field over `lattice`.
    #[must_use]
    pub fn mesh_field<F: ScalarField + ?Sized>(&self, field: &F, lattice: &Lattice) -> Mesh {
        self.config.generate(field, lattice)
    }

    /// Meshes the cells of `region`.
    ///
    /// The region is read with [`REGION_PADDING`] cells of margin and
    /// sampled one point per cell, with cell `c` at `c * cell_size`.
    /// Occupancy is the field value, so the configured isolevel is a
    /// fraction of full occupancy.
    ///
    /// # Errors
    ///
    /// Only if the lattice is invalid, which a validated config and a
    /// non-degenerate region cannot produce.
    pub fn mesh_region(&self, grid: &Grid, region: Region) -> MeshResult<Mesh> {
        let padded = region.expand(REGION_PADDING);
        let cell_size = self.config.cell_size;
        let lattice = Lattice::for_region(&padded, cell_size)?;

        let field = VoxelField::from_region(grid.read(padded), &padded, cell_size);
        let mesh = self.mesh_field(&field, &lattice);

        tracing::debug!(
            begin = %region.begin(),
            end = %region.end(),
            algorithm = ?self.config.algorithm,
            triangles = mesh.triangle_count(),
            "meshed grid region"
        );

        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;
    use voxmesh_grid::Cell;
    use voxmesh_mesher::{Algorithm, MeshError};

    #[test]
    fn test_rejects_invalid_config() {
        let config = MesherConfig {
            cell_size: -1.0,
            ..MesherConfig::default()
        };
        assert!(matches!(
            Extractor::new(config),
            Err(MeshError::InvalidCellSize(_))
        ));
    }

    #[test]
    fn test_empty_grid_gives_empty_mesh() {
        let extractor = Extractor::default();
        let mesh = extractor
            .mesh_region(&Grid::new(), Region::cube(IVec3::ZERO, 8))
            .unwrap();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn test_meshes_both_algorithms_within_padding() {
        let grid = Grid::new();
        let region = Region::cube(IVec3::new(-3, 5, 0), 4);
        grid.fill(region, Cell::solid(2));

        for algorithm in [Algorithm::MarchingCubes, Algorithm::SurfaceNets] {
            let extractor = Extractor::new(MesherConfig {
                algorithm,
                cell_size: 0.5,
                ..MesherConfig::default()
            })
            .unwrap();
            let mesh = extractor.mesh_region(&grid, region).unwrap();
            assert!(mesh.triangle_count() > 0);

            let (lo, hi) = mesh.bounds().unwrap();
            let outer = region.expand(1);
            assert!(lo.cmpge(outer.begin().as_vec3() * 0.5).all());
            assert!(hi.cmple(outer.end().as_vec3() * 0.5).all());
        }
    }
}
