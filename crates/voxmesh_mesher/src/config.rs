//! # Mesher Configuration
//!
//! Extraction parameters, loadable from TOML:
//!
//! ```toml
//! algorithm = "surface_nets"
//! isolevel = 0.00196
//! cell_size = 1.0
//!
//! [placement]
//! kind = "adjustable"
//! blend = { kind = "height_smoothstep", low = 8.0, high = 16.0 }
//! ```
//!
//! Missing keys take their [`Default`] values.

use std::path::Path;

use serde::{Deserialize, Serialize};
use voxmesh_field::ScalarField;

use crate::error::{MeshError, MeshResult};
use crate::lattice::Lattice;
use crate::marching_cubes::{MarchingCubes, MAX_LOD};
use crate::mesh::Mesh;
use crate::mesher::Mesher;
use crate::placement::{AdjustableNaive, DualContouring, Naive, PlacementKind, VertexPlacement};
use crate::surface_nets::{SurfaceNets, DEFAULT_WELD_SUBDIVISIONS};

/// Isolevel halfway between empty and the first occupancy step.
pub const DEFAULT_ISOLEVEL: f32 = 0.5 / 255.0;

/// Extraction algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// [`MarchingCubes`]
    MarchingCubes,
    /// [`SurfaceNets`]
    #[default]
    SurfaceNets,
}

/// Everything needed to run one extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MesherConfig {
    /// Which extractor to run.
    pub algorithm: Algorithm,
    /// Surface threshold.
    pub isolevel: f32,
    /// Lattice spacing used when meshing grid regions.
    pub cell_size: f32,
    /// Marching cubes refinement depth.
    pub lod: u32,
    /// Surface nets normal refinement.
    pub refine_normals: bool,
    /// Run the weld pass on the finished mesh.
    pub weld_normals: bool,
    /// Weld grid steps per cell.
    pub weld_subdivisions: u32,
    /// Surface nets vertex placement.
    pub placement: PlacementKind,
}

impl Default for MesherConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::SurfaceNets,
            isolevel: DEFAULT_ISOLEVEL,
            cell_size: 1.0,
            lod: 0,
            refine_normals: true,
            weld_normals: true,
            weld_subdivisions: DEFAULT_WELD_SUBDIVISIONS,
            placement: PlacementKind::Naive,
        }
    }
}

impl MesherConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` on syntax errors, unknown variants or values
    /// rejected by [`MesherConfig::validate`].
    pub fn from_toml_str(text: &str) -> MeshResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, otherwise as
    /// [`MesherConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> MeshResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), algorithm = ?config.algorithm, "loaded mesher config");
        Ok(config)
    }

    /// Serializes to TOML.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if a value cannot be represented, e.g. a NaN
    /// isolevel.
    pub fn to_toml_string(&self) -> MeshResult<String> {
        toml::to_string(self).map_err(|err| MeshError::InvalidConfig(err.to_string()))
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// `InvalidCellSize` for a non-positive or non-finite cell size,
    /// `InvalidConfig` for a non-finite isolevel, an LOD above
    /// [`MAX_LOD`] or zero weld subdivisions.
    pub fn validate(&self) -> MeshResult<()> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(MeshError::InvalidCellSize(self.cell_size));
        }
        if !self.isolevel.is_finite() {
            return Err(MeshError::InvalidConfig(format!(
                "isolevel must be finite, got {}",
                self.isolevel
            )));
        }
        if self.lod > MAX_LOD {
            return Err(MeshError::InvalidConfig(format!(
                "lod must be at most {MAX_LOD}, got {}",
                self.lod
            )));
        }
        if self.weld_subdivisions == 0 {
            return Err(MeshError::InvalidConfig(
                "weld_subdivisions must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn surface_nets<P: VertexPlacement, F: ScalarField + ?Sized>(
        &self,
        placement: P,
        field: &F,
        lattice: &Lattice,
    ) -> Mesh {
        let mut nets =
            SurfaceNets::new(self.isolevel, placement).with_refine_normals(self.refine_normals);
        if self.weld_normals {
            nets = nets.with_weld(self.weld_subdivisions);
        }
        nets.extract(field, lattice)
    }
}

impl Mesher for MesherConfig {
    /// Runs the configured extractor with the configured placement.
    fn generate<F: ScalarField + ?Sized>(&self, field: &F, lattice: &Lattice) -> Mesh {
        match self.algorithm {
            Algorithm::MarchingCubes => {
                let mut mesh = MarchingCubes::new(self.isolevel)
                    .with_lod(self.lod)
                    .extract(field, lattice);
                if self.weld_normals {
                    mesh.weld_normals(lattice.origin(), lattice.cell_size(), self.weld_subdivisions);
                }
                mesh
            }
            Algorithm::SurfaceNets => match &self.placement {
                PlacementKind::Naive => self.surface_nets(Naive, field, lattice),
                PlacementKind::Adjustable { blend } => {
                    self.surface_nets(AdjustableNaive::new(blend), field, lattice)
                }
                PlacementKind::DualContouring => {
                    self.surface_nets(DualContouring::default(), field, lattice)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blend::{Axis, BlendKind};
    use glam::{UVec3, Vec3};
    use voxmesh_field::SdfNode;

    #[test]
    fn test_empty_document_is_default() {
        let config = MesherConfig::from_toml_str("").unwrap();
        assert_eq!(config, MesherConfig::default());
        assert_eq!(config.weld_subdivisions, 16);
        assert!((config.isolevel - 0.5 / 255.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_parses_nested_placement() {
        let text = r#"
            algorithm = "surface_nets"
            cell_size = 0.5

            [placement]
            kind = "adjustable"

            [placement.blend]
            kind = "gated"
            axis = "y"
            threshold = 2.0
            lower = { kind = "smooth" }
            upper = { kind = "quantize" }
        "#;
        let config = MesherConfig::from_toml_str(text).unwrap();
        assert_eq!(config.cell_size, 0.5);
        assert_eq!(
            config.placement,
            PlacementKind::Adjustable {
                blend: BlendKind::Gated {
                    axis: Axis::Y,
                    threshold: 2.0,
                    lower: Box::new(BlendKind::Smooth),
                    upper: Box::new(BlendKind::Quantize { step: 1.0 / 3.0 }),
                }
            }
        );
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = MesherConfig {
            algorithm: Algorithm::MarchingCubes,
            lod: 2,
            placement: PlacementKind::DualContouring,
            ..MesherConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(MesherConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            MesherConfig::from_toml_str("cell_size = 0.0"),
            Err(MeshError::InvalidCellSize(_))
        ));
        assert!(matches!(
            MesherConfig::from_toml_str("lod = 5"),
            Err(MeshError::InvalidConfig(_))
        ));
        assert!(matches!(
            MesherConfig::from_toml_str("weld_subdivisions = 0"),
            Err(MeshError::InvalidConfig(_))
        ));
        assert!(matches!(
            MesherConfig::from_toml_str("algorithm = \"dual_marching\""),
            Err(MeshError::InvalidConfig(_))
        ));
        assert!(matches!(
            MesherConfig::from_toml_str("isolevel = nan"),
            Err(MeshError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            MesherConfig::load("/nonexistent/voxmesh/mesher.toml"),
            Err(MeshError::Io(_))
        ));
    }

    #[test]
    fn test_dispatches_to_every_extractor() {
        let sphere = SdfNode::sphere(1.5);
        let lattice = Lattice::new(Vec3::splat(-2.0), 0.5, UVec3::splat(9)).unwrap();

        let base = MesherConfig {
            isolevel: 0.0,
            ..MesherConfig::default()
        };
        let configs = [
            MesherConfig {
                algorithm: Algorithm::MarchingCubes,
                ..base.clone()
            },
            base.clone(),
            MesherConfig {
                placement: PlacementKind::Adjustable {
                    blend: BlendKind::Fixed { factor: 0.5 },
                },
                ..base.clone()
            },
            MesherConfig {
                placement: PlacementKind::DualContouring,
                ..base
            },
        ];

        for config in &configs {
            let mesh = config.generate(&sphere, &lattice);
            assert!(mesh.triangle_count() > 0, "{:?}", config.algorithm);
            for v in &mesh.vertices {
                assert!((v.normal().length() - 1.0).abs() < 1e-4);
            }
        }
    }
}
