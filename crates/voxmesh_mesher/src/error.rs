//! # Mesher Error Types

use thiserror::Error;

/// Errors reported while configuring an extraction.
///
/// Extraction itself never fails: numerical degeneracies fall back to a
/// local default and empty results are returned as empty meshes.
#[derive(Error, Debug)]
pub enum MeshError {
    /// A lattice axis has fewer than two samples.
    #[error("lattice needs at least 2 samples per axis, got {dims}")]
    DegenerateLattice {
        /// Requested sample counts.
        dims: glam::UVec3,
    },

    /// Cell size is zero, negative or not finite.
    #[error("cell size must be positive and finite, got {0}")]
    InvalidCellSize(f32),

    /// Configuration text could not be parsed or failed validation.
    #[error("invalid mesher config: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read.
    #[error("failed to read mesher config: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for MeshError {
    fn from(err: toml::de::Error) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}

/// Result type for mesher configuration.
pub type MeshResult<T> = Result<T, MeshError>;
