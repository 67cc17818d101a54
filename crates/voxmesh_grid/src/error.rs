//! # Grid Error Types

use glam::IVec3;
use thiserror::Error;

/// Errors reported by checked grid operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The source box does not have the region's extent.
    #[error("box size {box_size} does not match region size {region_size}")]
    SizeMismatch {
        /// Extent of the target region.
        region_size: IVec3,
        /// Extent of the supplied box.
        box_size: IVec3,
    },
}

/// Result type for grid operations.
pub type GridResult<T> = Result<T, GridError>;
