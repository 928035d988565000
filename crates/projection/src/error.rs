//! Error types for projection operations.

use thiserror::Error;

use coverage_common::CrsCode;

/// Result type alias using ProjectionError.
pub type ProjectionResult<T> = Result<T, ProjectionError>;

/// Errors raised by projection setup and CRS transforms.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// No transform is implemented between the two CRSs.
    #[error("unsupported transform from {from} to {to}")]
    UnsupportedTransform { from: CrsCode, to: CrsCode },

    /// The point has no representation in the target CRS.
    #[error("position ({x}, {y}) cannot be represented in {crs}")]
    NotRepresentable { x: f64, y: f64, crs: CrsCode },

    /// A projection parameter is out of range.
    #[error("invalid projection parameter: {0}")]
    InvalidParameter(String),
}

impl ProjectionError {
    /// Create an InvalidParameter error.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}
