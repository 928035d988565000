//! Error types for the shared coverage value types.

use thiserror::Error;

/// Result type alias using CoverageError.
pub type CoverageResult<T> = Result<T, CoverageError>;

/// Errors raised while constructing shared value types.
#[derive(Debug, Error)]
pub enum CoverageError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid extent: low {low} is greater than high {high}")]
    InvalidExtent { low: String, high: String },

    #[error("Invalid CRS: {0}")]
    InvalidCrs(String),
}

impl CoverageError {
    /// Create an InvalidArgument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

impl From<crate::crs::CrsParseError> for CoverageError {
    fn from(err: crate::crs::CrsParseError) -> Self {
        CoverageError::InvalidCrs(err.to_string())
    }
}

impl From<serde_json::Error> for CoverageError {
    fn from(err: serde_json::Error) -> Self {
        CoverageError::InvalidArgument(format!("JSON error: {}", err))
    }
}
