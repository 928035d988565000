//! Error types for grid construction and data reading.

use thiserror::Error;

use coverage_common::CoverageError;
use projection::ProjectionError;

/// Errors that can occur while building grids or reading coverage data.
///
/// Lookups that fall outside a grid are not errors; they return `None`.
#[derive(Error, Debug)]
pub enum GridError {
    /// Malformed construction input (non-monotonic axis, shape mismatch, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Geometry that no grid variant can represent.
    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    /// The underlying array could not be read.
    #[error("I/O error while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// A reader rejected the request without an OS-level failure.
    #[error("failed to read grid data: {0}")]
    ReadFailed(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// No reader constructor is registered under this key.
    #[error("no reader registered for '{0}'")]
    UnknownReader(String),

    #[error(transparent)]
    Coverage(#[from] CoverageError),

    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

impl GridError {
    /// Create an InvalidArgument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an UnsupportedConfiguration error.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedConfiguration(msg.into())
    }

    /// Wrap an I/O error with what was being attempted.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a ReadFailed error.
    pub fn read_failed(msg: impl Into<String>) -> Self {
        Self::ReadFailed(msg.into())
    }

    /// Create a ConfigError.
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// True for failures of the underlying storage.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

impl From<std::io::Error> for GridError {
    fn from(err: std::io::Error) -> Self {
        Self::io("reading data", err)
    }
}

impl From<serde_yaml::Error> for GridError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for GridError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidArgument(format!("JSON error: {}", err))
    }
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
