//! Common types and utilities shared across the coverage crates.
//!
//! Everything here is a plain value type: extents, bounding boxes, CRS tags
//! and positions, plus the longitude arithmetic used by wrapping axes.

pub mod bbox;
pub mod crs;
pub mod error;
pub mod extent;
pub mod longitude;
pub mod position;

pub use bbox::BoundingBox;
pub use crs::CrsCode;
pub use error::{CoverageError, CoverageResult};
pub use extent::Extent;
pub use longitude::{
    constrain_longitude_180, constrain_longitude_360, harmonize_longitudes,
    nearest_equivalent_longitude, next_equivalent_longitude,
};
pub use position::HorizontalPosition;
