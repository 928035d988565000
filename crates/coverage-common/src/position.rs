//! Positions in a horizontal coordinate reference system.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crs::CrsCode;

/// A point in 2-D space tagged with its CRS.
///
/// For geographic CRSs `x` is longitude and `y` is latitude, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalPosition {
    pub x: f64,
    pub y: f64,
    pub crs: CrsCode,
}

impl HorizontalPosition {
    pub fn new(x: f64, y: f64, crs: CrsCode) -> Self {
        Self { x, y, crs }
    }

    /// A WGS84 position from longitude and latitude.
    pub fn lon_lat(lon: f64, lat: f64) -> Self {
        Self::new(lon, lat, CrsCode::Epsg4326)
    }

    /// True if either coordinate is NaN.
    pub fn is_nan(&self) -> bool {
        self.x.is_nan() || self.y.is_nan()
    }
}

impl fmt::Display for HorizontalPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) {}", self.x, self.y, self.crs)
    }
}
