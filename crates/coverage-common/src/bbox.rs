//! Bounding box types and operations.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::extent::Extent;
use crate::longitude::next_equivalent_longitude;

/// A geographic or projected bounding box.
///
/// For geographic CRS (EPSG:4326), coordinates are in degrees.
/// For projected CRS (EPSG:3857, etc.), coordinates are in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// The whole globe in degrees: `[-180, 180] x [-90, 90]`.
    pub fn global() -> Self {
        Self::new(-180.0, -90.0, 180.0, 90.0)
    }

    /// Build a bounding box from x and y extents.
    pub fn from_extents(x: Extent<f64>, y: Extent<f64>) -> Self {
        Self::new(x.low(), y.low(), x.high(), y.high())
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn x_extent(&self) -> Extent<f64> {
        Extent::ordered(self.min_x, self.max_x)
    }

    pub fn y_extent(&self) -> Extent<f64> {
        Extent::ordered(self.min_y, self.max_y)
    }

    /// Check if this bbox intersects another.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    /// Compute the intersection of two bounding boxes.
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        if !self.intersects(other) {
            return None;
        }

        Some(BoundingBox {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        })
    }

    /// Check if a point is contained within this bbox.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Containment where `x` is a longitude and any 360° equivalent counts.
    pub fn contains_lon_lat(&self, lon: f64, lat: f64) -> bool {
        if lat.is_nan() || lon.is_nan() || lat < self.min_y || lat > self.max_y {
            return false;
        }
        if self.width() >= 360.0 {
            return true;
        }
        next_equivalent_longitude(self.min_x, lon) <= self.max_x
    }
}

/// Parses `"minx,miny,maxx,maxy"`.
impl FromStr for BoundingBox {
    type Err = BboxParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BboxParseError::InvalidFormat(s.to_string()));
        }
        let number = |v: &str| v.parse::<f64>().map_err(|_| BboxParseError::InvalidNumber(v.to_string()));
        Ok(Self::new(number(parts[0])?, number(parts[1])?, number(parts[2])?, number(parts[3])?))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid BBOX format: {0}. Expected 'minx,miny,maxx,maxy'")]
    InvalidFormat(String),

    #[error("Invalid number in BBOX: {0}")]
    InvalidNumber(String),
}
