//! Coordinate reference system transformations.
//!
//! Implements the handful of map projections needed to index projected
//! grids, from scratch and without a PROJ dependency. Every projection
//! works in degrees on the geographic side and in the projection's own
//! native units on the projected side.

pub mod error;
pub mod geostationary;
pub mod lambert;
pub mod mercator;
pub mod rotated_pole;
pub mod transform;

use std::fmt;

use coverage_common::{BoundingBox, Extent};

pub use error::{ProjectionError, ProjectionResult};
pub use geostationary::Geostationary;
pub use lambert::LambertConformal;
pub use mercator::WebMercator;
pub use rotated_pole::RotatedPole;
pub use transform::transform_position;

/// Number of samples taken along each edge when estimating a geographic
/// bounding box.
const EDGE_SAMPLES: usize = 50;

/// A two-way mapping between projected coordinates and lon/lat degrees.
///
/// Points that cannot be represented on the other side come back as NaN
/// rather than as an error, so callers can treat them like any other
/// out-of-domain value.
pub trait Projection: Send + Sync + fmt::Debug {
    /// Short human-readable name, used in logs.
    fn name(&self) -> &str;

    /// Projected `(x, y)` to `(lon, lat)` in degrees.
    fn proj_to_lat_lon(&self, x: f64, y: f64) -> (f64, f64);

    /// `(lon, lat)` in degrees to projected `(x, y)`.
    fn lat_lon_to_proj(&self, lon: f64, lat: f64) -> (f64, f64);

    /// Whether projected x behaves like a longitude (wraps every 360°).
    fn is_rotated_pole(&self) -> bool {
        false
    }

    /// Approximate geographic bounding box of a projected rectangle.
    ///
    /// The edges of the rectangle are sampled since the projected edges are
    /// curved in lon/lat space. Components are NaN when no sample could be
    /// unprojected.
    fn lat_lon_bounding_box(&self, x: Extent<f64>, y: Extent<f64>) -> BoundingBox {
        sample_edges(self, x, y)
    }
}

/// Unproject points along the four edges of a projected rectangle and
/// return their lon/lat envelope.
pub fn sample_edges<P: Projection + ?Sized>(proj: &P, x: Extent<f64>, y: Extent<f64>) -> BoundingBox {
    let mut min_lat = f64::NAN;
    let mut max_lat = f64::NAN;
    let mut min_lon = f64::NAN;
    let mut max_lon = f64::NAN;

    for t in 0..=EDGE_SAMPLES {
        let frac = t as f64 / EDGE_SAMPLES as f64;
        let xs = x.low() + frac * x.width();
        let ys = y.low() + frac * y.width();

        let edges = [
            (xs, y.low()),
            (xs, y.high()),
            (x.low(), ys),
            (x.high(), ys),
        ];

        for (px, py) in edges {
            let (lon, lat) = proj.proj_to_lat_lon(px, py);
            if lon.is_nan() || lat.is_nan() {
                continue;
            }
            // f64::min/max ignore a NaN operand
            min_lat = min_lat.min(lat);
            max_lat = max_lat.max(lat);
            min_lon = min_lon.min(lon);
            max_lon = max_lon.max(lon);
        }
    }

    BoundingBox::new(min_lon, min_lat, max_lon, max_lat)
}
