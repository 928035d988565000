//! Rotated latitude-longitude grids.
//!
//! Many limited-area models (COSMO, HIRLAM, some ocean models) run on a
//! lon/lat grid whose north pole has been moved so the domain sits near the
//! rotated equator. Projected coordinates are rotated longitude and
//! latitude in degrees; the rotated longitude wraps like any longitude.

use nalgebra::{Matrix3, Rotation3, Vector3};

use coverage_common::{constrain_longitude_180, BoundingBox, Extent};

use crate::error::{ProjectionError, ProjectionResult};
use crate::{sample_edges, Projection};

/// A rotated-pole projection defined by the geographic position of the
/// rotated grid's north pole.
#[derive(Debug, Clone)]
pub struct RotatedPole {
    /// Geographic longitude of the rotated north pole (degrees)
    pub pole_lon: f64,
    /// Geographic latitude of the rotated north pole (degrees)
    pub pole_lat: f64,
    /// Geographic to rotated frame
    to_rotated: Matrix3<f64>,
    /// Rotated to geographic frame
    to_geographic: Matrix3<f64>,
}

impl RotatedPole {
    /// Create a rotated-pole projection.
    ///
    /// These correspond to the CF attributes `grid_north_pole_longitude`
    /// and `grid_north_pole_latitude`.
    pub fn new(pole_lon: f64, pole_lat: f64) -> ProjectionResult<Self> {
        if !(-90.0..=90.0).contains(&pole_lat) || !pole_lon.is_finite() {
            return Err(ProjectionError::invalid_parameter(format!(
                "invalid rotated pole position ({}, {})",
                pole_lon, pole_lat
            )));
        }

        let (s, c) = pole_lat.to_radians().sin_cos();
        // Spin the pole meridian onto x = 0, then tilt the pole onto +z
        let spin = Rotation3::from_axis_angle(&Vector3::z_axis(), -pole_lon.to_radians());
        let tilt = Matrix3::new(
            s, 0.0, -c, //
            0.0, 1.0, 0.0, //
            c, 0.0, s,
        );
        let to_rotated = tilt * spin.matrix();

        Ok(Self {
            pole_lon,
            pole_lat,
            to_rotated,
            to_geographic: to_rotated.transpose(),
        })
    }

    /// Rotated coordinates of the geographic north pole.
    fn true_north_in_rotated(&self) -> (f64, f64) {
        self.lat_lon_to_proj(0.0, 90.0)
    }
}

fn to_cartesian(lon_deg: f64, lat_deg: f64) -> Vector3<f64> {
    let (sin_lat, cos_lat) = lat_deg.to_radians().sin_cos();
    let (sin_lon, cos_lon) = lon_deg.to_radians().sin_cos();
    Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
}

fn to_spherical(v: &Vector3<f64>) -> (f64, f64) {
    let lat = num_traits::clamp(v.z, -1.0, 1.0).asin().to_degrees();
    let lon = v.y.atan2(v.x).to_degrees();
    (constrain_longitude_180(lon), lat)
}

impl Projection for RotatedPole {
    fn name(&self) -> &str {
        "rotated_latitude_longitude"
    }

    fn proj_to_lat_lon(&self, x: f64, y: f64) -> (f64, f64) {
        if x.is_nan() || y.is_nan() {
            return (f64::NAN, f64::NAN);
        }
        to_spherical(&(self.to_geographic * to_cartesian(x, y)))
    }

    fn lat_lon_to_proj(&self, lon: f64, lat: f64) -> (f64, f64) {
        if lon.is_nan() || lat.is_nan() {
            return (f64::NAN, f64::NAN);
        }
        to_spherical(&(self.to_rotated * to_cartesian(lon, lat)))
    }

    fn is_rotated_pole(&self) -> bool {
        true
    }

    /// As the default edge sampling, except that a rectangle enclosing the
    /// geographic north pole spans every longitude. Longitude components
    /// are NaN in that case.
    fn lat_lon_bounding_box(&self, x: Extent<f64>, y: Extent<f64>) -> BoundingBox {
        let sampled = sample_edges(self, x, y);
        let (np_x, np_y) = self.true_north_in_rotated();
        let np_x = coverage_common::next_equivalent_longitude(x.low(), np_x);
        if x.contains(np_x) && y.contains(np_y) {
            return BoundingBox::new(f64::NAN, sampled.min_y, f64::NAN, 90.0);
        }
        sampled
    }
}
