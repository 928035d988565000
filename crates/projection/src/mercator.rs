//! Spherical (Web) Mercator, EPSG:3857.

use std::f64::consts::PI;

use crate::Projection;

/// WGS84 semi-major axis, used as the sphere radius by EPSG:3857.
pub const EARTH_RADIUS_M: f64 = 6378137.0;

/// Latitude limit at which the projected square is closed.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Spherical Mercator with the EPSG:3857 sphere.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebMercator;

impl WebMercator {
    /// Projected half-width of the world in metres.
    pub fn max_extent() -> f64 {
        PI * EARTH_RADIUS_M
    }
}

impl Projection for WebMercator {
    fn name(&self) -> &str {
        "web_mercator"
    }

    fn proj_to_lat_lon(&self, x: f64, y: f64) -> (f64, f64) {
        let lon = (x / EARTH_RADIUS_M).to_degrees();
        let lat = (2.0 * (y / EARTH_RADIUS_M).exp().atan() - PI / 2.0).to_degrees();
        (lon, lat)
    }

    /// Latitudes beyond the Mercator limit have no image and come back NaN.
    fn lat_lon_to_proj(&self, lon: f64, lat: f64) -> (f64, f64) {
        if lat.abs() > MAX_LATITUDE {
            return (f64::NAN, f64::NAN);
        }
        let x = EARTH_RADIUS_M * lon.to_radians();
        let y = EARTH_RADIUS_M * (PI / 4.0 + lat.to_radians() / 2.0).tan().ln();
        (x, y)
    }
}
