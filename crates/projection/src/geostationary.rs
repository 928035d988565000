//! Geostationary satellite projection.
//!
//! This projection is used for GOES-R series satellite imagery.
//! The satellite views Earth from a fixed position above the equator,
//! and projected coordinates are scan angles in radians from nadir.
//!
//! Reference: GOES-R Product Definition and Users' Guide (PUG) Volume 4

use crate::Projection;

/// Geostationary projection parameters.
#[derive(Debug, Clone)]
pub struct Geostationary {
    /// Satellite height above Earth center (meters)
    /// This is perspective_point_height + semi_major_axis
    pub h: f64,
    /// Perspective point height above Earth surface (meters)
    pub perspective_point_height: f64,
    /// Semi-major axis of Earth ellipsoid (meters)
    pub req: f64,
    /// Semi-minor axis of Earth ellipsoid (meters)
    pub rpol: f64,
    /// Longitude of satellite nadir point (radians)
    pub lambda_0: f64,
}

impl Geostationary {
    /// Create a new Geostationary projection from CF grid-mapping attributes.
    ///
    /// # Arguments
    /// * `perspective_point_height` - Satellite altitude above Earth surface (meters)
    /// * `semi_major_axis` - Earth equatorial radius (meters)
    /// * `semi_minor_axis` - Earth polar radius (meters)
    /// * `longitude_origin_deg` - Satellite longitude (degrees, negative for west)
    pub fn new(
        perspective_point_height: f64,
        semi_major_axis: f64,
        semi_minor_axis: f64,
        longitude_origin_deg: f64,
    ) -> Self {
        Self {
            h: perspective_point_height + semi_major_axis,
            perspective_point_height,
            req: semi_major_axis,
            rpol: semi_minor_axis,
            lambda_0: longitude_origin_deg.to_radians(),
        }
    }

    /// GOES-16 (GOES-East at 75°W).
    pub fn goes16() -> Self {
        Self::new(35786023.0, 6378137.0, 6356752.31414, -75.0)
    }

    /// GOES-18 (GOES-West at 137.2°W).
    pub fn goes18() -> Self {
        Self::new(35786023.0, 6378137.0, 6356752.31414, -137.2)
    }

    /// Convert scan angles (radians) to geographic coordinates (lon/lat degrees).
    ///
    /// Based on GOES-R PUG Volume 4, Section 4.2.8.
    /// Returns None if the scan angle points to space (off Earth).
    pub fn scan_to_geo(&self, x_rad: f64, y_rad: f64) -> Option<(f64, f64)> {
        let sin_x = x_rad.sin();
        let cos_x = x_rad.cos();
        let sin_y = y_rad.sin();
        let cos_y = y_rad.cos();

        // Quadratic coefficients for finding distance to Earth surface
        let a = sin_x.powi(2)
            + cos_x.powi(2) * (cos_y.powi(2) + (self.req / self.rpol).powi(2) * sin_y.powi(2));
        let b = -2.0 * self.h * cos_x * cos_y;
        let c = self.h.powi(2) - self.req.powi(2);

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let rs = (-b - discriminant.sqrt()) / (2.0 * a);

        let sx = rs * cos_x * cos_y;
        let sy = -rs * sin_x;
        let sz = rs * cos_x * sin_y;

        let lat = ((self.req / self.rpol).powi(2) * sz / (self.h - sx).hypot(sy)).atan();
        let lon = self.lambda_0 - sy.atan2(self.h - sx);

        Some((
            coverage_common::constrain_longitude_180(lon.to_degrees()),
            lat.to_degrees(),
        ))
    }

    /// Convert geographic coordinates (lon/lat degrees) to scan angles (radians).
    ///
    /// Returns None if the point is not visible from the satellite.
    pub fn geo_to_scan(&self, lon_deg: f64, lat_deg: f64) -> Option<(f64, f64)> {
        let lat_rad = lat_deg.to_radians();
        let lon_rad = lon_deg.to_radians();

        // Beyond the limb as seen from the satellite
        let dlon = lon_rad - self.lambda_0;
        let cos_c = lat_rad.cos() * dlon.cos();
        let horizon_angle = (self.req / self.h).acos();
        if cos_c.acos() > horizon_angle {
            return None;
        }

        // Geocentric latitude
        let phi_c = ((self.rpol / self.req).powi(2) * lat_rad.tan()).atan();

        let e2 = 1.0 - (self.rpol / self.req).powi(2);
        let rc = self.rpol / (1.0 - e2 * phi_c.cos().powi(2)).sqrt();

        let sx = self.h - rc * phi_c.cos() * dlon.cos();
        let sy = -rc * phi_c.cos() * dlon.sin();
        let sz = rc * phi_c.sin();

        if sx <= 0.0 {
            return None;
        }

        let s_xy = sx.hypot(sy);
        let y_rad = sz.atan2(s_xy);
        let x_rad = (-sy).atan2(sx);

        Some((x_rad, y_rad))
    }
}

impl Projection for Geostationary {
    fn name(&self) -> &str {
        "geostationary"
    }

    fn proj_to_lat_lon(&self, x: f64, y: f64) -> (f64, f64) {
        self.scan_to_geo(x, y).unwrap_or((f64::NAN, f64::NAN))
    }

    fn lat_lon_to_proj(&self, lon: f64, lat: f64) -> (f64, f64) {
        self.geo_to_scan(lon, lat).unwrap_or((f64::NAN, f64::NAN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coverage_common::Extent;

    #[test]
    fn test_nadir_roundtrip() {
        let proj = Geostationary::goes16();

        let (lon, lat) = proj.proj_to_lat_lon(0.0, 0.0);
        assert!((lon - (-75.0)).abs() < 0.1, "Nadir longitude should be ~-75, got {}", lon);
        assert!(lat.abs() < 0.1, "Nadir latitude should be ~0, got {}", lat);

        let (x, y) = proj.lat_lon_to_proj(lon, lat);
        assert!(x.abs() < 1e-6, "X roundtrip failed: {}", x);
        assert!(y.abs() < 1e-6, "Y roundtrip failed: {}", y);
    }

    #[test]
    fn test_conus_point_roundtrip() {
        let proj = Geostationary::goes16();

        // Kansas
        let (x, y) = proj.lat_lon_to_proj(-95.0, 39.0);
        assert!(!x.is_nan() && !y.is_nan());
        let (lon, lat) = proj.proj_to_lat_lon(x, y);
        assert!((lat - 39.0).abs() < 0.15, "Latitude roundtrip failed: {}", lat);
        assert!((lon - (-95.0)).abs() < 0.15, "Longitude roundtrip failed: {}", lon);
    }

    #[test]
    fn test_off_earth_is_nan() {
        let proj = Geostationary::goes16();

        let (lon, lat) = proj.proj_to_lat_lon(0.5, 0.5);
        assert!(lon.is_nan() && lat.is_nan());

        // Opposite side of the globe
        let (x, y) = proj.lat_lon_to_proj(105.0, 0.0);
        assert!(x.is_nan() && y.is_nan());
    }

    #[test]
    fn test_conus_sector_bounds() {
        let proj = Geostationary::goes16();
        let bbox = proj.lat_lon_bounding_box(
            Extent::ordered(-0.101360, -0.101360 + 4999.0 * 0.000028),
            Extent::ordered(0.128226 - 2999.0 * 0.000028, 0.128226),
        );

        assert!(bbox.min_x < -140.0, "min_lon should be < -140, got {}", bbox.min_x);
        assert!(bbox.max_x > -55.0, "max_lon should be > -55, got {}", bbox.max_x);
        assert!(bbox.min_y > 10.0 && bbox.min_y < 20.0, "min_lat was {}", bbox.min_y);
        assert!(bbox.max_y > 50.0, "max_lat should be > 50, got {}", bbox.max_y);
    }

    #[test]
    fn test_full_disk_edges_are_off_earth() {
        let proj = Geostationary::goes18();
        let bbox = proj.lat_lon_bounding_box(Extent::ordered(-0.2, 0.2), Extent::ordered(-0.2, 0.2));
        assert!(bbox.min_x.is_nan() && bbox.max_y.is_nan());
    }
}
