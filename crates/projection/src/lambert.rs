//! Lambert Conformal Conic projection.
//!
//! This projection is commonly used for weather data including HRRR.
//! It maps a cone tangent or secant to the Earth's surface onto a flat plane.
//!
//! The projection parameters include:
//! - Reference latitude (lat0): The latitude of the projection origin
//! - Reference longitude (lon0): The central meridian (LoV in GRIB2)
//! - Standard parallel(s): Latin1 and Latin2 (can be equal for tangent cone)
//!
//! Projected coordinates are measured from the origin in the same units as
//! the earth radius (metres for GRIB2, often kilometres for NetCDF).

use std::f64::consts::PI;

use crate::error::{ProjectionError, ProjectionResult};
use crate::Projection;

/// Lambert Conformal Conic projection parameters.
#[derive(Debug, Clone)]
pub struct LambertConformal {
    /// Central meridian (LoV) in radians
    pub lon0: f64,
    /// Latitude of origin in radians
    pub lat0: f64,
    /// First standard parallel in radians
    pub latin1: f64,
    /// Second standard parallel in radians
    pub latin2: f64,
    /// Earth radius, in projected units
    pub earth_radius: f64,
    /// Cone constant (n)
    n: f64,
    /// F constant
    f: f64,
    /// Rho at the latitude of origin
    rho0: f64,
}

impl LambertConformal {
    /// Create a new Lambert Conformal projection.
    ///
    /// # Arguments
    /// * `lat0_deg` - Latitude of the projection origin (degrees)
    /// * `lon0_deg` - Central meridian (degrees)
    /// * `latin1_deg` - First standard parallel (degrees)
    /// * `latin2_deg` - Second standard parallel (degrees)
    /// * `earth_radius` - Sphere radius in projected units
    pub fn new(
        lat0_deg: f64,
        lon0_deg: f64,
        latin1_deg: f64,
        latin2_deg: f64,
        earth_radius: f64,
    ) -> ProjectionResult<Self> {
        let lat0 = lat0_deg.to_radians();
        let lon0 = lon0_deg.to_radians();
        let latin1 = latin1_deg.to_radians();
        let latin2 = latin2_deg.to_radians();

        if !(earth_radius > 0.0) {
            return Err(ProjectionError::invalid_parameter(format!(
                "earth radius must be positive, got {}",
                earth_radius
            )));
        }
        if latin1.abs() >= PI / 2.0 || latin2.abs() >= PI / 2.0 {
            return Err(ProjectionError::invalid_parameter(
                "standard parallels must lie strictly between the poles",
            ));
        }

        // Compute cone constant n
        let n = if (latin1 - latin2).abs() < 1e-10 {
            // Tangent cone (single standard parallel)
            latin1.sin()
        } else {
            // Secant cone (two standard parallels)
            let ln_ratio = (latin1.cos() / latin2.cos()).ln();
            let tan_ratio =
                ((PI / 4.0 + latin2 / 2.0).tan() / (PI / 4.0 + latin1 / 2.0).tan()).ln();
            ln_ratio / tan_ratio
        };
        if n.abs() < 1e-12 {
            return Err(ProjectionError::invalid_parameter(
                "standard parallels symmetric about the equator give a degenerate cone",
            ));
        }

        // Compute F constant
        let f = (latin1.cos() * (PI / 4.0 + latin1 / 2.0).tan().powf(n)) / n;

        let rho0 = earth_radius * f / (PI / 4.0 + lat0 / 2.0).tan().powf(n);

        Ok(Self {
            lon0,
            lat0,
            latin1,
            latin2,
            earth_radius,
            n,
            f,
            rho0,
        })
    }

    /// Create HRRR projection with standard parameters.
    ///
    /// HRRR uses Lambert Conformal with:
    /// - LoV: 262.5°E (= -97.5°W)
    /// - Standard parallels: 38.5°N (both)
    /// - Origin latitude 38.5°N, sphere radius 6371229 m
    pub fn hrrr() -> Self {
        let lat0 = 38.5_f64.to_radians();
        let n = lat0.sin();
        let f = (lat0.cos() * (PI / 4.0 + lat0 / 2.0).tan().powf(n)) / n;
        let earth_radius = 6371229.0;
        Self {
            lon0: (-97.5_f64).to_radians(),
            lat0,
            latin1: lat0,
            latin2: lat0,
            earth_radius,
            n,
            f,
            rho0: earth_radius * f / (PI / 4.0 + lat0 / 2.0).tan().powf(n),
        }
    }

    /// Cone constant.
    pub fn cone_constant(&self) -> f64 {
        self.n
    }
}

impl Projection for LambertConformal {
    fn name(&self) -> &str {
        "lambert_conformal_conic"
    }

    fn lat_lon_to_proj(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let lat = lat_deg.to_radians();
        let lon = lon_deg.to_radians();

        // Normalize longitude difference to [-π, π]
        let mut dlon = lon - self.lon0;
        while dlon > PI {
            dlon -= 2.0 * PI;
        }
        while dlon < -PI {
            dlon += 2.0 * PI;
        }

        // The pole opposite the cone apex has no image
        let t = (PI / 4.0 + lat / 2.0).tan();
        if !t.is_finite() || t <= 0.0 {
            return (f64::NAN, f64::NAN);
        }
        let rho = self.earth_radius * self.f / t.powf(self.n);

        let theta = self.n * dlon;

        let x = rho * theta.sin();
        let y = self.rho0 - rho * theta.cos();
        (x, y)
    }

    fn proj_to_lat_lon(&self, x: f64, y: f64) -> (f64, f64) {
        let sign = self.n.signum();
        let dy = self.rho0 - y;
        let rho = sign * (x * x + dy * dy).sqrt();

        if rho == 0.0 {
            return (self.lon0.to_degrees(), 90.0 * sign);
        }

        let theta = (sign * x).atan2(sign * dy);

        let lat = 2.0 * ((self.earth_radius * self.f / rho).powf(1.0 / self.n)).atan() - PI / 2.0;
        let lon = self.lon0 + theta / self.n;

        (lon.to_degrees(), lat.to_degrees())
    }
}
