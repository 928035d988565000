//! Axis and grid definitions shared between test suites.
//!
//! Values are plain numbers so that any crate can use them without
//! depending on the grid types themselves.

/// Common bounding box definitions for testing, as (min_x, min_y, max_x, max_y).
pub mod bbox {
    /// Global bounding box (-180 to 180, -90 to 90)
    pub const GLOBAL: (f64, f64, f64, f64) = (-180.0, -90.0, 180.0, 90.0);

    /// Extent of [`super::grid::RECTILINEAR`] including half-cell margins
    pub const RECTILINEAR: (f64, f64, f64, f64) = (94.75, 32.75, 100.75, 40.75);

    /// Crosses antimeridian (Pacific-centric)
    pub const PACIFIC: (f64, f64, f64, f64) = (160.0, -50.0, 220.0, 50.0);
}

/// Axis definitions.
pub mod axis {
    /// Strictly increasing latitudes with uneven spacing.
    pub const IRREGULAR_LAT: [f64; 8] = [20.0, 20.5, 20.8, 23.0, 24.0, 24.2, 24.3, 30.0];

    /// Strictly increasing longitudes with uneven spacing.
    pub const IRREGULAR_LON: [f64; 8] = [50.0, 51.3, 53.9, 55.4, 57.9, 66.9, 74.9, 80.4];

    /// A regular longitude axis.
    pub const REGULAR_LON: RegularAxisSpec = RegularAxisSpec {
        first: 100.0,
        spacing: 1.0 / 3.0,
        size: 12,
    };

    /// A regular latitude axis.
    pub const REGULAR_LAT: RegularAxisSpec = RegularAxisSpec {
        first: 20.0,
        spacing: 0.5,
        size: 24,
    };

    /// Parameters of a regular axis.
    #[derive(Debug, Clone, Copy)]
    pub struct RegularAxisSpec {
        pub first: f64,
        pub spacing: f64,
        pub size: usize,
    }

    impl RegularAxisSpec {
        /// Coordinate of the last point.
        pub fn last(&self) -> f64 {
            self.first + (self.size - 1) as f64 * self.spacing
        }
    }
}

/// Grid definitions.
pub mod grid {
    use super::axis::RegularAxisSpec;

    /// A small rectilinear lon/lat grid: x 95..100.5, y 33..40.5, step 0.5.
    pub const RECTILINEAR: (RegularAxisSpec, RegularAxisSpec) = (
        RegularAxisSpec {
            first: 95.0,
            spacing: 0.5,
            size: 12,
        },
        RegularAxisSpec {
            first: 33.0,
            spacing: 0.5,
            size: 16,
        },
    );
}

/// Transect definitions.
pub mod linestring {
    /// Along the 20°N parallel.
    pub const ALONG_PARALLEL: &str = "10 20, 20 20";

    /// Three control points with unequal segment lengths.
    pub const DOG_LEG: &str = "0 0, 0 10, 10 10";

    /// A WKT variant of [`DOG_LEG`].
    pub const DOG_LEG_WKT: &str = "LINESTRING(0 0, 0 10, 10 10)";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectilinear_bbox_matches_axes() {
        let (x, y) = grid::RECTILINEAR;
        assert_eq!(x.first - x.spacing / 2.0, bbox::RECTILINEAR.0);
        assert_eq!(y.first - y.spacing / 2.0, bbox::RECTILINEAR.1);
        assert_eq!(x.last() + x.spacing / 2.0, bbox::RECTILINEAR.2);
        assert_eq!(y.last() + y.spacing / 2.0, bbox::RECTILINEAR.3);
    }
}
