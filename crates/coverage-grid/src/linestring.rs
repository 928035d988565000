//! Paths through geographic space for transects.

use std::fmt;

use coverage_common::{CrsCode, HorizontalPosition};
use projection::transform::to_wgs84;

use crate::error::{GridError, Result};
use crate::grid::{GridCoordinates, HorizontalGrid};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Great-circle distance in kilometres between two lon/lat points.
pub fn haversine_distance_km(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2) + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// A polyline of control points in one CRS.
///
/// Distances along the path are great-circle distances between
/// consecutive control points; positions between control points are
/// interpolated linearly in the native coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct LineString {
    control_points: Vec<HorizontalPosition>,
    /// Cumulative distance to each control point, in km
    distances: Vec<f64>,
    crs: CrsCode,
}

impl LineString {
    /// Parse `"x1 y1, x2 y2, ..."` or a WKT `LINESTRING(x1 y1, x2 y2, ...)`.
    ///
    /// At least two points are required.
    pub fn parse(text: &str, crs: CrsCode) -> Result<Self> {
        let text = text.trim();
        let body = if text.to_uppercase().starts_with("LINESTRING") {
            let start = text
                .find('(')
                .ok_or_else(|| GridError::invalid_argument("Missing opening parenthesis"))?;
            let end = text
                .rfind(')')
                .ok_or_else(|| GridError::invalid_argument("Missing closing parenthesis"))?;
            if end <= start {
                return Err(GridError::invalid_argument("Invalid parenthesis order"));
            }
            &text[start + 1..end]
        } else {
            text
        };

        let points = body
            .split(',')
            .map(|pair| parse_point(pair, crs))
            .collect::<Result<Vec<_>>>()?;
        Self::new(points)
    }

    /// Build from positions sharing one CRS.
    pub fn new(control_points: Vec<HorizontalPosition>) -> Result<Self> {
        if control_points.len() < 2 {
            return Err(GridError::invalid_argument(
                "At least two points are required to generate a line string",
            ));
        }
        let crs = control_points[0].crs;
        if control_points.iter().any(|p| p.crs != crs) {
            return Err(GridError::invalid_argument("Control points must share one CRS"));
        }

        let geographic = control_points
            .iter()
            .map(to_wgs84)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let mut distances = Vec::with_capacity(geographic.len());
        let mut total = 0.0;
        distances.push(total);
        for pair in geographic.windows(2) {
            total += haversine_distance_km(pair[0].x, pair[0].y, pair[1].x, pair[1].y);
            distances.push(total);
        }

        Ok(Self {
            control_points,
            distances,
            crs,
        })
    }

    pub fn crs(&self) -> CrsCode {
        self.crs
    }

    pub fn control_points(&self) -> &[HorizontalPosition] {
        &self.control_points
    }

    /// Distance in km from the start to control point `index`.
    pub fn control_point_distance_km(&self, index: usize) -> Option<f64> {
        self.distances.get(index).copied()
    }

    /// Total length of the path in km.
    pub fn path_length(&self) -> f64 {
        self.distances.last().copied().unwrap_or(0.0)
    }

    /// `n` points equally spaced by distance along the path.
    ///
    /// The first and last points are the first and last control points;
    /// intermediate control points are not necessarily included.
    pub fn points_on_path(&self, n: usize) -> Result<Vec<HorizontalPosition>> {
        if n < 2 {
            return Err(GridError::invalid_argument("Must request at least 2 points"));
        }
        let length = self.path_length();
        let mut points = Vec::with_capacity(n);
        points.push(self.control_points[0]);
        for k in 1..n - 1 {
            points.push(self.interpolate(length * k as f64 / (n - 1) as f64));
        }
        points.push(self.control_points[self.control_points.len() - 1]);
        Ok(points)
    }

    /// Grid cells visited by `n` equally spaced points, with consecutive
    /// repeats removed. Points outside the grid are skipped.
    pub fn grid_cells_on_path(&self, grid: &dyn HorizontalGrid, n: usize) -> Result<Vec<GridCoordinates>> {
        let mut cells: Vec<GridCoordinates> = self
            .points_on_path(n)?
            .iter()
            .filter_map(|p| grid.find_index_of(p))
            .collect();
        cells.dedup();
        Ok(cells)
    }

    fn interpolate(&self, s: f64) -> HorizontalPosition {
        let i = self.previous_control_point(s);
        let (start, end) = (&self.control_points[i], &self.control_points[i + 1]);
        let segment = self.distances[i + 1] - self.distances[i];
        if !(segment > 0.0) {
            return *start;
        }
        let frac = (s - self.distances[i]) / segment;
        HorizontalPosition::new(
            (1.0 - frac) * start.x + frac * end.x,
            (1.0 - frac) * start.y + frac * end.y,
            self.crs,
        )
    }

    /// Index of the last control point at or before distance `s`.
    fn previous_control_point(&self, s: f64) -> usize {
        let last_segment = self.distances.len() - 2;
        self.distances[1..]
            .iter()
            .position(|&d| d > s)
            .unwrap_or(last_segment)
    }
}

impl fmt::Display for LineString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let points: Vec<String> = self
            .control_points
            .iter()
            .map(|p| format!("{} {}", p.x, p.y))
            .collect();
        write!(f, "LINESTRING({})", points.join(", "))
    }
}

fn parse_point(pair: &str, crs: CrsCode) -> Result<HorizontalPosition> {
    let parts: Vec<&str> = pair.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(GridError::invalid_argument(format!(
            "Expected 'x y' format, got '{}'",
            pair.trim()
        )));
    }
    let x: f64 = parts[0]
        .parse()
        .map_err(|_| GridError::invalid_argument(format!("Invalid coordinate: {}", parts[0])))?;
    let y: f64 = parts[1]
        .parse()
        .map_err(|_| GridError::invalid_argument(format!("Invalid coordinate: {}", parts[1])))?;
    Ok(HorizontalPosition::new(x, y, crs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_one_degree_of_latitude() {
        let d = haversine_distance_km(0.0, 0.0, 0.0, 1.0);
        assert!((d - 111.195).abs() < 0.01, "distance was {}", d);
    }

    #[test]
    fn test_parse_simple_and_wkt_agree() {
        let simple = LineString::parse("10 20, 20  20", CrsCode::Epsg4326).unwrap();
        let wkt = LineString::parse("LINESTRING(10 20, 20 20)", CrsCode::Epsg4326).unwrap();
        assert_eq!(simple, wkt);
        assert_eq!(simple.to_string(), "LINESTRING(10 20, 20 20)");
    }

    #[test]
    fn test_parse_errors() {
        assert!(LineString::parse("10 20", CrsCode::Epsg4326).is_err());
        assert!(LineString::parse("10 20, 30", CrsCode::Epsg4326).is_err());
        assert!(LineString::parse("10 20, a b", CrsCode::Epsg4326).is_err());
        assert!(LineString::parse("LINESTRING 10 20, 30 40)", CrsCode::Epsg4326).is_err());
    }

    #[test]
    fn test_zero_length_segment() {
        let line = LineString::parse("5 5, 5 5, 6 5", CrsCode::Epsg4326).unwrap();
        let points = line.points_on_path(3).unwrap();
        assert_eq!(points[0], line.control_points()[0]);
        assert!((points[1].x - 5.5).abs() < 1e-9);
    }

    #[test]
    fn test_points_on_path_rejects_fewer_than_two() {
        let line = LineString::parse("0 0, 1 1", CrsCode::Epsg4326).unwrap();
        assert!(line.points_on_path(1).is_err());
        assert_eq!(line.points_on_path(2).unwrap().len(), 2);
    }
}
