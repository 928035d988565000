//! Raster look-up table from lon/lat to curvilinear cell indices.

use coverage_common::BoundingBox;

use super::coords::{CurvilinearCell, CurvilinearCoords};
use super::polygon_contains;
use crate::error::{GridError, Result};

/// Marker for LUT nodes not covered by any cell.
const MISSING: u32 = u32::MAX;

/// Upper bound on the number of LUT nodes.
const MAX_NODES: f64 = 0.2 * i32::MAX as f64;

/// A regular lon/lat raster over the bounding box of a
/// [`CurvilinearCoords`], storing at each node the `(i, j)` of a cell that
/// covers it.
///
/// Cells are painted in row-major order, so where cells overlap the later
/// one wins. The answer is a first guess that callers refine.
#[derive(Debug, Clone, PartialEq)]
pub struct LookUpTable {
    n_lon: usize,
    n_lat: usize,
    min_lon: f64,
    min_lat: f64,
    lon_stride: f64,
    lat_stride: f64,
    i_indices: Vec<u32>,
    j_indices: Vec<u32>,
}

impl LookUpTable {
    /// Rasterise `coords` with nodes at most `min_resolution` degrees
    /// apart.
    ///
    /// Very large tables are coarsened until they fit in memory.
    pub fn new(coords: &CurvilinearCoords, min_resolution: f64) -> Result<Self> {
        if !(min_resolution > 0.0) || !min_resolution.is_finite() {
            return Err(GridError::invalid_argument(format!(
                "look-up table resolution must be positive, got {}",
                min_resolution
            )));
        }

        let bbox = coords.bounding_box();
        let lon_diff = bbox.width();
        let lat_diff = bbox.height();

        let mut n_lon = (lon_diff / min_resolution).ceil();
        let mut n_lat = (lat_diff / min_resolution).ceil();
        while n_lon * n_lat > MAX_NODES {
            n_lon = (n_lon * 0.9).floor();
            n_lat = (n_lat * 0.9).floor();
        }
        if n_lon <= 0.0 || n_lat <= 0.0 {
            return Err(GridError::invalid_argument(format!(
                "nLon (={}) and nLat (={}) must be positive and > 0",
                n_lon, n_lat
            )));
        }
        // Two nodes at least, so that both edges of the box are sampled
        let n_lon = (n_lon as usize).max(2);
        let n_lat = (n_lat as usize).max(2);

        let mut lut = Self {
            n_lon,
            n_lat,
            min_lon: bbox.min_x,
            min_lat: bbox.min_y,
            lon_stride: lon_diff / (n_lon - 1) as f64,
            lat_stride: lat_diff / (n_lat - 1) as f64,
            i_indices: vec![MISSING; n_lon * n_lat],
            j_indices: vec![MISSING; n_lon * n_lat],
        };
        for cell in coords.cells() {
            lut.paint(&cell);
        }
        Ok(lut)
    }

    pub fn num_lon_points(&self) -> usize {
        self.n_lon
    }

    pub fn num_lat_points(&self) -> usize {
        self.n_lat
    }

    /// `(i, j)` of the cell painted at the node nearest to the point, or
    /// `None` if the point is off the table or the node is uncovered.
    pub fn grid_coordinates(&self, lon: f64, lat: f64) -> Option<(usize, usize)> {
        let k = self.node_index(lon, lat)?;
        let (i, j) = (self.i_indices[k], self.j_indices[k]);
        if i == MISSING || j == MISSING {
            return None;
        }
        Some((i as usize, j as usize))
    }

    fn node_index(&self, lon: f64, lat: f64) -> Option<usize> {
        let x = ((lon - self.min_lon) / self.lon_stride).round();
        let y = ((lat - self.min_lat) / self.lat_stride).round();
        if !(x >= 0.0 && y >= 0.0 && x < self.n_lon as f64 && y < self.n_lat as f64) {
            return None;
        }
        Some(y as usize * self.n_lon + x as usize)
    }

    /// Paint the cell, and a copy shifted by a full turn towards the other
    /// side of the antimeridian.
    fn paint(&mut self, cell: &CurvilinearCell<'_>) {
        let corners = cell.corners();
        if corners.iter().any(|(x, y)| x.is_nan() || y.is_nan()) {
            return;
        }
        let shift = if cell.centre().0 > 0.0 { -360.0 } else { 360.0 };
        let shifted = corners.map(|(x, y)| (x + shift, y));

        let (i, j) = (cell.i() as u32, cell.j() as u32);
        self.fill_polygon(&corners, i, j);
        self.fill_polygon(&shifted, i, j);
    }

    fn fill_polygon(&mut self, ring: &[(f64, f64); 4], i: u32, j: u32) {
        let mbr = envelope(ring);
        let Some((x0, x1)) = node_range(mbr.min_x, mbr.max_x, self.min_lon, self.lon_stride, self.n_lon) else {
            return;
        };
        let Some((y0, y1)) = node_range(mbr.min_y, mbr.max_y, self.min_lat, self.lat_stride, self.n_lat) else {
            return;
        };

        for y in y0..=y1 {
            let lat = self.min_lat + y as f64 * self.lat_stride;
            for x in x0..=x1 {
                let lon = self.min_lon + x as f64 * self.lon_stride;
                if polygon_contains(ring, lon, lat) {
                    let k = y * self.n_lon + x;
                    self.i_indices[k] = i;
                    self.j_indices[k] = j;
                }
            }
        }
    }
}

fn envelope(ring: &[(f64, f64); 4]) -> BoundingBox {
    let mut bbox = BoundingBox::new(ring[0].0, ring[0].1, ring[0].0, ring[0].1);
    for &(x, y) in &ring[1..] {
        bbox.min_x = bbox.min_x.min(x);
        bbox.max_x = bbox.max_x.max(x);
        bbox.min_y = bbox.min_y.min(y);
        bbox.max_y = bbox.max_y.max(y);
    }
    bbox
}

/// Inclusive range of node indices whose coordinate lies in `[low, high]`.
fn node_range(low: f64, high: f64, origin: f64, stride: f64, n: usize) -> Option<(usize, usize)> {
    let first = ((low - origin) / stride).ceil().max(0.0);
    let last = ((high - origin) / stride).floor().min((n - 1) as f64);
    if !(first <= last) {
        return None;
    }
    Some((first as usize, last as usize))
}
