//! Two-dimensional longitude/latitude arrays and their cells.
//!
//! Ocean and limited-area models often store a lon/lat pair per cell
//! instead of two separable axes. [`CurvilinearCoords`] keeps the cell
//! centres, derives cell corners by averaging neighbouring centres, and
//! offers the per-cell geometry used to locate positions.
//!
//! Cells whose centre is missing have NaN coordinates. Their corners,
//! area and containment are then NaN or false; that is not an error.

use coverage_common::{constrain_longitude_180, nearest_equivalent_longitude, BoundingBox};

use super::polygon_contains;
use crate::error::{GridError, Result};

/// Cell centres and corners of a curvilinear grid.
///
/// Storage is row-major with `i` varying fastest: index `j * ni + i`.
#[derive(Debug, Clone, PartialEq)]
pub struct CurvilinearCoords {
    ni: usize,
    nj: usize,
    longitudes: Vec<f32>,
    latitudes: Vec<f32>,
    /// `(nj + 1) x (ni + 1)`
    corner_lons: Vec<f64>,
    corner_lats: Vec<f64>,
    bbox: BoundingBox,
}

impl CurvilinearCoords {
    /// Build from per-cell longitudes and latitudes, each of length
    /// `ni * nj`.
    ///
    /// Longitudes are normalised to `(-180, 180]`. A cell with either
    /// coordinate NaN is missing as a whole.
    pub fn new(ni: usize, nj: usize, lons: &[f64], lats: &[f64]) -> Result<Self> {
        if lons.len() != lats.len() {
            return Err(GridError::invalid_argument(format!(
                "Lon and Lat axes must have the same shape. Lon: {}; Lat: {}",
                lons.len(),
                lats.len()
            )));
        }
        if lons.len() != ni * nj {
            return Err(GridError::invalid_argument(format!(
                "expected {} x {} = {} coordinates, got {}",
                ni,
                nj,
                ni * nj,
                lons.len()
            )));
        }
        if ni < 3 || nj < 3 {
            return Err(GridError::invalid_argument(
                "Curvilinear coordinates need at least 3 points in each dimension",
            ));
        }

        let mut longitudes = Vec::with_capacity(ni * nj);
        let mut latitudes = Vec::with_capacity(ni * nj);
        let (mut min_lon, mut max_lon) = (180.0_f64, -180.0_f64);
        let (mut min_lat, mut max_lat) = (90.0_f64, -90.0_f64);

        for (&lon, &lat) in lons.iter().zip(lats) {
            if lon.is_nan() || lat.is_nan() {
                longitudes.push(f32::NAN);
                latitudes.push(f32::NAN);
                continue;
            }
            let lon = constrain_longitude_180(lon) as f32;
            let lat = lat as f32;
            min_lon = min_lon.min(lon as f64);
            max_lon = max_lon.max(lon as f64);
            min_lat = min_lat.min(lat as f64);
            max_lat = max_lat.max(lat as f64);
            longitudes.push(lon);
            latitudes.push(lat);
        }

        if max_lon < min_lon || max_lat < min_lat {
            return Err(GridError::invalid_argument(
                "Invalid bounding box: no cell has valid coordinates",
            ));
        }

        let corner_lons = make_corners(ni, nj, &longitudes, true);
        let corner_lats = make_corners(ni, nj, &latitudes, false);

        Ok(Self {
            ni,
            nj,
            longitudes,
            latitudes,
            corner_lons,
            corner_lats,
            bbox: BoundingBox::new(min_lon, min_lat, max_lon, max_lat),
        })
    }

    pub fn ni(&self) -> usize {
        self.ni
    }

    pub fn nj(&self) -> usize {
        self.nj
    }

    pub fn size(&self) -> usize {
        self.longitudes.len()
    }

    /// Envelope of the valid cell centres.
    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    /// Centre of cell `(i, j)` as `(lon, lat)`; NaN for missing cells.
    pub fn midpoint(&self, i: usize, j: usize) -> (f64, f64) {
        let index = j * self.ni + i;
        (self.longitudes[index] as f64, self.latitudes[index] as f64)
    }

    /// The cell at `(i, j)`, or `None` if out of range.
    pub fn cell(&self, i: usize, j: usize) -> Option<CurvilinearCell<'_>> {
        (i < self.ni && j < self.nj).then_some(CurvilinearCell { coords: self, i, j })
    }

    /// All cells, row-major.
    pub fn cells(&self) -> impl Iterator<Item = CurvilinearCell<'_>> + '_ {
        (0..self.nj).flat_map(move |j| (0..self.ni).map(move |i| CurvilinearCell { coords: self, i, j }))
    }

    /// Mean area of the cells with a defined area, in square degrees.
    ///
    /// NaN if no cell has a defined area.
    pub fn mean_cell_area(&self) -> f64 {
        let mut sum = 0.0;
        let mut count = 0usize;
        for cell in self.cells() {
            let area = cell.area();
            if !area.is_nan() {
                sum += area;
                count += 1;
            }
        }
        if count == 0 {
            return f64::NAN;
        }
        sum / count as f64
    }

    fn corner(&self, ci: usize, cj: usize) -> (f64, f64) {
        let index = cj * (self.ni + 1) + ci;
        (self.corner_lons[index], self.corner_lats[index])
    }
}

/// Corner values on an `(nj + 1) x (ni + 1)` lattice.
///
/// Interior corners average the four surrounding centres. Edge corners are
/// extrapolated linearly, first along each row and then down each column.
fn make_corners(ni: usize, nj: usize, midpoints: &[f32], is_longitude: bool) -> Vec<f64> {
    let stride = ni + 1;
    let mut edges = vec![f64::NAN; (nj + 1) * stride];
    let mid = |i: usize, j: usize| midpoints[j * ni + i] as f64;

    for j in 0..nj - 1 {
        for i in 0..ni - 1 {
            let m1 = mid(i, j);
            let (mut m2, mut m3, mut m4) = (mid(i + 1, j), mid(i, j + 1), mid(i + 1, j + 1));
            if is_longitude {
                // Keep all four on the same side of the antimeridian as m1
                m2 = nearest_equivalent_longitude(m1, m2);
                m3 = nearest_equivalent_longitude(m1, m3);
                m4 = nearest_equivalent_longitude(m1, m4);
            }
            edges[(j + 1) * stride + i + 1] = (m1 + m2 + m3 + m4) / 4.0;
        }
        let row = (j + 1) * stride;
        edges[row] = edges[row + 1] - (edges[row + 2] - edges[row + 1]);
        edges[row + ni] = edges[row + ni - 1] + (edges[row + ni - 1] - edges[row + ni - 2]);
    }

    for x in 0..stride {
        edges[x] = edges[stride + x] - (edges[2 * stride + x] - edges[stride + x]);
        let last = nj * stride + x;
        let prev = (nj - 1) * stride + x;
        let prev2 = (nj - 2) * stride + x;
        edges[last] = edges[prev] + (edges[prev] - edges[prev2]);
    }

    edges
}

/// A view of a single cell in a [`CurvilinearCoords`].
#[derive(Debug, Clone, Copy)]
pub struct CurvilinearCell<'a> {
    coords: &'a CurvilinearCoords,
    i: usize,
    j: usize,
}

impl PartialEq for CurvilinearCell<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.coords, other.coords) && self.i == other.i && self.j == other.j
    }
}

impl Eq for CurvilinearCell<'_> {}

impl<'a> CurvilinearCell<'a> {
    pub fn i(&self) -> usize {
        self.i
    }

    pub fn j(&self) -> usize {
        self.j
    }

    /// Centre as `(lon, lat)`.
    pub fn centre(&self) -> (f64, f64) {
        self.coords.midpoint(self.i, self.j)
    }

    pub fn is_missing(&self) -> bool {
        let (lon, lat) = self.centre();
        lon.is_nan() || lat.is_nan()
    }

    /// Corners in ring order: `(i, j)`, `(i+1, j)`, `(i+1, j+1)`, `(i, j+1)`.
    ///
    /// Longitudes are moved to the equivalent nearest the cell centre, so a
    /// cell spanning the antimeridian stays contiguous.
    pub fn corners(&self) -> [(f64, f64); 4] {
        let (i, j) = (self.i, self.j);
        [
            self.coords.corner(i, j),
            self.coords.corner(i + 1, j),
            self.coords.corner(i + 1, j + 1),
            self.coords.corner(i, j + 1),
        ]
        .map(|(lon, lat)| (self.harmonize(lon), lat))
    }

    /// Cells sharing an edge, in the order left, below, right, above.
    pub fn edge_neighbours(&self) -> Vec<CurvilinearCell<'a>> {
        let (ni, nj) = (self.coords.ni, self.coords.nj);
        let (i, j) = (self.i, self.j);
        let mut neighbours = Vec::with_capacity(4);
        if i > 0 {
            neighbours.push(self.at(i - 1, j));
        }
        if j > 0 {
            neighbours.push(self.at(i, j - 1));
        }
        if i < ni - 1 {
            neighbours.push(self.at(i + 1, j));
        }
        if j < nj - 1 {
            neighbours.push(self.at(i, j + 1));
        }
        neighbours
    }

    /// Cells sharing only a corner, anticlockwise from the lower left.
    pub fn corner_neighbours(&self) -> Vec<CurvilinearCell<'a>> {
        let (ni, nj) = (self.coords.ni, self.coords.nj);
        let (i, j) = (self.i, self.j);
        let mut neighbours = Vec::with_capacity(4);
        if i > 0 && j > 0 {
            neighbours.push(self.at(i - 1, j - 1));
        }
        if i < ni - 1 && j > 0 {
            neighbours.push(self.at(i + 1, j - 1));
        }
        if i < ni - 1 && j < nj - 1 {
            neighbours.push(self.at(i + 1, j + 1));
        }
        if i > 0 && j < nj - 1 {
            neighbours.push(self.at(i - 1, j + 1));
        }
        neighbours
    }

    /// Edge neighbours followed by corner neighbours.
    pub fn neighbours(&self) -> Vec<CurvilinearCell<'a>> {
        let mut neighbours = self.edge_neighbours();
        neighbours.extend(self.corner_neighbours());
        neighbours
    }

    /// Area of the corner quadrilateral in square degrees
    /// (Bretschneider's formula). NaN if any corner is NaN.
    pub fn area(&self) -> f64 {
        let [p1, p2, p3, p4] = self.corners();
        let a2 = dist_sq(p1, p2);
        let b2 = dist_sq(p2, p3);
        let c2 = dist_sq(p3, p4);
        let d2 = dist_sq(p4, p1);
        let f2 = dist_sq(p1, p3);
        let g2 = dist_sq(p2, p4);
        let term = b2 + d2 - a2 - c2;
        (4.0 * f2 * g2 - term * term).sqrt() / 4.0
    }

    /// Smallest lon/lat rectangle enclosing the corners.
    pub fn min_bounding_rectangle(&self) -> BoundingBox {
        let corners = self.corners();
        let (mut min_x, mut min_y) = corners[0];
        let (mut max_x, mut max_y) = corners[0];
        for &(x, y) in &corners[1..] {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
        BoundingBox::new(min_x, min_y, max_x, max_y)
    }

    /// Squared lon/lat distance from the centre to a point.
    pub fn distance_sq(&self, lon: f64, lat: f64) -> f64 {
        let (cx, cy) = self.centre();
        let dx = self.harmonize(lon) - cx;
        let dy = lat - cy;
        dx * dx + dy * dy
    }

    /// Whether the point lies inside the corner quadrilateral.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        polygon_contains(&self.corners(), self.harmonize(lon), lat)
    }

    fn harmonize(&self, lon: f64) -> f64 {
        nearest_equivalent_longitude(self.centre().0, lon)
    }

    fn at(&self, i: usize, j: usize) -> CurvilinearCell<'a> {
        CurvilinearCell {
            coords: self.coords,
            i,
            j,
        }
    }
}

fn dist_sq(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    dx * dx + dy * dy
}
