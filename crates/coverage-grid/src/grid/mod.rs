//! Two-dimensional horizontal grids.
//!
//! A [`HorizontalGrid`] maps a position in any supported CRS to the `(x, y)`
//! index of the grid cell that contains it. Three variants exist:
//!
//! - [`RectilinearGrid`]: two independent axes in the grid's own CRS
//! - [`ProjectedGrid`]: two axes in a projected space, queried in lon/lat
//! - [`CurvilinearGrid`]: per-cell lon/lat arrays located through a
//!   look-up table
//!
//! Every variant exposes its cells through [`HorizontalGrid::domain_objects`],
//! built on first use and cached for the life of the grid.

mod coords;
mod curvilinear;
mod lookup;
mod projected;
mod rectilinear;

pub use coords::{CurvilinearCell, CurvilinearCoords};
pub use curvilinear::CurvilinearGrid;
pub use lookup::LookUpTable;
pub use projected::ProjectedGrid;
pub use rectilinear::RectilinearGrid;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use coverage_common::{
    nearest_equivalent_longitude, next_equivalent_longitude, BoundingBox, CrsCode, Extent,
    HorizontalPosition,
};
use projection::transform::{to_wgs84, transform_position};
use projection::Projection;

/// Index of a cell in a horizontal grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoordinates {
    pub x: usize,
    pub y: usize,
}

impl GridCoordinates {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GridCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// Capabilities shared by every horizontal grid.
pub trait HorizontalGrid: Send + Sync + fmt::Debug {
    /// CRS in which cell centres are reported.
    fn crs(&self) -> CrsCode;

    /// Number of cells along x.
    fn x_size(&self) -> usize;

    /// Number of cells along y.
    fn y_size(&self) -> usize;

    /// Total number of cells.
    fn size(&self) -> usize {
        self.x_size() * self.y_size()
    }

    /// Envelope of the grid in [`HorizontalGrid::crs`].
    fn bounding_box(&self) -> BoundingBox;

    /// Index of the cell containing `position`, or `None` when the position
    /// falls outside the grid or cannot be expressed in the grid's CRS.
    fn find_index_of(&self, position: &HorizontalPosition) -> Option<GridCoordinates>;

    /// Whether `position` falls inside the grid.
    fn contains(&self, position: &HorizontalPosition) -> bool {
        self.find_index_of(position).is_some()
    }

    /// All cells, row-major with x varying fastest (`j * x_size + i`).
    fn domain_objects(&self) -> &[GridCell];

    /// The grid as a rectilinear grid, if it is one.
    fn as_rectilinear(&self) -> Option<&RectilinearGrid> {
        None
    }

    /// Convert a vector given in the grid's native x/y directions to a
    /// compass heading in degrees clockwise from true north.
    ///
    /// Returns `None` when `position` is outside the grid.
    fn transform_native_heading_to_wgs84(
        &self,
        x_component: f64,
        y_component: f64,
        position: &HorizontalPosition,
    ) -> Option<f64>;
}

/// A single grid cell.
#[derive(Debug, Clone)]
pub struct GridCell {
    pub coordinates: GridCoordinates,
    pub centre: HorizontalPosition,
    pub footprint: Footprint,
}

impl GridCell {
    /// Whether `position` falls inside this cell's footprint.
    pub fn contains(&self, position: &HorizontalPosition) -> bool {
        self.footprint.contains(position)
    }
}

/// The area covered by a grid cell.
#[derive(Clone)]
pub enum Footprint {
    /// An axis-aligned rectangle in `crs`.
    Rectangle {
        x: Extent<f64>,
        y: Extent<f64>,
        crs: CrsCode,
        /// Whether x is a longitude
        wraps: bool,
    },
    /// An axis-aligned rectangle in a projected space.
    Projected {
        x: Extent<f64>,
        y: Extent<f64>,
        projection: Arc<dyn Projection>,
    },
    /// A lon/lat quadrilateral, corners in ring order.
    Quad {
        corners: [(f64, f64); 4],
        centre_lon: f64,
    },
}

impl fmt::Debug for Footprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Footprint::Rectangle { x, y, crs, .. } => write!(f, "Rectangle({} x {} {})", x, y, crs),
            Footprint::Projected { x, y, projection } => {
                write!(f, "Projected({} x {} {})", x, y, projection.name())
            }
            Footprint::Quad { corners, .. } => write!(f, "Quad({:?})", corners),
        }
    }
}

impl Footprint {
    /// Whether `position` falls inside the footprint.
    ///
    /// Positions that cannot be transformed into the footprint's CRS are
    /// never contained.
    pub fn contains(&self, position: &HorizontalPosition) -> bool {
        match self {
            Footprint::Rectangle { x, y, crs, wraps } => {
                let Ok(p) = transform_position(position, *crs) else {
                    return false;
                };
                let px = if *wraps {
                    next_equivalent_longitude(x.low(), p.x)
                } else {
                    p.x
                };
                x.contains(px) && y.contains(p.y)
            }
            Footprint::Projected { x, y, projection } => {
                let Ok(p) = to_wgs84(position) else {
                    return false;
                };
                let (px, py) = projection.lat_lon_to_proj(p.x, p.y);
                let px = if projection.is_rotated_pole() {
                    next_equivalent_longitude(x.low(), px)
                } else {
                    px
                };
                x.contains(px) && y.contains(py)
            }
            Footprint::Quad {
                corners,
                centre_lon,
            } => {
                let Ok(p) = to_wgs84(position) else {
                    return false;
                };
                let lon = nearest_equivalent_longitude(*centre_lon, p.x);
                polygon_contains(corners, lon, p.y)
            }
        }
    }

    /// Corners in ring order. Projected corners are converted to lon/lat.
    pub fn corners(&self) -> [(f64, f64); 4] {
        match self {
            Footprint::Rectangle { x, y, .. } => [
                (x.low(), y.low()),
                (x.high(), y.low()),
                (x.high(), y.high()),
                (x.low(), y.high()),
            ],
            Footprint::Projected { x, y, projection } => [
                projection.proj_to_lat_lon(x.low(), y.low()),
                projection.proj_to_lat_lon(x.high(), y.low()),
                projection.proj_to_lat_lon(x.high(), y.high()),
                projection.proj_to_lat_lon(x.low(), y.high()),
            ],
            Footprint::Quad { corners, .. } => *corners,
        }
    }
}

/// Even-odd ray casting test for a closed polygon.
pub(crate) fn polygon_contains(ring: &[(f64, f64)], x: f64, y: f64) -> bool {
    if x.is_nan() || y.is_nan() || ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if (yi > y) != (yj > y) {
            let x_cross = xi + (y - yi) * (xj - xi) / (yj - yi);
            if x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Compass heading of the vector `(east, north)`, degrees clockwise from
/// north.
pub(crate) fn heading_degrees(east: f64, north: f64) -> f64 {
    east.atan2(north).to_degrees()
}

/// Replace NaN components with the corresponding global bound.
pub(crate) fn fill_nan_with_global(bbox: BoundingBox) -> BoundingBox {
    let global = BoundingBox::global();
    let pick = |v: f64, fallback: f64| if v.is_nan() { fallback } else { v };
    BoundingBox::new(
        pick(bbox.min_x, global.min_x),
        pick(bbox.min_y, global.min_y),
        pick(bbox.max_x, global.max_x),
        pick(bbox.max_y, global.max_y),
    )
}
