//! Grids whose axes live in a projected coordinate space.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::warn;

use coverage_common::{constrain_longitude_180, BoundingBox, CrsCode, Extent, HorizontalPosition};
use projection::transform::to_wgs84;
use projection::Projection;

use super::{
    fill_nan_with_global, heading_degrees, Footprint, GridCell, GridCoordinates, HorizontalGrid,
};
use crate::axis::{Axis, ReferenceableAxis};

/// Finite-difference step used to estimate the local orientation of the
/// projected axes, as a fraction of the cell size.
const HEADING_STEP: f64 = 1e-4;

/// A grid defined by two axes in a projected space.
///
/// Queries are made in lon/lat: positions are transformed to WGS84,
/// checked against the geographic bounding box, projected and then looked
/// up on the axes. For rotated-pole projections the x axis wraps like a
/// longitude.
pub struct ProjectedGrid {
    projection: Arc<dyn Projection>,
    x_axis: Axis,
    y_axis: Axis,
    bbox: BoundingBox,
    cells: OnceCell<Vec<GridCell>>,
}

impl fmt::Debug for ProjectedGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectedGrid")
            .field("projection", &self.projection.name())
            .field("x_axis", &self.x_axis)
            .field("y_axis", &self.y_axis)
            .field("bbox", &self.bbox)
            .finish()
    }
}

impl ProjectedGrid {
    /// Create a grid whose geographic bounds come from the projection.
    ///
    /// NaN bounds are replaced by the global ones. A degenerate box, with
    /// zero width or height, is replaced by the whole globe.
    pub fn new(projection: Arc<dyn Projection>, x_axis: Axis, y_axis: Axis) -> Self {
        let x_axis = wrap_if_rotated(projection.as_ref(), x_axis);
        let bbox = projection.lat_lon_bounding_box(
            x_axis.coordinate_extent(),
            y_axis.coordinate_extent(),
        );
        let bbox = non_degenerate(fill_nan_with_global(bbox), projection.name());
        Self::with_bbox(projection, x_axis, y_axis, bbox)
    }

    /// Create a grid whose geographic bounds are found by unprojecting
    /// every axis value along the grid perimeter.
    ///
    /// Perimeter points with no geographic image are ignored. If none
    /// remain, or the result is degenerate, the bounds are global.
    pub fn with_perimeter_bbox(projection: Arc<dyn Projection>, x_axis: Axis, y_axis: Axis) -> Self {
        let x_axis = wrap_if_rotated(projection.as_ref(), x_axis);
        let xs = x_axis.coordinate_values();
        let ys = y_axis.coordinate_values();

        let mut perimeter = Vec::with_capacity(2 * (xs.len() + ys.len()));
        if let (Some(&y_first), Some(&y_last)) = (ys.first(), ys.last()) {
            for &x in &xs {
                perimeter.push(projection.proj_to_lat_lon(x, y_first));
                perimeter.push(projection.proj_to_lat_lon(x, y_last));
            }
        }
        if let (Some(&x_first), Some(&x_last)) = (xs.first(), xs.last()) {
            for &y in &ys {
                perimeter.push(projection.proj_to_lat_lon(x_first, y));
                perimeter.push(projection.proj_to_lat_lon(x_last, y));
            }
        }

        let lons = Extent::find_min_max(perimeter.iter().map(|p| p.0));
        let lats = Extent::find_min_max(perimeter.iter().map(|p| p.1));
        let bbox = match (lons, lats) {
            (Some(lon), Some(lat)) => {
                non_degenerate(BoundingBox::from_extents(lon, lat), projection.name())
            }
            _ => {
                warn!(
                    projection = projection.name(),
                    "No perimeter point has a geographic position, using global bounds"
                );
                BoundingBox::global()
            }
        };
        Self::with_bbox(projection, x_axis, y_axis, bbox)
    }

    fn with_bbox(projection: Arc<dyn Projection>, x_axis: Axis, y_axis: Axis, bbox: BoundingBox) -> Self {
        Self {
            projection,
            x_axis,
            y_axis,
            bbox,
            cells: OnceCell::new(),
        }
    }

    pub fn projection(&self) -> &Arc<dyn Projection> {
        &self.projection
    }

    pub fn x_axis(&self) -> &Axis {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &Axis {
        &self.y_axis
    }

    fn build_cells(&self) -> Vec<GridCell> {
        let mut cells = Vec::with_capacity(self.size());
        for j in 0..self.y_axis.size() {
            for i in 0..self.x_axis.size() {
                let (Some(cx), Some(cy), Some(bx), Some(by)) = (
                    self.x_axis.coordinate_value(i),
                    self.y_axis.coordinate_value(j),
                    self.x_axis.coordinate_bounds(i),
                    self.y_axis.coordinate_bounds(j),
                ) else {
                    continue;
                };
                let (lon, lat) = self.projection.proj_to_lat_lon(cx, cy);
                cells.push(GridCell {
                    coordinates: GridCoordinates::new(i, j),
                    centre: HorizontalPosition::lon_lat(lon, lat),
                    footprint: Footprint::Projected {
                        x: bx,
                        y: by,
                        projection: Arc::clone(&self.projection),
                    },
                });
            }
        }
        cells
    }
}

fn wrap_if_rotated(projection: &dyn Projection, x_axis: Axis) -> Axis {
    if projection.is_rotated_pole() {
        x_axis.into_longitude()
    } else {
        x_axis
    }
}

fn non_degenerate(bbox: BoundingBox, projection: &str) -> BoundingBox {
    if bbox.min_x == bbox.max_x || bbox.min_y == bbox.max_y {
        warn!(
            projection,
            bbox = ?bbox,
            "Degenerate geographic bounding box, using global bounds"
        );
        return BoundingBox::global();
    }
    bbox
}

impl HorizontalGrid for ProjectedGrid {
    fn crs(&self) -> CrsCode {
        CrsCode::Epsg4326
    }

    fn x_size(&self) -> usize {
        self.x_axis.size()
    }

    fn y_size(&self) -> usize {
        self.y_axis.size()
    }

    fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    fn find_index_of(&self, position: &HorizontalPosition) -> Option<GridCoordinates> {
        let p = to_wgs84(position).ok()?;
        if !self.bbox.contains_lon_lat(p.x, p.y) {
            return None;
        }
        let (x, y) = self.projection.lat_lon_to_proj(p.x, p.y);
        if x.is_nan() || y.is_nan() {
            return None;
        }
        let i = self.x_axis.find_index_of(x)?;
        let j = self.y_axis.find_index_of(y)?;
        Some(GridCoordinates::new(i, j))
    }

    fn domain_objects(&self) -> &[GridCell] {
        self.cells.get_or_init(|| self.build_cells())
    }

    /// Rotates the vector by the local Jacobian of the inverse projection,
    /// estimated by finite differences around the projected position.
    fn transform_native_heading_to_wgs84(
        &self,
        x_component: f64,
        y_component: f64,
        position: &HorizontalPosition,
    ) -> Option<f64> {
        let coords = self.find_index_of(position)?;
        let p = to_wgs84(position).ok()?;
        let step_x = HEADING_STEP * self.x_axis.coordinate_bounds(coords.x)?.width();
        let step_y = HEADING_STEP * self.y_axis.coordinate_bounds(coords.y)?.width();

        let (cx, cy) = self.projection.lat_lon_to_proj(p.x, p.y);
        let (x_plus_lon, x_plus_lat) = self.projection.proj_to_lat_lon(cx + step_x, cy);
        let (y_plus_lon, y_plus_lat) = self.projection.proj_to_lat_lon(cx, cy + step_y);

        // Metres per degree of longitude shrink towards the poles
        let lon_scale = p.y.to_radians().cos();
        let d_lon_dx = constrain_longitude_180(x_plus_lon - p.x) * lon_scale / step_x;
        let d_lon_dy = constrain_longitude_180(y_plus_lon - p.x) * lon_scale / step_y;
        let d_lat_dx = (x_plus_lat - p.y) / step_x;
        let d_lat_dy = (y_plus_lat - p.y) / step_y;

        let east = (d_lon_dx * x_component + d_lon_dy * y_component) as f32;
        let north = (d_lat_dx * x_component + d_lat_dy * y_component) as f32;
        let heading = heading_degrees(east as f64, north as f64);
        heading.is_finite().then_some(heading)
    }
}
