//! Grids formed from two independent axes.

use once_cell::sync::OnceCell;

use coverage_common::{BoundingBox, CrsCode, HorizontalPosition};
use projection::transform::transform_position;

use super::{heading_degrees, Footprint, GridCell, GridCoordinates, HorizontalGrid};
use crate::axis::{Axis, ReferenceableAxis};

/// A grid whose cells are the product of an x axis and a y axis, both in
/// the grid's CRS.
///
/// In a geographic CRS the x axis is always treated as a longitude axis.
#[derive(Debug)]
pub struct RectilinearGrid {
    x_axis: Axis,
    y_axis: Axis,
    crs: CrsCode,
    cells: OnceCell<Vec<GridCell>>,
}

impl RectilinearGrid {
    pub fn new(x_axis: Axis, y_axis: Axis, crs: CrsCode) -> Self {
        let x_axis = if crs.is_geographic() {
            x_axis.into_longitude()
        } else {
            x_axis
        };
        Self {
            x_axis,
            y_axis,
            crs,
            cells: OnceCell::new(),
        }
    }

    pub fn x_axis(&self) -> &Axis {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &Axis {
        &self.y_axis
    }

    /// Express `position` in this grid's CRS.
    fn to_native(&self, position: &HorizontalPosition) -> Option<HorizontalPosition> {
        if position.crs.is_equivalent(&self.crs) {
            return Some(*position);
        }
        transform_position(position, self.crs).ok()
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
                cells.push(GridCell {
                    coordinates: GridCoordinates::new(i, j),
                    centre: HorizontalPosition::new(cx, cy, self.crs),
                    footprint: Footprint::Rectangle {
                        x: bx,
                        y: by,
                        crs: self.crs,
                        wraps: self.x_axis.is_longitude(),
                    },
                });
            }
        }
        cells
    }
}

impl HorizontalGrid for RectilinearGrid {
    fn crs(&self) -> CrsCode {
        self.crs
    }

    fn x_size(&self) -> usize {
        self.x_axis.size()
    }

    fn y_size(&self) -> usize {
        self.y_axis.size()
    }

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_extents(
            self.x_axis.coordinate_extent(),
            self.y_axis.coordinate_extent(),
        )
    }

    fn find_index_of(&self, position: &HorizontalPosition) -> Option<GridCoordinates> {
        let native = self.to_native(position)?;
        let x = self.x_axis.find_index_of(native.x)?;
        let y = self.y_axis.find_index_of(native.y)?;
        Some(GridCoordinates::new(x, y))
    }

    fn contains(&self, position: &HorizontalPosition) -> bool {
        match self.to_native(position) {
            Some(p) => self.x_axis.contains(p.x) && self.y_axis.contains(p.y),
            None => false,
        }
    }

    fn domain_objects(&self) -> &[GridCell] {
        self.cells.get_or_init(|| self.build_cells())
    }

    fn as_rectilinear(&self) -> Option<&RectilinearGrid> {
        Some(self)
    }

    /// Both supported CRS families keep x pointing east and y pointing
    /// north, so the heading follows directly from the components.
    fn transform_native_heading_to_wgs84(
        &self,
        x_component: f64,
        y_component: f64,
        position: &HorizontalPosition,
    ) -> Option<f64> {
        if !self.contains(position) {
            return None;
        }
        Some(heading_degrees(x_component, y_component))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::RegularAxis;

    fn small_grid() -> RectilinearGrid {
        RectilinearGrid::new(
            Axis::Regular(RegularAxis::new("lon", 0.0, 1.0, 4, false).unwrap()),
            Axis::Regular(RegularAxis::new("lat", 10.0, 1.0, 3, false).unwrap()),
            CrsCode::Epsg4326,
        )
    }

    #[test]
    fn test_geographic_x_axis_wraps() {
        let grid = small_grid();
        assert!(grid.x_axis().is_longitude());
        assert_eq!(
            grid.find_index_of(&HorizontalPosition::lon_lat(362.0, 11.0)),
            Some(GridCoordinates::new(2, 1))
        );
    }

    #[test]
    fn test_domain_objects_are_cached_row_major() {
        let grid = small_grid();
        let cells = grid.domain_objects();
        assert_eq!(cells.len(), 12);
        assert_eq!(cells[5].coordinates, GridCoordinates::new(1, 1));
        assert_eq!(cells[5].centre, HorizontalPosition::lon_lat(1.0, 11.0));
        assert!(std::ptr::eq(cells, grid.domain_objects()));
    }

    #[test]
    fn test_cell_footprint_contains_centre() {
        let grid = small_grid();
        for cell in grid.domain_objects() {
            assert!(cell.contains(&cell.centre));
        }
    }

    #[test]
    fn test_heading_outside_grid() {
        let grid = small_grid();
        let outside = HorizontalPosition::lon_lat(50.0, 50.0);
        assert_eq!(grid.transform_native_heading_to_wgs84(1.0, 0.0, &outside), None);
        let inside = HorizontalPosition::lon_lat(1.0, 11.0);
        assert_eq!(grid.transform_native_heading_to_wgs84(1.0, 0.0, &inside), Some(90.0));
    }
}
