//! Curvilinear grids located through a look-up table.

use std::collections::HashSet;

use once_cell::sync::OnceCell;

use coverage_common::{constrain_longitude_180, BoundingBox, CrsCode, HorizontalPosition};
use projection::transform::to_wgs84;

use super::coords::{CurvilinearCell, CurvilinearCoords};
use super::lookup::LookUpTable;
use super::{heading_degrees, Footprint, GridCell, GridCoordinates, HorizontalGrid};
use crate::error::{GridError, Result};

/// Upper bound on the number of steps in the nearest-cell walk.
const MAX_WALK_STEPS: usize = 100;

/// A grid defined by per-cell longitudes and latitudes.
///
/// A position is first looked up in a raster [`LookUpTable`]. If the cell
/// found there does not contain the position, the search walks towards
/// the nearest cell centre and finally falls back to the nearest cell.
#[derive(Debug)]
pub struct CurvilinearGrid {
    coords: CurvilinearCoords,
    lut: LookUpTable,
    cells: OnceCell<Vec<GridCell>>,
}

impl CurvilinearGrid {
    /// Build a grid and its look-up table.
    ///
    /// The table resolution is the square root of the mean cell area
    /// divided by `resolution_factor`.
    pub fn new(coords: CurvilinearCoords, resolution_factor: f64) -> Result<Self> {
        let mean_area = coords.mean_cell_area();
        if !(mean_area > 0.0) {
            return Err(GridError::invalid_argument(format!(
                "cannot size a look-up table from mean cell area {}",
                mean_area
            )));
        }
        let lut = LookUpTable::new(&coords, mean_area.sqrt() / resolution_factor)?;
        Ok(Self {
            coords,
            lut,
            cells: OnceCell::new(),
        })
    }

    pub fn coords(&self) -> &CurvilinearCoords {
        &self.coords
    }

    pub fn look_up_table(&self) -> &LookUpTable {
        &self.lut
    }

    fn find_cell(&self, lon: f64, lat: f64) -> Option<CurvilinearCell<'_>> {
        let (i, j) = self.lut.grid_coordinates(lon, lat)?;
        let mut cell = self.coords.cell(i, j)?;
        if cell.contains(lon, lat) {
            return Some(cell);
        }

        // The table is approximate near cell edges: walk downhill on the
        // distance to cell centres.
        let mut examined = HashSet::new();
        examined.insert((cell.i(), cell.j()));
        let mut shortest = cell.distance_sq(lon, lat);
        let mut moved = true;
        let mut steps = 0;
        while moved && steps < MAX_WALK_STEPS {
            moved = false;
            for neighbour in cell.neighbours() {
                if !examined.insert((neighbour.i(), neighbour.j())) {
                    continue;
                }
                let distance = neighbour.distance_sq(lon, lat);
                if distance < shortest {
                    cell = neighbour;
                    shortest = distance;
                    moved = true;
                }
            }
            steps += 1;
        }

        if cell.contains(lon, lat) {
            return Some(cell);
        }
        if let Some(neighbour) = cell.neighbours().into_iter().find(|n| n.contains(lon, lat)) {
            return Some(neighbour);
        }
        Some(cell)
    }

    fn build_cells(&self) -> Vec<GridCell> {
        self.coords
            .cells()
            .map(|cell| {
                let (lon, lat) = cell.centre();
                GridCell {
                    coordinates: GridCoordinates::new(cell.i(), cell.j()),
                    centre: HorizontalPosition::lon_lat(lon, lat),
                    footprint: Footprint::Quad {
                        corners: cell.corners(),
                        centre_lon: lon,
                    },
                }
            })
            .collect()
    }
}

impl HorizontalGrid for CurvilinearGrid {
    fn crs(&self) -> CrsCode {
        CrsCode::Epsg4326
    }

    fn x_size(&self) -> usize {
        self.coords.ni()
    }

    fn y_size(&self) -> usize {
        self.coords.nj()
    }

    fn bounding_box(&self) -> BoundingBox {
        self.coords.bounding_box()
    }

    fn find_index_of(&self, position: &HorizontalPosition) -> Option<GridCoordinates> {
        let p = to_wgs84(position).ok()?;
        let cell = self.find_cell(p.x, p.y)?;
        Some(GridCoordinates::new(cell.i(), cell.j()))
    }

    fn domain_objects(&self) -> &[GridCell] {
        self.cells.get_or_init(|| self.build_cells())
    }

    /// Estimates the local axis directions from the centres of the next
    /// cells along i and j, mirrored at the far edges.
    fn transform_native_heading_to_wgs84(
        &self,
        x_component: f64,
        y_component: f64,
        position: &HorizontalPosition,
    ) -> Option<f64> {
        let index = self.find_index_of(position)?;
        let (ni, nj) = (self.coords.ni(), self.coords.nj());
        let (x, y) = (index.x, index.y);
        let centre = self.coords.midpoint(x, y);

        let mirrored = |p: (f64, f64)| (2.0 * centre.0 - p.0, 2.0 * centre.1 - p.1);
        let plus_x = if x + 1 < ni {
            self.coords.midpoint(x + 1, y)
        } else {
            mirrored(self.coords.midpoint(x - 1, y))
        };
        let plus_y = if y + 1 < nj {
            self.coords.midpoint(x, y + 1)
        } else {
            mirrored(self.coords.midpoint(x, y - 1))
        };

        let lon_scale = centre.1.to_radians().cos();
        let d_lon_dx = constrain_longitude_180(plus_x.0 - centre.0) * lon_scale;
        let d_lat_dx = plus_x.1 - centre.1;
        let d_lon_dy = constrain_longitude_180(plus_y.0 - centre.0) * lon_scale;
        let d_lat_dy = plus_y.1 - centre.1;

        let east = (d_lon_dx * x_component + d_lon_dy * y_component) as f32;
        let north = (d_lat_dx * x_component + d_lat_dy * y_component) as f32;
        let heading = heading_degrees(east as f64, north as f64);
        heading.is_finite().then_some(heading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A lattice rotated by `angle` degrees about `(lon0, lat0)`.
    fn rotated_lattice(n: usize, angle: f64) -> CurvilinearGrid {
        let (s, c) = angle.to_radians().sin_cos();
        let mut lons = Vec::new();
        let mut lats = Vec::new();
        for j in 0..n {
            for i in 0..n {
                let (u, v) = (i as f64 * 0.5, j as f64 * 0.5);
                lons.push(10.0 + u * c - v * s);
                lats.push(5.0 + u * s + v * c);
            }
        }
        let coords = CurvilinearCoords::new(n, n, &lons, &lats).unwrap();
        CurvilinearGrid::new(coords, 3.0).unwrap()
    }

    #[test]
    fn test_centres_find_their_own_cells() {
        let grid = rotated_lattice(12, 30.0);
        for cell in grid.domain_objects() {
            assert_eq!(grid.find_index_of(&cell.centre), Some(cell.coordinates));
        }
    }

    #[test]
    fn test_outside_lut_is_none() {
        let grid = rotated_lattice(12, 30.0);
        assert_eq!(grid.find_index_of(&HorizontalPosition::lon_lat(100.0, 5.0)), None);
        assert!(!grid.contains(&HorizontalPosition::lon_lat(10.0, -40.0)));
    }

    #[test]
    fn test_heading_follows_rotation() {
        let grid = rotated_lattice(12, 30.0);
        let centre = grid.domain_objects()[5 * 12 + 5].centre;
        let heading = grid
            .transform_native_heading_to_wgs84(0.0, 1.0, &centre)
            .unwrap();
        // The j direction points 30° anticlockwise from north in lon/lat
        // degrees; scaling longitude by cos(lat) narrows that slightly.
        assert!(heading < -25.0 && heading > -30.0, "heading was {}", heading);
    }

    #[test]
    fn test_heading_at_last_column_mirrors() {
        let grid = rotated_lattice(12, 0.0);
        let cell = &grid.domain_objects()[3 * 12 + 11];
        let heading = grid
            .transform_native_heading_to_wgs84(1.0, 0.0, &cell.centre)
            .unwrap();
        assert!((heading - 90.0).abs() < 1e-6, "heading was {}", heading);
    }
}
