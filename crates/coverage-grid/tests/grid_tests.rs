//! Position lookup across the horizontal grid variants.

use std::sync::Arc;

use coverage_common::{CrsCode, HorizontalPosition};
use coverage_grid::{
    create_horizontal_grid, Axis, AxisKind, CoordinateSystemSpec, CoordinateVariable, CoverageConfig,
    CurvilinearCoords, CurvilinearGrid, GridCoordinates, HorizontalGrid, ProjectedGrid, ProjectionSpec,
    RectilinearGrid, RegularAxis,
};
use projection::{LambertConformal, Projection};
use test_utils::fixtures::{bbox, grid as grid_fixtures};
use test_utils::{assert_approx_eq, init_test_tracing};

fn rectilinear() -> RectilinearGrid {
    let (x, y) = grid_fixtures::RECTILINEAR;
    RectilinearGrid::new(
        Axis::Regular(RegularAxis::new("longitude", x.first, x.spacing, x.size, true).unwrap()),
        Axis::Regular(RegularAxis::new("latitude", y.first, y.spacing, y.size, false).unwrap()),
        CrsCode::Epsg4326,
    )
}

// ============================================================================
// Rectilinear grid
// ============================================================================

#[test]
fn test_rectilinear_sizes_and_bbox() {
    let grid = rectilinear();
    assert_eq!(grid.x_size(), 12);
    assert_eq!(grid.y_size(), 16);
    assert_eq!(grid.size(), 192);

    let bbox = grid.bounding_box();
    let (min_x, min_y, max_x, max_y) = bbox::RECTILINEAR;
    assert_approx_eq!(bbox.min_x, min_x, 1e-10);
    assert_approx_eq!(bbox.min_y, min_y, 1e-10);
    assert_approx_eq!(bbox.max_x, max_x, 1e-10);
    assert_approx_eq!(bbox.max_y, max_y, 1e-10);
}

#[test]
fn test_rectilinear_domain_objects_are_row_major_centres() {
    let grid = rectilinear();
    let cells = grid.domain_objects();
    assert_eq!(cells.len(), 192);
    for cell in cells {
        let GridCoordinates { x, y } = cell.coordinates;
        assert_eq!(cells[x + y * 12].coordinates, cell.coordinates);
        assert_approx_eq!(cell.centre.x, 95.0 + x as f64 * 0.5, 1e-10);
        assert_approx_eq!(cell.centre.y, 33.0 + y as f64 * 0.5, 1e-10);
        assert!(cell.contains(&cell.centre));
    }
    // The same slice is handed out on every call
    assert!(std::ptr::eq(cells, grid.domain_objects()));
}

#[test]
fn test_rectilinear_contains() {
    let grid = rectilinear();
    assert!(!grid.contains(&HorizontalPosition::lon_lat(120.0, 30.0)));
    assert!(grid.contains(&HorizontalPosition::lon_lat(96.0, 34.6)));
    assert!(grid.contains(&HorizontalPosition::lon_lat(96.0, 40.7)));
    assert!(!grid.contains(&HorizontalPosition::lon_lat(f64::NAN, 35.0)));
    // A Web Mercator position far from the grid
    assert!(!grid.contains(&HorizontalPosition::new(17945.19, 41625.34, CrsCode::Epsg3857)));
}

#[test]
fn test_rectilinear_find_index_of() {
    let grid = rectilinear();
    assert_eq!(
        grid.find_index_of(&HorizontalPosition::lon_lat(95.3, 34.35)),
        Some(GridCoordinates::new(1, 3))
    );
    assert_eq!(
        grid.find_index_of(&HorizontalPosition::lon_lat(100.4, 40.7)),
        Some(GridCoordinates::new(11, 15))
    );
    // Equivalent longitude one turn away
    assert_eq!(
        grid.find_index_of(&HorizontalPosition::lon_lat(95.3 - 360.0, 34.35)),
        Some(GridCoordinates::new(1, 3))
    );
}

#[test]
fn test_rectilinear_find_index_of_web_mercator() {
    let grid = rectilinear();
    let mercator = projection::WebMercator;
    let (x, y) = mercator.lat_lon_to_proj(95.3, 34.35);
    assert_eq!(
        grid.find_index_of(&HorizontalPosition::new(x, y, CrsCode::Epsg3857)),
        Some(GridCoordinates::new(1, 3))
    );
}

#[test]
fn test_global_grid_wraps() {
    let grid = RectilinearGrid::new(
        Axis::Regular(RegularAxis::new("lon", 0.0, 1.0, 360, true).unwrap()),
        Axis::Regular(RegularAxis::new("lat", -90.0, 1.0, 181, false).unwrap()),
        CrsCode::Epsg4326,
    );
    assert_eq!(
        grid.find_index_of(&HorizontalPosition::lon_lat(-1.0, 0.0)),
        Some(GridCoordinates::new(359, 90))
    );
    assert_eq!(
        grid.find_index_of(&HorizontalPosition::lon_lat(359.6, 0.0)),
        Some(GridCoordinates::new(0, 90))
    );
}

#[test]
fn test_rectilinear_heading() {
    let grid = rectilinear();
    let position = HorizontalPosition::lon_lat(96.0, 35.0);
    assert_approx_eq!(grid.transform_native_heading_to_wgs84(0.0, 1.0, &position).unwrap(), 0.0, 1e-9);
    assert_approx_eq!(grid.transform_native_heading_to_wgs84(1.0, 0.0, &position).unwrap(), 90.0, 1e-9);
    assert_approx_eq!(grid.transform_native_heading_to_wgs84(-1.0, -1.0, &position).unwrap(), -135.0, 1e-9);
    assert_eq!(
        grid.transform_native_heading_to_wgs84(1.0, 0.0, &HorizontalPosition::lon_lat(0.0, 0.0)),
        None
    );
}

// ============================================================================
// Projected grid
// ============================================================================

fn lambert_grid() -> ProjectedGrid {
    let projection: Arc<dyn Projection> = Arc::new(LambertConformal::hrrr());
    ProjectedGrid::new(
        projection,
        Axis::Regular(RegularAxis::new("x", -2_699_020.0, 30_000.0, 180, false).unwrap()),
        Axis::Regular(RegularAxis::new("y", -1_588_806.0, 30_000.0, 106, false).unwrap()),
    )
}

#[test]
fn test_projected_find_roundtrips_cell_centres() {
    init_test_tracing();
    let grid = lambert_grid();
    for cell in grid.domain_objects().iter().step_by(97) {
        assert_eq!(grid.find_index_of(&cell.centre), Some(cell.coordinates));
    }
}

#[test]
fn test_projected_outside_is_none() {
    let grid = lambert_grid();
    assert_eq!(grid.find_index_of(&HorizontalPosition::lon_lat(10.0, 50.0)), None);
    assert_eq!(grid.find_index_of(&HorizontalPosition::lon_lat(-97.5, -30.0)), None);
}

#[test]
fn test_projected_bbox_covers_conus() {
    let grid = lambert_grid();
    let bbox = grid.bounding_box();
    assert!(bbox.contains_point(-100.0, 40.0));
    assert!(bbox.min_x < -120.0 && bbox.max_x > -75.0);
    assert!(bbox.min_y > 0.0 && bbox.max_y < 70.0);
}

// ============================================================================
// Curvilinear grid
// ============================================================================

/// A lattice of `n` × `n` cells sheared so that rows are not parallels.
fn sheared_coords(n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut lons = Vec::new();
    let mut lats = Vec::new();
    for j in 0..n {
        for i in 0..n {
            lons.push(-20.0 + i as f64 * 0.5 + j as f64 * 0.1);
            lats.push(30.0 + j as f64 * 0.5 + i as f64 * 0.05);
        }
    }
    (lons, lats)
}

#[test]
fn test_curvilinear_centres_roundtrip() {
    let (lons, lats) = sheared_coords(10);
    let coords = CurvilinearCoords::new(10, 10, &lons, &lats).unwrap();
    let grid = CurvilinearGrid::new(coords, 3.0).unwrap();
    for cell in grid.domain_objects() {
        assert_eq!(grid.find_index_of(&cell.centre), Some(cell.coordinates));
    }
}

#[test]
fn test_curvilinear_outside_is_none() {
    let (lons, lats) = sheared_coords(10);
    let coords = CurvilinearCoords::new(10, 10, &lons, &lats).unwrap();
    let grid = CurvilinearGrid::new(coords, 3.0).unwrap();
    assert_eq!(grid.find_index_of(&HorizontalPosition::lon_lat(100.0, 0.0)), None);
}

#[test]
fn test_curvilinear_rejects_small_or_mismatched_input() {
    assert!(CurvilinearCoords::new(2, 2, &[0.0; 4], &[0.0; 4]).is_err());
    assert!(CurvilinearCoords::new(3, 3, &[0.0; 9], &[0.0; 8]).is_err());
    assert!(CurvilinearCoords::new(3, 3, &[0.0; 8], &[0.0; 8]).is_err());
}

// ============================================================================
// Factory
// ============================================================================

#[test]
fn test_factory_builds_each_variant() {
    init_test_tracing();
    let config = CoverageConfig::default();

    let rect = CoordinateSystemSpec {
        x: CoordinateVariable::one_d("lon", AxisKind::Longitude, vec![0.0, 1.0, 2.0]),
        y: CoordinateVariable::one_d("lat", AxisKind::Latitude, vec![0.0, 1.0]),
        projection: None,
    };
    let grid = create_horizontal_grid(&rect, &config).unwrap();
    assert!(grid.as_rectilinear().is_some());

    let projected = CoordinateSystemSpec {
        x: CoordinateVariable::one_d("x", AxisKind::ProjectionX, (0..10).map(|i| i as f64 * 3000.0).collect()),
        y: CoordinateVariable::one_d("y", AxisKind::ProjectionY, (0..8).map(|i| i as f64 * 3000.0).collect()),
        projection: Some(ProjectionSpec::LambertConformal {
            lat0: 38.5,
            lon0: -97.5,
            latin1: 38.5,
            latin2: 38.5,
            earth_radius: 6_371_229.0,
        }),
    };
    let grid = create_horizontal_grid(&projected, &config).unwrap();
    assert_eq!(grid.size(), 80);
    assert!(grid.contains(&HorizontalPosition::lon_lat(-97.5, 38.5)));

    let (lons, lats) = sheared_coords(6);
    let curvilinear = CoordinateSystemSpec {
        x: CoordinateVariable::two_d("nav_lon", AxisKind::Longitude, 6, 6, lons),
        y: CoordinateVariable::two_d("nav_lat", AxisKind::Latitude, 6, 6, lats),
        projection: None,
    };
    let grid = create_horizontal_grid(&curvilinear, &config).unwrap();
    assert_eq!((grid.x_size(), grid.y_size()), (6, 6));
    let centre = grid.domain_objects()[2 * 6 + 3].centre;
    assert_eq!(grid.find_index_of(&centre), Some(GridCoordinates::new(3, 2)));
}
