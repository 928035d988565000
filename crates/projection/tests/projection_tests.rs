//! Round trips and domain limits of the supported projections.

use coverage_common::{CrsCode, Extent, HorizontalPosition};
use projection::transform::to_wgs84;
use projection::{transform_position, Geostationary, LambertConformal, Projection, RotatedPole, WebMercator};
use test_utils::{assert_approx_eq, assert_coords_approx_eq};

fn all_projections() -> Vec<Box<dyn Projection>> {
    vec![
        Box::new(LambertConformal::hrrr()),
        Box::new(Geostationary::goes16()),
        Box::new(RotatedPole::new(-170.0, 40.0).unwrap()),
        Box::new(WebMercator),
    ]
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_every_projection_roundtrips() {
    for proj in all_projections() {
        for &(lon, lat) in &[(-95.0, 35.0), (-80.0, 20.0), (-70.0, 45.0)] {
            let (x, y) = proj.lat_lon_to_proj(lon, lat);
            assert!(x.is_finite() && y.is_finite(), "{} could not project ({}, {})", proj.name(), lon, lat);
            let (lon2, lat2) = proj.proj_to_lat_lon(x, y);
            assert_coords_approx_eq!((lon2, lat2), (lon, lat), 1e-6);
        }
    }
}

#[test]
fn test_rotated_pole_origin() {
    let proj = RotatedPole::new(-170.0, 40.0).unwrap();
    let (lon, lat) = proj.proj_to_lat_lon(0.0, 0.0);
    assert_coords_approx_eq!((lon, lat), (10.0, 50.0), 1e-9);
    assert!(proj.is_rotated_pole());
}

// ============================================================================
// Domain limits
// ============================================================================

#[test]
fn test_unrepresentable_points_are_nan() {
    let goes = Geostationary::goes16();
    let (x, y) = goes.lat_lon_to_proj(105.0, 0.0);
    assert!(x.is_nan() && y.is_nan());

    let (x, y) = WebMercator.lat_lon_to_proj(0.0, 89.0);
    assert!(x.is_nan() && y.is_nan());
}

#[test]
fn test_lambert_bounding_box_covers_centre() {
    let proj = LambertConformal::hrrr();
    let (cx, cy) = proj.lat_lon_to_proj(-97.5, 38.5);
    let x = Extent::new(cx - 500_000.0, cx + 500_000.0).unwrap();
    let y = Extent::new(cy - 500_000.0, cy + 500_000.0).unwrap();

    let bbox = proj.lat_lon_bounding_box(x, y);
    assert!(bbox.contains_point(-97.5, 38.5));
    assert!(bbox.max_y - bbox.min_y < 10.0);
}

// ============================================================================
// CRS transforms
// ============================================================================

#[test]
fn test_transform_between_crs_codes() {
    let pos = HorizontalPosition::lon_lat(-97.5, 38.5);
    let merc = transform_position(&pos, CrsCode::Epsg3857).unwrap();
    let back = to_wgs84(&merc).unwrap();
    assert_approx_eq!(back.x, -97.5, 1e-9);
    assert_approx_eq!(back.y, 38.5, 1e-9);

    let polar = HorizontalPosition::lon_lat(0.0, 89.9);
    assert!(transform_position(&polar, CrsCode::Epsg3857).is_err());
}
