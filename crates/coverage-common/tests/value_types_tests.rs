//! Tests for the shared bounding box, extent and longitude helpers.

use coverage_common::bbox::{BboxParseError, BoundingBox};
use coverage_common::{
    constrain_longitude_180, nearest_equivalent_longitude, CrsCode, Extent, HorizontalPosition,
};

// ============================================================================
// BoundingBox parsing
// ============================================================================

#[test]
fn test_parse_bbox_integer() {
    let bbox = "0,0,100,100".parse::<BoundingBox>().unwrap();
    assert_eq!(bbox, BoundingBox::new(0.0, 0.0, 100.0, 100.0));
}

#[test]
fn test_parse_bbox_invalid_format_too_few() {
    let result = "0,0,100".parse::<BoundingBox>();
    assert!(matches!(result, Err(BboxParseError::InvalidFormat(_))));
}

#[test]
fn test_parse_bbox_invalid_number() {
    let result = "0,abc,100,100".parse::<BoundingBox>();
    assert!(matches!(result, Err(BboxParseError::InvalidNumber(_))));
}

// ============================================================================
// BoundingBox geometry
// ============================================================================

#[test]
fn test_bbox_from_extents() {
    let bbox = BoundingBox::from_extents(Extent::ordered(101.0, 95.0), Extent::ordered(33.0, 41.0));
    assert_eq!(bbox.min_x, 95.0);
    assert_eq!(bbox.max_x, 101.0);
    assert_eq!(bbox.width(), 6.0);
    assert_eq!(bbox.height(), 8.0);
}

#[test]
fn test_bbox_global_contains_everything() {
    let global = BoundingBox::global();
    assert!(global.contains_lon_lat(-180.0, -90.0));
    assert!(global.contains_lon_lat(540.0, 90.0));
    assert!(!global.contains_lon_lat(0.0, 90.5));
}

#[test]
fn test_bbox_lon_lat_equivalents() {
    let bbox = BoundingBox::new(94.75, 32.75, 100.75, 40.75);
    for lon in [95.0, 95.0 + 360.0, 95.0 - 360.0, 95.0 + 720.0] {
        assert!(bbox.contains_lon_lat(lon, 35.0), "{} should be contained", lon);
    }
    assert!(!bbox.contains_lon_lat(120.0, 35.0));
    assert!(!bbox.contains_lon_lat(f64::NAN, 35.0));
}

#[test]
fn test_bbox_intersection() {
    let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    let b = BoundingBox::new(5.0, 5.0, 15.0, 15.0);
    let c = BoundingBox::new(20.0, 20.0, 30.0, 30.0);
    assert_eq!(a.intersection(&b), Some(BoundingBox::new(5.0, 5.0, 10.0, 10.0)));
    assert!(a.intersection(&c).is_none());
}

// ============================================================================
// Extent
// ============================================================================

#[test]
fn test_extent_integer_contains() {
    let e = Extent::new(0usize, 11).unwrap();
    assert!(e.contains(0));
    assert!(e.contains(11));
    assert!(!e.contains(12));
}

#[test]
fn test_extent_display() {
    assert_eq!(Extent::ordered(2.5, 1.0).to_string(), "[1, 2.5]");
}

// ============================================================================
// Longitude helpers
// ============================================================================

#[test]
fn test_constrain_180_is_idempotent() {
    for v in [-540.0, -181.0, -10.0, 0.0, 179.5, 181.0, 900.0] {
        let once = constrain_longitude_180(v);
        assert!(once > -180.0 && once <= 180.0);
        assert_eq!(constrain_longitude_180(once), once);
    }
}

#[test]
fn test_nearest_equivalent_is_within_half_turn() {
    for target in [-170.0, 0.0, 90.0, 179.0] {
        for lon in [-300.0, -90.0, 45.0, 359.0] {
            let nearest = nearest_equivalent_longitude(target, lon);
            assert!((nearest - target).abs() <= 180.0);
        }
    }
}

// ============================================================================
// Positions
// ============================================================================

#[test]
fn test_position_nan_detection() {
    assert!(HorizontalPosition::lon_lat(f64::NAN, 0.0).is_nan());
    assert!(!HorizontalPosition::new(1.0, 2.0, CrsCode::Epsg3857).is_nan());
}

#[test]
fn test_position_serde_round_trip() {
    let pos = HorizontalPosition::lon_lat(10.5, -3.25);
    let json = serde_json::to_string(&pos).unwrap();
    let back: HorizontalPosition = serde_json::from_str(&json).unwrap();
    assert_eq!(pos, back);
}
