//! Transforms of positions between the supported CRS codes.

use coverage_common::{CrsCode, HorizontalPosition};

use crate::error::{ProjectionError, ProjectionResult};
use crate::mercator::WebMercator;
use crate::Projection;

/// Express `pos` in the `target` CRS.
///
/// The two geographic codes are treated as numerically identical. Points
/// with no image in the target CRS fail with `NotRepresentable`.
pub fn transform_position(
    pos: &HorizontalPosition,
    target: CrsCode,
) -> ProjectionResult<HorizontalPosition> {
    if pos.crs.is_equivalent(&target) {
        return Ok(HorizontalPosition::new(pos.x, pos.y, target));
    }

    let (x, y) = match (pos.crs, target) {
        (from, CrsCode::Epsg3857) if from.is_geographic() => WebMercator.lat_lon_to_proj(pos.x, pos.y),
        (CrsCode::Epsg3857, to) if to.is_geographic() => WebMercator.proj_to_lat_lon(pos.x, pos.y),
        (from, to) => return Err(ProjectionError::UnsupportedTransform { from, to }),
    };

    if x.is_nan() || y.is_nan() {
        return Err(ProjectionError::NotRepresentable {
            x: pos.x,
            y: pos.y,
            crs: target,
        });
    }
    Ok(HorizontalPosition::new(x, y, target))
}

/// Shorthand for transforming into WGS84 lon/lat.
pub fn to_wgs84(pos: &HorizontalPosition) -> ProjectionResult<HorizontalPosition> {
    transform_position(pos, CrsCode::Epsg4326)
}
