//! Test data generators for creating synthetic gridded data.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite.

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// This makes it easy to verify that data is being read correctly
/// by checking that grid[row][col] == col * 1000 + row.
///
/// # Returns
///
/// A `Vec<f32>` in row-major order (row 0 first, then row 1, etc.)
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50); // 10 * 5
/// assert_eq!(grid[0], 0.0);   // col=0, row=0 -> 0*1000 + 0
/// assert_eq!(grid[1], 1000.0); // col=1, row=0 -> 1*1000 + 0
/// assert_eq!(grid[10], 1.0);  // col=0, row=1 -> 0*1000 + 1
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// Creates a stack of `levels` test grids, z outermost.
///
/// Each value is `level * 1_000_000 + col * 1000 + row`, so grids up to
/// 1000 cells wide stay exactly representable for a handful of levels.
pub fn create_test_volume(width: usize, height: usize, levels: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height * levels);
    for level in 0..levels {
        for row in 0..height {
            for col in 0..width {
                data.push((level * 1_000_000 + col * 1000 + row) as f32);
            }
        }
    }
    data
}

/// Creates a test grid filled with a constant value.
pub fn create_constant_grid(width: usize, height: usize, value: f32) -> Vec<f32> {
    vec![value; width * height]
}

/// Creates a `create_test_grid` pattern with NaN at the given positions.
///
/// Useful for testing missing data handling.
///
/// # Arguments
///
/// * `nan_positions` - List of (col, row) positions that should be NaN
pub fn create_grid_with_nans(
    width: usize,
    height: usize,
    nan_positions: &[(usize, usize)],
) -> Vec<f32> {
    let mut data = create_test_grid(width, height);
    for &(col, row) in nan_positions {
        if col < width && row < height {
            data[row * width + col] = f32::NAN;
        }
    }
    data
}

/// Cell centres of a regular lon/lat grid, row-major with x fastest.
///
/// Returned as `(lon, lat)` pairs, ready to be turned into positions.
pub fn regular_lon_lat_points(
    lon0: f64,
    dlon: f64,
    nlon: usize,
    lat0: f64,
    dlat: f64,
    nlat: usize,
) -> Vec<(f64, f64)> {
    let mut points = Vec::with_capacity(nlon * nlat);
    for j in 0..nlat {
        for i in 0..nlon {
            points.push((lon0 + i as f64 * dlon, lat0 + j as f64 * dlat));
        }
    }
    points
}
