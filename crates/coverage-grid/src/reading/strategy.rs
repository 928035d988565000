//! Strategies for filling target values from a source array.

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::reader::{ArrayReader, ValueConversion};
use crate::config::CoverageConfig;
use crate::error::{GridError, Result};
use crate::pixel_map::{PixelMap, PixelMapEntry};

/// How the source cells referenced by a [`PixelMap`] are fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataReadingStrategy {
    /// One read per source row, spanning the referenced columns of that row.
    Scanline,
    /// One read covering the bounding box of every referenced cell.
    BoundingBox,
    /// One read per referenced source cell.
    PixelByPixel,
}

impl fmt::Display for DataReadingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Scanline => "SCANLINE",
            Self::BoundingBox => "BOUNDING_BOX",
            Self::PixelByPixel => "PIXEL_BY_PIXEL",
        };
        f.write_str(name)
    }
}

impl DataReadingStrategy {
    /// Choose a strategy from the pixel-map bounding-box size and the
    /// source format tag.
    ///
    /// Boxes above the configured threshold are always read row by row to
    /// bound memory. Below it, formats listed in
    /// `scanline_file_types` read row by row and everything else reads
    /// one block.
    pub fn optimum(bounding_box_size: usize, file_type: &str, config: &CoverageConfig) -> Self {
        let strategy = if bounding_box_size > config.scanline_threshold_cells || config.prefers_scanline(file_type) {
            Self::Scanline
        } else {
            Self::BoundingBox
        };
        debug!(bounding_box_size, file_type, %strategy, "Selected data reading strategy");
        strategy
    }

    /// [`optimum`](Self::optimum) for a pixel map and reader.
    pub fn for_reader(pixel_map: &PixelMap, reader: &dyn ArrayReader, config: &CoverageConfig) -> Self {
        Self::optimum(pixel_map.bounding_box_size(), reader.file_type(), config)
    }
}

/// Read the value of every target position of `pixel_map` from one
/// horizontal slice of `variable`.
///
/// The result has one entry per target position. Positions outside the
/// source grid, and positions whose source value is missing, are `None`.
pub fn read_horizontal_points(
    strategy: DataReadingStrategy,
    reader: &dyn ArrayReader,
    variable: &str,
    pixel_map: &PixelMap,
    t: Option<usize>,
    z: Option<usize>,
) -> Result<Vec<Option<f32>>> {
    let mut values = vec![None; pixel_map.target_size()];
    if pixel_map.is_empty() {
        return Ok(values);
    }

    let start = Instant::now();
    let conversion = reader.conversion(variable);
    let mut reads = 0usize;

    match strategy {
        DataReadingStrategy::Scanline => {
            for j in pixel_map.j_indices() {
                let (Some(i0), Some(i1)) = (pixel_map.min_i_in_row(j), pixel_map.max_i_in_row(j)) else {
                    continue;
                };
                let row = read_checked(reader, variable, t, z, (j, j), (i0, i1))?;
                reads += 1;
                for entry in pixel_map.row(j) {
                    scatter(&mut values, &entry, row[entry.i - i0], &conversion);
                }
            }
        }
        DataReadingStrategy::BoundingBox => {
            let (i0, i1, j0, j1) = bounds(pixel_map)?;
            let block = read_checked(reader, variable, t, z, (j0, j1), (i0, i1))?;
            reads += 1;
            let width = i1 - i0 + 1;
            for entry in pixel_map.iter() {
                let raw = block[(entry.j - j0) * width + (entry.i - i0)];
                scatter(&mut values, &entry, raw, &conversion);
            }
        }
        DataReadingStrategy::PixelByPixel => {
            for entry in pixel_map.iter() {
                let cell = read_checked(reader, variable, t, z, (entry.j, entry.j), (entry.i, entry.i))?;
                reads += 1;
                scatter(&mut values, &entry, cell[0], &conversion);
            }
        }
    }

    debug!(
        %strategy,
        variable,
        reads,
        values = pixel_map.num_entries(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Read horizontal points"
    );
    Ok(values)
}

/// Read the same target positions at several vertical levels, reusing one
/// pixel map. The outer vector follows `z_indices`.
pub fn read_vertical_section(
    strategy: DataReadingStrategy,
    reader: &dyn ArrayReader,
    variable: &str,
    pixel_map: &PixelMap,
    t: Option<usize>,
    z_indices: &[usize],
) -> Result<Vec<Vec<Option<f32>>>> {
    z_indices
        .iter()
        .map(|&z| read_horizontal_points(strategy, reader, variable, pixel_map, t, Some(z)))
        .collect()
}

fn bounds(pixel_map: &PixelMap) -> Result<(usize, usize, usize, usize)> {
    match (pixel_map.min_i(), pixel_map.max_i(), pixel_map.min_j(), pixel_map.max_j()) {
        (Some(i0), Some(i1), Some(j0), Some(j1)) => Ok((i0, i1, j0, j1)),
        _ => Err(GridError::read_failed("pixel map has no bounds")),
    }
}

/// Read a block and check that the reader returned one value per cell.
fn read_checked(
    reader: &dyn ArrayReader,
    variable: &str,
    t: Option<usize>,
    z: Option<usize>,
    (j0, j1): (usize, usize),
    (i0, i1): (usize, usize),
) -> Result<Vec<f32>> {
    let block = reader.read_block(variable, t, z, j0..=j1, i0..=i1)?;
    let expected = (j1 - j0 + 1) * (i1 - i0 + 1);
    if block.len() != expected {
        return Err(GridError::read_failed(format!(
            "reader returned {} values for a block of {} cells",
            block.len(),
            expected
        )));
    }
    Ok(block)
}

fn scatter(values: &mut [Option<f32>], entry: &PixelMapEntry<'_>, raw: f32, conversion: &ValueConversion) {
    let value = conversion.apply(raw);
    if value.is_nan() {
        return;
    }
    for &target in entry.target_indices {
        values[target] = Some(value);
    }
}
