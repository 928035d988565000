//! Mapping from target positions to source-grid cells.
//!
//! A [`PixelMap`] records, for every position in a target domain, which
//! cell of a source grid contains it. Entries are grouped by source row
//! and column so that a reader can fetch each source value once and
//! scatter it to every target position that needs it.

use std::collections::BTreeMap;
use std::time::Instant;

use tracing::debug;

use coverage_common::HorizontalPosition;

use crate::axis::ReferenceableAxis;
use crate::grid::{HorizontalGrid, RectilinearGrid};

/// The positions a pixel map is built for.
#[derive(Debug, Clone, Copy)]
pub enum TargetDomain<'a> {
    /// The cell centres of a grid, in its row-major order.
    Grid(&'a dyn HorizontalGrid),
    /// An explicit list of positions.
    Points(&'a [HorizontalPosition]),
}

impl TargetDomain<'_> {
    /// Number of target positions.
    pub fn size(&self) -> usize {
        match self {
            TargetDomain::Grid(grid) => grid.size(),
            TargetDomain::Points(points) => points.len(),
        }
    }
}

/// One source cell and the target positions it supplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelMapEntry<'a> {
    pub i: usize,
    pub j: usize,
    /// Indices into the target domain, in insertion order
    pub target_indices: &'a [usize],
}

#[derive(Debug, Clone, Default)]
struct Row {
    columns: BTreeMap<usize, Vec<usize>>,
    min_i: usize,
    max_i: usize,
}

/// Source-cell to target-position associations for one source grid and
/// one target domain.
#[derive(Debug, Clone)]
pub struct PixelMap {
    rows: BTreeMap<usize, Row>,
    source_x_size: usize,
    source_y_size: usize,
    target_size: usize,
    min_i: usize,
    max_i: usize,
    min_j: usize,
    max_j: usize,
    num_entries: usize,
    num_unique_ij_pairs: usize,
}

impl PixelMap {
    /// Locate every target position in `source`.
    ///
    /// When both grids are rectilinear lon/lat grids the x lookups are
    /// shared between rows; otherwise each position is located
    /// individually.
    pub fn new(source: &dyn HorizontalGrid, target: TargetDomain<'_>) -> Self {
        let start = Instant::now();
        let mut map = Self::empty(source.x_size(), source.y_size(), target.size());

        let path = match target {
            TargetDomain::Grid(grid) => match (source.as_rectilinear(), grid.as_rectilinear()) {
                (Some(s), Some(t)) if s.crs().is_geographic() && t.crs().is_geographic() => {
                    map.fill_rectilinear(s, t);
                    "rectilinear"
                }
                _ => {
                    for (index, cell) in grid.domain_objects().iter().enumerate() {
                        map.locate(source, index, &cell.centre);
                    }
                    "generic"
                }
            },
            TargetDomain::Points(points) => {
                for (index, position) in points.iter().enumerate() {
                    map.locate(source, index, position);
                }
                "generic"
            }
        };

        debug!(
            path,
            target_size = map.target_size,
            entries = map.num_entries,
            unique_cells = map.num_unique_ij_pairs,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Built pixel map"
        );
        map
    }

    fn empty(source_x_size: usize, source_y_size: usize, target_size: usize) -> Self {
        Self {
            rows: BTreeMap::new(),
            source_x_size,
            source_y_size,
            target_size,
            min_i: usize::MAX,
            max_i: 0,
            min_j: usize::MAX,
            max_j: 0,
            num_entries: 0,
            num_unique_ij_pairs: 0,
        }
    }

    fn locate(&mut self, source: &dyn HorizontalGrid, target_index: usize, position: &HorizontalPosition) {
        if let Some(coords) = source.find_index_of(position) {
            self.put(coords.x, coords.y, target_index);
        }
    }

    /// Rectilinear source and target: look up each target column once and
    /// reuse the result for every row.
    fn fill_rectilinear(&mut self, source: &RectilinearGrid, target: &RectilinearGrid) {
        let x_indices: Vec<Option<usize>> = (0..target.x_axis().size())
            .map(|i| {
                target
                    .x_axis()
                    .coordinate_value(i)
                    .and_then(|lon| source.x_axis().find_index_of(lon))
            })
            .collect();
        let nx = x_indices.len();

        let mut pixel_index = 0;
        for j in 0..target.y_axis().size() {
            let y_index = target
                .y_axis()
                .coordinate_value(j)
                .filter(|lat| (-90.0..=90.0).contains(lat))
                .and_then(|lat| source.y_axis().find_index_of(lat));
            if let Some(y) = y_index {
                for (k, x) in x_indices.iter().enumerate() {
                    if let Some(x) = x {
                        self.put(*x, y, pixel_index + k);
                    }
                }
            }
            pixel_index += nx;
        }
    }

    /// Record that `target_index` takes its value from source cell `(i, j)`.
    ///
    /// Indices outside the source grid are ignored.
    pub(crate) fn put(&mut self, i: usize, j: usize, target_index: usize) {
        if i >= self.source_x_size || j >= self.source_y_size || target_index >= self.target_size {
            return;
        }

        let row = self.rows.entry(j).or_insert_with(|| Row {
            columns: BTreeMap::new(),
            min_i: i,
            max_i: i,
        });
        let column = row.columns.entry(i).or_default();
        if column.is_empty() {
            self.num_unique_ij_pairs += 1;
        }
        column.push(target_index);
        row.min_i = row.min_i.min(i);
        row.max_i = row.max_i.max(i);

        self.min_i = self.min_i.min(i);
        self.max_i = self.max_i.max(i);
        self.min_j = self.min_j.min(j);
        self.max_j = self.max_j.max(j);
        self.num_entries += 1;
    }

    /// True if no target position falls inside the source grid.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of positions in the target domain.
    pub fn target_size(&self) -> usize {
        self.target_size
    }

    /// Number of target positions with a source cell.
    pub fn num_entries(&self) -> usize {
        self.num_entries
    }

    /// Number of distinct source cells referenced.
    pub fn num_unique_ij_pairs(&self) -> usize {
        self.num_unique_ij_pairs
    }

    pub fn min_i(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.min_i)
    }

    pub fn max_i(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.max_i)
    }

    pub fn min_j(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.min_j)
    }

    pub fn max_j(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.max_j)
    }

    /// Source rows with at least one entry, ascending.
    pub fn j_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.keys().copied()
    }

    pub fn min_i_in_row(&self, j: usize) -> Option<usize> {
        self.rows.get(&j).map(|r| r.min_i)
    }

    pub fn max_i_in_row(&self, j: usize) -> Option<usize> {
        self.rows.get(&j).map(|r| r.max_i)
    }

    /// Sum over rows of the width from the first to the last referenced
    /// column: the number of cells read row by row.
    pub fn sum_row_lengths(&self) -> usize {
        self.rows.values().map(|r| r.max_i - r.min_i + 1).sum()
    }

    /// Number of cells in the smallest source rectangle covering every
    /// entry: the number of cells read in one block.
    pub fn bounding_box_size(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.max_i - self.min_i + 1) * (self.max_j - self.min_j + 1)
    }

    /// Entries sorted by row, then column.
    pub fn iter(&self) -> impl Iterator<Item = PixelMapEntry<'_>> + '_ {
        self.rows.iter().flat_map(|(&j, row)| {
            row.columns.iter().map(move |(&i, targets)| PixelMapEntry {
                i,
                j,
                target_indices: targets,
            })
        })
    }

    /// Entries of a single source row, sorted by column.
    pub fn row(&self, j: usize) -> impl Iterator<Item = PixelMapEntry<'_>> + '_ {
        self.rows.get(&j).into_iter().flat_map(move |row| {
            row.columns.iter().map(move |(&i, targets)| PixelMapEntry {
                i,
                j,
                target_indices: targets,
            })
        })
    }
}
