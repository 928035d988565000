//! Axes defined by an explicit list of coordinate values.

use coverage_common::{next_equivalent_longitude, Extent};

use super::{extend_first, extend_last, ReferenceableAxis};
use crate::error::{GridError, Result};

/// An axis with arbitrary, strictly monotonic coordinate values.
///
/// Values are stored in ascending order; descending input is reversed on
/// construction and indices are mapped back on the way out. Lookups use a
/// binary search.
#[derive(Debug, Clone, PartialEq)]
pub struct IrregularAxis {
    name: String,
    /// Always ascending
    values: Vec<f64>,
    reversed: bool,
    is_longitude: bool,
    extent: Extent<f64>,
}

impl IrregularAxis {
    /// Create an axis from values that strictly increase or strictly
    /// decrease.
    pub fn new(name: impl Into<String>, values: &[f64], is_longitude: bool) -> Result<Self> {
        if values.is_empty() {
            return Err(GridError::invalid_argument("Zero-length array"));
        }
        if values.iter().any(|v| v.is_nan()) {
            return Err(GridError::invalid_argument(
                "Coordinate values must not be NaN",
            ));
        }

        let reversed = values.len() > 1 && values[1] < values[0];
        let mut stored = values.to_vec();
        if reversed {
            stored.reverse();
        }
        if stored.windows(2).any(|w| w[1] <= w[0]) {
            return Err(GridError::invalid_argument(
                "Coordinate values must increase or decrease monotonically",
            ));
        }

        let extent = match stored.len() {
            1 => Extent::point(stored[0]),
            n => Extent::ordered(
                extend_first(stored[0], stored[1]),
                extend_last(stored[n - 2], stored[n - 1]),
            ),
        };

        Ok(Self {
            name: name.into(),
            values: stored,
            reversed,
            is_longitude,
            extent,
        })
    }

    pub(crate) fn into_longitude(mut self) -> Self {
        self.is_longitude = true;
        self
    }

    fn maybe_reverse(&self, index: usize) -> usize {
        if self.reversed {
            self.values.len() - 1 - index
        } else {
            index
        }
    }

    /// Bounds of the cell at a position in the ascending storage.
    fn stored_bounds(&self, index: usize) -> Extent<f64> {
        let n = self.values.len();
        let low = if index == 0 {
            self.extent.low()
        } else {
            0.5 * (self.values[index] + self.values[index - 1])
        };
        let high = if index == n - 1 {
            self.extent.high()
        } else {
            0.5 * (self.values[index + 1] + self.values[index])
        };
        Extent::ordered(low, high)
    }
}

impl ReferenceableAxis for IrregularAxis {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> usize {
        self.values.len()
    }

    fn is_longitude(&self) -> bool {
        self.is_longitude
    }

    fn is_ascending(&self) -> bool {
        !self.reversed
    }

    fn coordinate_value(&self, index: usize) -> Option<f64> {
        if index >= self.values.len() {
            return None;
        }
        Some(self.values[self.maybe_reverse(index)])
    }

    fn coordinate_bounds(&self, index: usize) -> Option<Extent<f64>> {
        if index >= self.values.len() {
            return None;
        }
        Some(self.stored_bounds(self.maybe_reverse(index)))
    }

    fn coordinate_extent(&self) -> Extent<f64> {
        self.extent
    }

    fn find_index_of(&self, value: f64) -> Option<usize> {
        if value.is_nan() {
            return None;
        }
        let value = if self.is_longitude {
            next_equivalent_longitude(self.extent.low(), value)
        } else {
            value
        };

        let n = self.values.len();
        match self.values.binary_search_by(|v| v.total_cmp(&value)) {
            Ok(index) => Some(self.maybe_reverse(index)),
            Err(0) => self
                .stored_bounds(0)
                .contains(value)
                .then(|| self.maybe_reverse(0)),
            Err(ins) if ins == n => self
                .stored_bounds(n - 1)
                .contains(value)
                .then(|| self.maybe_reverse(n - 1)),
            Err(ins) => {
                let above = (self.values[ins] - value).abs();
                let below = (self.values[ins - 1] - value).abs();
                let index = if above < below { ins } else { ins - 1 };
                Some(self.maybe_reverse(index))
            }
        }
    }
}
