//! Evenly spaced axes.

use coverage_common::{nearest_equivalent_longitude, next_equivalent_longitude, Extent};

use super::{check_not_empty, extend_first, extend_last, ReferenceableAxis};
use crate::error::{GridError, Result};

/// An axis whose values are `first + i * spacing`.
///
/// Lookups are O(1) arithmetic. The spacing may be negative for
/// descending axes.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularAxis {
    name: String,
    first: f64,
    spacing: f64,
    size: usize,
    is_longitude: bool,
}

impl RegularAxis {
    /// Create a regular axis.
    ///
    /// Fails if `size` is zero or `spacing` is zero.
    pub fn new(
        name: impl Into<String>,
        first: f64,
        spacing: f64,
        size: usize,
        is_longitude: bool,
    ) -> Result<Self> {
        check_not_empty(size)?;
        if spacing == 0.0 || spacing.is_nan() {
            return Err(GridError::invalid_argument("Axis spacing cannot be zero"));
        }
        if !first.is_finite() || !spacing.is_finite() {
            return Err(GridError::invalid_argument(format!(
                "Axis start and spacing must be finite, got {} and {}",
                first, spacing
            )));
        }
        Ok(Self {
            name: name.into(),
            first,
            spacing,
            size,
            is_longitude,
        })
    }

    pub fn first_value(&self) -> f64 {
        self.first
    }

    pub fn coordinate_spacing(&self) -> f64 {
        self.spacing
    }

    pub(crate) fn into_longitude(mut self) -> Self {
        self.is_longitude = true;
        self
    }

    /// Index of the nearest grid point to `value`, even if it lies outside
    /// the axis.
    ///
    /// The result may be negative or larger than the axis. Longitude values
    /// are first moved to the equivalent nearest the middle of the axis.
    /// Fails only for NaN input.
    pub fn find_index_of_unconstrained(&self, value: f64) -> Result<i64> {
        if value.is_nan() {
            return Err(GridError::invalid_argument(
                "cannot find the index of a NaN coordinate",
            ));
        }
        let value = if self.is_longitude {
            nearest_equivalent_longitude(self.coordinate_extent().midpoint(), value)
        } else {
            value
        };
        Ok(((value - self.first) / self.spacing).round() as i64)
    }

    fn value_at(&self, index: usize) -> f64 {
        self.first + index as f64 * self.spacing
    }
}

impl ReferenceableAxis for RegularAxis {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> usize {
        self.size
    }

    fn is_longitude(&self) -> bool {
        self.is_longitude
    }

    fn is_ascending(&self) -> bool {
        self.spacing > 0.0
    }

    fn coordinate_value(&self, index: usize) -> Option<f64> {
        (index < self.size).then(|| self.value_at(index))
    }

    fn coordinate_bounds(&self, index: usize) -> Option<Extent<f64>> {
        let centre = self.coordinate_value(index)?;
        let half = 0.5 * self.spacing;
        Some(Extent::ordered(centre - half, centre + half))
    }

    fn coordinate_extent(&self) -> Extent<f64> {
        let last = self.value_at(self.size - 1);
        if self.size == 1 {
            let half = 0.5 * self.spacing;
            return Extent::ordered(self.first - half, self.first + half);
        }
        let low = extend_first(self.first, self.value_at(1));
        let high = extend_last(self.value_at(self.size - 2), last);
        Extent::ordered(low, high)
    }

    fn find_index_of(&self, value: f64) -> Option<usize> {
        if value.is_nan() {
            return None;
        }
        let value = if self.is_longitude {
            next_equivalent_longitude(self.coordinate_extent().low(), value)
        } else {
            value
        };
        let index = ((value - self.first) / self.spacing + 0.5).floor();
        if index < 0.0 || index >= self.size as f64 {
            return None;
        }
        Some(index as usize)
    }
}
