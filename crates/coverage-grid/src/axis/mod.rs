//! One-dimensional coordinate axes.
//!
//! An axis maps integer indices to coordinate values and back. Each index
//! owns a cell, a closed interval around its coordinate value; lookups
//! return the index of the cell containing a value, or `None` when the
//! value falls outside the axis.
//!
//! Longitude axes compare values modulo 360°, so a value is found whenever
//! any of its equivalents lies within the axis extent.

mod irregular;
mod regular;

pub use irregular::IrregularAxis;
pub use regular::RegularAxis;

use std::fmt;

use coverage_common::{next_equivalent_longitude, Extent};

use crate::error::{GridError, Result};

/// Behaviour shared by every axis.
pub trait ReferenceableAxis: Send + Sync + fmt::Debug {
    /// Name of the axis, usually the variable or dimension name.
    fn name(&self) -> &str;

    /// Number of coordinate values.
    fn size(&self) -> usize;

    /// Whether values are longitudes that wrap every 360°.
    fn is_longitude(&self) -> bool;

    /// True if coordinate values increase with index.
    fn is_ascending(&self) -> bool;

    /// Coordinate value at `index`, or `None` if the index is out of range.
    fn coordinate_value(&self, index: usize) -> Option<f64>;

    /// Bounds of the cell at `index`, or `None` if the index is out of range.
    fn coordinate_bounds(&self, index: usize) -> Option<Extent<f64>>;

    /// Extent covered by all cells, from the outer bound of the first cell
    /// to the outer bound of the last.
    fn coordinate_extent(&self) -> Extent<f64>;

    /// Index of the cell containing `value`.
    fn find_index_of(&self, value: f64) -> Option<usize>;

    /// True for longitude axes that cover the whole globe.
    fn wraps(&self) -> bool {
        self.is_longitude() && self.coordinate_extent().width() >= 360.0
    }

    /// Whether `value` lies within the axis extent.
    fn contains(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        let extent = self.coordinate_extent();
        if self.wraps() {
            return true;
        }
        if self.is_longitude() {
            return extent.contains(next_equivalent_longitude(extent.low(), value));
        }
        extent.contains(value)
    }

    /// All coordinate values in index order.
    fn coordinate_values(&self) -> Vec<f64> {
        (0..self.size())
            .filter_map(|i| self.coordinate_value(i))
            .collect()
    }

    /// All cell bounds in index order.
    fn domain_objects(&self) -> Vec<Extent<f64>> {
        (0..self.size())
            .filter_map(|i| self.coordinate_bounds(i))
            .collect()
    }
}

/// An axis that is either evenly spaced or given by explicit values.
#[derive(Debug, Clone)]
pub enum Axis {
    Regular(RegularAxis),
    Irregular(IrregularAxis),
}

impl Axis {
    /// Build an axis from explicit coordinate values.
    ///
    /// Values that are evenly spaced to within `tolerance` (relative to the
    /// spacing) give a [`RegularAxis`]; anything else an [`IrregularAxis`].
    pub fn from_values(
        name: impl Into<String>,
        values: &[f64],
        is_longitude: bool,
        tolerance: f64,
    ) -> Result<Self> {
        let name = name.into();
        if let Some(spacing) = regular_spacing(values, tolerance) {
            return Ok(Axis::Regular(RegularAxis::new(
                name,
                values[0],
                spacing,
                values.len(),
                is_longitude,
            )?));
        }
        Ok(Axis::Irregular(IrregularAxis::new(name, values, is_longitude)?))
    }

    /// The same axis, treated as a longitude axis.
    pub fn into_longitude(self) -> Self {
        match self {
            Axis::Regular(a) => Axis::Regular(a.into_longitude()),
            Axis::Irregular(a) => Axis::Irregular(a.into_longitude()),
        }
    }

    fn inner(&self) -> &dyn ReferenceableAxis {
        match self {
            Axis::Regular(a) => a,
            Axis::Irregular(a) => a,
        }
    }
}

/// Constant spacing of `values`, if there is one.
fn regular_spacing(values: &[f64], tolerance: f64) -> Option<f64> {
    if values.len() < 2 || values.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let spacing = (values[values.len() - 1] - values[0]) / (values.len() - 1) as f64;
    if spacing == 0.0 {
        return None;
    }
    let limit = tolerance * spacing.abs();
    let even = values
        .windows(2)
        .all(|w| ((w[1] - w[0]) - spacing).abs() <= limit);
    even.then_some(spacing)
}

impl ReferenceableAxis for Axis {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn size(&self) -> usize {
        self.inner().size()
    }

    fn is_longitude(&self) -> bool {
        self.inner().is_longitude()
    }

    fn is_ascending(&self) -> bool {
        self.inner().is_ascending()
    }

    fn coordinate_value(&self, index: usize) -> Option<f64> {
        self.inner().coordinate_value(index)
    }

    fn coordinate_bounds(&self, index: usize) -> Option<Extent<f64>> {
        self.inner().coordinate_bounds(index)
    }

    fn coordinate_extent(&self) -> Extent<f64> {
        self.inner().coordinate_extent()
    }

    fn find_index_of(&self, value: f64) -> Option<usize> {
        self.inner().find_index_of(value)
    }

    fn contains(&self, value: f64) -> bool {
        self.inner().contains(value)
    }
}

/// Outer bound of the first cell, extrapolated from the first two values.
pub(crate) fn extend_first(v0: f64, v1: f64) -> f64 {
    let extended = v0 - 0.5 * (v1 - v0);
    if extended.is_finite() {
        extended
    } else {
        v0
    }
}

/// Outer bound of the last cell, extrapolated from the last two values.
pub(crate) fn extend_last(second_last: f64, last: f64) -> f64 {
    let extended = last + 0.5 * (last - second_last);
    if extended.is_finite() {
        extended
    } else {
        last
    }
}

fn check_not_empty(size: usize) -> Result<()> {
    if size == 0 {
        return Err(GridError::invalid_argument(
            "Axis length must not be negative or zero",
        ));
    }
    Ok(())
}
