//! Flat-offset arithmetic for row-major arrays.
//!
//! These are pure functions of the coordinates and the shape; nothing
//! holds a cursor between calls.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Row-major strides for `shape`: the last dimension varies fastest.
pub fn strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1; shape.len()];
    for d in (0..shape.len().saturating_sub(1)).rev() {
        strides[d] = strides[d + 1] * shape[d + 1];
    }
    strides
}

/// Flat offset of `coords` in an array of `shape`, or `None` if the rank
/// differs or any coordinate is out of range.
pub fn flat_offset(coords: &[usize], shape: &[usize]) -> Option<usize> {
    if coords.len() != shape.len() {
        return None;
    }
    coords
        .iter()
        .zip(shape)
        .try_fold(0usize, |acc, (&c, &n)| (c < n).then(|| acc * n + c))
}

/// Dimensions of a variable: optional time and vertical axes followed by
/// y and x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionLayout {
    #[serde(default)]
    pub t: Option<usize>,
    #[serde(default)]
    pub z: Option<usize>,
    pub y: usize,
    pub x: usize,
}

impl DimensionLayout {
    /// A purely horizontal variable.
    pub fn horizontal(y: usize, x: usize) -> Self {
        Self { t: None, z: None, y, x }
    }

    pub fn with_t(mut self, t: usize) -> Self {
        self.t = Some(t);
        self
    }

    pub fn with_z(mut self, z: usize) -> Self {
        self.z = Some(z);
        self
    }

    /// Shape in storage order, omitting absent dimensions.
    pub fn shape(&self) -> Vec<usize> {
        self.t
            .into_iter()
            .chain(self.z)
            .chain([self.y, self.x])
            .collect()
    }

    /// Total number of values.
    pub fn len(&self) -> usize {
        self.t.unwrap_or(1) * self.z.unwrap_or(1) * self.plane_size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of values in one horizontal slice.
    pub fn plane_size(&self) -> usize {
        self.y * self.x
    }

    /// Flat offset of one value.
    ///
    /// A `t` or `z` index must be given exactly when the dimension exists.
    pub fn offset(&self, t: Option<usize>, z: Option<usize>, y: usize, x: usize) -> Result<usize> {
        let mut coords = Vec::with_capacity(4);
        push_index(&mut coords, "t", self.t, t)?;
        push_index(&mut coords, "z", self.z, z)?;
        coords.extend([y, x]);
        flat_offset(&coords, &self.shape()).ok_or_else(|| {
            GridError::invalid_argument(format!(
                "index (t={:?}, z={:?}, y={}, x={}) outside shape {:?}",
                t,
                z,
                y,
                x,
                self.shape()
            ))
        })
    }

    /// Check that a horizontal block lies inside the layout.
    pub fn check_block(&self, y: &RangeInclusive<usize>, x: &RangeInclusive<usize>) -> Result<()> {
        if y.is_empty() || x.is_empty() || *y.end() >= self.y || *x.end() >= self.x {
            return Err(GridError::invalid_argument(format!(
                "block y={:?} x={:?} outside {}x{} plane",
                y, x, self.y, self.x
            )));
        }
        Ok(())
    }
}

fn push_index(coords: &mut Vec<usize>, name: &str, dim: Option<usize>, index: Option<usize>) -> Result<()> {
    match (dim, index) {
        (Some(_), Some(i)) => {
            coords.push(i);
            Ok(())
        }
        (None, None) => Ok(()),
        (Some(n), None) => Err(GridError::invalid_argument(format!(
            "variable has a {} dimension of length {} but no {} index was given",
            name, n, name
        ))),
        (None, Some(i)) => Err(GridError::invalid_argument(format!(
            "{} index {} given for a variable without a {} dimension",
            name, i, name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strides() {
        assert_eq!(strides(&[2, 3, 4]), vec![12, 4, 1]);
        assert_eq!(strides(&[5]), vec![1]);
        assert!(strides(&[]).is_empty());
    }

    #[test]
    fn test_flat_offset() {
        assert_eq!(flat_offset(&[1, 2, 3], &[2, 3, 4]), Some(12 + 8 + 3));
        assert_eq!(flat_offset(&[0, 0], &[4, 4]), Some(0));
        assert_eq!(flat_offset(&[4, 0], &[4, 4]), None);
        assert_eq!(flat_offset(&[1], &[4, 4]), None);
    }

    #[test]
    fn test_layout_offsets() {
        let layout = DimensionLayout::horizontal(3, 4).with_t(2).with_z(5);
        assert_eq!(layout.shape(), vec![2, 5, 3, 4]);
        assert_eq!(layout.len(), 120);
        assert_eq!(layout.plane_size(), 12);
        assert_eq!(layout.offset(Some(1), Some(2), 1, 3).unwrap(), 60 + 24 + 4 + 3);
    }

    #[test]
    fn test_layout_rejects_mismatched_indices() {
        let layout = DimensionLayout::horizontal(3, 4).with_z(2);
        assert!(layout.offset(None, None, 0, 0).is_err());
        assert!(layout.offset(Some(0), Some(0), 0, 0).is_err());
        assert!(layout.offset(None, Some(2), 0, 0).is_err());
        assert_eq!(layout.offset(None, Some(1), 0, 0).unwrap(), 12);
    }

    #[test]
    fn test_check_block() {
        let layout = DimensionLayout::horizontal(3, 4);
        assert!(layout.check_block(&(0..=2), &(1..=3)).is_ok());
        assert!(layout.check_block(&(0..=3), &(0..=0)).is_err());
        assert!(layout.check_block(&(0..=1), &(0..=4)).is_err());
    }

    #[test]
    fn test_layout_deserializes_without_optional_dims() {
        let layout: DimensionLayout = serde_json::from_str(r#"{"y": 2, "x": 3}"#).unwrap();
        assert_eq!(layout, DimensionLayout::horizontal(2, 3));
    }
}
