//! The raw-array reader contract.

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use super::offsets::DimensionLayout;
use crate::error::{GridError, Result};

/// Conversion from stored values to physical values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueConversion {
    pub scale: f32,
    pub offset: f32,
    /// Stored value meaning "no data"
    pub missing_value: Option<f32>,
    /// Stored values outside this inclusive range are treated as missing
    pub valid_range: Option<(f32, f32)>,
}

impl Default for ValueConversion {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: 0.0,
            missing_value: None,
            valid_range: None,
        }
    }
}

impl ValueConversion {
    /// Convert one stored value. Missing and out-of-range values become NaN.
    pub fn apply(&self, raw: f32) -> f32 {
        if raw.is_nan() || self.missing_value == Some(raw) {
            return f32::NAN;
        }
        if let Some((low, high)) = self.valid_range {
            if raw < low || raw > high {
                return f32::NAN;
            }
        }
        raw * self.scale + self.offset
    }
}

/// Reads rectangular horizontal blocks of a gridded variable.
///
/// Implementations return values in row-major order (`x` fastest) with NaN
/// for missing data, and report storage failures as [`GridError::Io`].
pub trait ArrayReader: Send + Sync {
    /// Format tag used when choosing a reading strategy (e.g. `"netCDF"`).
    fn file_type(&self) -> &str;

    /// Dimensions of `variable`.
    fn layout(&self, variable: &str) -> Result<DimensionLayout>;

    /// Read the block `y` × `x` of one horizontal slice.
    fn read_block(
        &self,
        variable: &str,
        t: Option<usize>,
        z: Option<usize>,
        y: RangeInclusive<usize>,
        x: RangeInclusive<usize>,
    ) -> Result<Vec<f32>>;

    /// Scale, offset and missing-value handling for `variable`.
    fn conversion(&self, _variable: &str) -> ValueConversion {
        ValueConversion::default()
    }
}

#[derive(Debug, Clone)]
struct MemoryVariable {
    layout: DimensionLayout,
    data: Vec<f32>,
    conversion: ValueConversion,
}

/// An [`ArrayReader`] over arrays held in memory.
///
/// Counts the blocks it serves, which makes it useful for comparing
/// reading strategies.
#[derive(Debug, Default)]
pub struct InMemoryArray {
    file_type: String,
    variables: HashMap<String, MemoryVariable>,
    reads: AtomicUsize,
}

impl InMemoryArray {
    pub fn new(file_type: impl Into<String>) -> Self {
        Self {
            file_type: file_type.into(),
            ..Default::default()
        }
    }

    /// Add a variable. `data` must hold exactly `layout.len()` values.
    pub fn with_variable(mut self, name: impl Into<String>, layout: DimensionLayout, data: Vec<f32>) -> Result<Self> {
        let name = name.into();
        if data.len() != layout.len() {
            return Err(GridError::invalid_argument(format!(
                "variable '{}' has {} values but its shape {:?} needs {}",
                name,
                data.len(),
                layout.shape(),
                layout.len()
            )));
        }
        self.variables.insert(
            name,
            MemoryVariable {
                layout,
                data,
                conversion: ValueConversion::default(),
            },
        );
        Ok(self)
    }

    /// Set the conversion of an existing variable.
    pub fn with_conversion(mut self, name: &str, conversion: ValueConversion) -> Result<Self> {
        self.variable_mut(name)?.conversion = conversion;
        Ok(self)
    }

    /// Number of `read_block` calls served so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    fn variable(&self, name: &str) -> Result<&MemoryVariable> {
        self.variables
            .get(name)
            .ok_or_else(|| GridError::read_failed(format!("no variable named '{}'", name)))
    }

    fn variable_mut(&mut self, name: &str) -> Result<&mut MemoryVariable> {
        self.variables
            .get_mut(name)
            .ok_or_else(|| GridError::read_failed(format!("no variable named '{}'", name)))
    }
}

impl ArrayReader for InMemoryArray {
    fn file_type(&self) -> &str {
        &self.file_type
    }

    fn layout(&self, variable: &str) -> Result<DimensionLayout> {
        Ok(self.variable(variable)?.layout)
    }

    fn read_block(
        &self,
        variable: &str,
        t: Option<usize>,
        z: Option<usize>,
        y: RangeInclusive<usize>,
        x: RangeInclusive<usize>,
    ) -> Result<Vec<f32>> {
        let var = self.variable(variable)?;
        var.layout.check_block(&y, &x)?;
        self.reads.fetch_add(1, Ordering::Relaxed);

        let mut out = Vec::with_capacity(y.clone().count() * x.clone().count());
        for row in y {
            let start = var.layout.offset(t, z, row, *x.start())?;
            let end = start + (x.end() - x.start()) + 1;
            out.extend_from_slice(&var.data[start..end]);
        }
        Ok(out)
    }

    fn conversion(&self, variable: &str) -> ValueConversion {
        self.variables
            .get(variable)
            .map(|v| v.conversion)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion() {
        let conv = ValueConversion {
            scale: 0.5,
            offset: 10.0,
            missing_value: Some(-999.0),
            valid_range: Some((-100.0, 100.0)),
        };
        assert_eq!(conv.apply(4.0), 12.0);
        assert!(conv.apply(-999.0).is_nan());
        assert!(conv.apply(150.0).is_nan());
        assert!(conv.apply(f32::NAN).is_nan());
        assert_eq!(ValueConversion::default().apply(3.5), 3.5);
    }

    #[test]
    fn test_in_memory_block() {
        let layout = DimensionLayout::horizontal(3, 4);
        let data: Vec<f32> = (0..12).map(|v| v as f32).collect();
        let array = InMemoryArray::new("test").with_variable("v", layout, data).unwrap();

        let block = array.read_block("v", None, None, 1..=2, 1..=2).unwrap();
        assert_eq!(block, vec![5.0, 6.0, 9.0, 10.0]);
        assert_eq!(array.read_count(), 1);
        assert_eq!(array.file_type(), "test");
    }

    #[test]
    fn test_in_memory_with_levels() {
        let layout = DimensionLayout::horizontal(2, 2).with_z(2);
        let data: Vec<f32> = (0..8).map(|v| v as f32).collect();
        let array = InMemoryArray::new("test").with_variable("v", layout, data).unwrap();
        assert_eq!(array.read_block("v", None, Some(1), 0..=0, 0..=1).unwrap(), vec![4.0, 5.0]);
        assert!(array.read_block("v", None, None, 0..=0, 0..=1).is_err());
    }

    #[test]
    fn test_in_memory_errors() {
        let layout = DimensionLayout::horizontal(2, 2);
        assert!(InMemoryArray::new("test").with_variable("v", layout, vec![0.0; 3]).is_err());

        let array = InMemoryArray::new("test").with_variable("v", layout, vec![0.0; 4]).unwrap();
        assert!(matches!(
            array.read_block("w", None, None, 0..=0, 0..=0),
            Err(GridError::ReadFailed(_))
        ));
        assert!(array.read_block("v", None, None, 0..=2, 0..=0).is_err());
        assert_eq!(array.read_count(), 0);
    }
}
