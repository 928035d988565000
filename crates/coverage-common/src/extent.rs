//! Closed intervals used for axis cell bounds and domain checks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoverageError, CoverageResult};

/// An immutable closed interval `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent<T> {
    low: T,
    high: T,
}

impl<T> Extent<T>
where
    T: PartialOrd + Copy + fmt::Debug,
{
    /// Create an extent, failing if `low > high`.
    pub fn new(low: T, high: T) -> CoverageResult<Self> {
        if low > high {
            return Err(CoverageError::InvalidExtent {
                low: format!("{:?}", low),
                high: format!("{:?}", high),
            });
        }
        Ok(Self { low, high })
    }

    /// Create an extent from two values in either order.
    pub fn ordered(a: T, b: T) -> Self {
        if b < a {
            Self { low: b, high: a }
        } else {
            Self { low: a, high: b }
        }
    }

    /// A degenerate extent containing a single value.
    pub fn point(v: T) -> Self {
        Self { low: v, high: v }
    }

    pub fn low(&self) -> T {
        self.low
    }

    pub fn high(&self) -> T {
        self.high
    }

    /// `low <= v <= high`. Unordered values such as NaN are never contained.
    pub fn contains(&self, v: T) -> bool {
        self.low <= v && v <= self.high
    }

    /// Smallest extent covering every ordered value in `values`.
    ///
    /// Values that do not compare with themselves (NaN) are skipped.
    /// Returns `None` if nothing remains.
    pub fn find_min_max<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let mut result: Option<Self> = None;
        for v in values {
            if v.partial_cmp(&v).is_none() {
                continue;
            }
            result = Some(match result {
                None => Self::point(v),
                Some(e) => Self {
                    low: if v < e.low { v } else { e.low },
                    high: if v > e.high { v } else { e.high },
                },
            });
        }
        result
    }
}

impl Extent<f64> {
    /// `high - low`.
    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    /// Midpoint of the interval.
    pub fn midpoint(&self) -> f64 {
        0.5 * (self.low + self.high)
    }
}

impl<T: fmt::Display> fmt::Display for Extent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}
