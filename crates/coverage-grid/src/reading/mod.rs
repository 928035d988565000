//! Bulk reading of source values for a pixel map.
//!
//! [`ArrayReader`] is the contract for anything that can serve rectangular
//! blocks of a gridded variable. [`read_horizontal_points`] drives a
//! reader with a [`DataReadingStrategy`] and scatters the values to the
//! target positions of a [`PixelMap`](crate::PixelMap).

mod offsets;
mod raw;
mod reader;
mod strategy;

pub use offsets::{flat_offset, strides, DimensionLayout};
pub use raw::{RawFileReader, RAW_FILE_TYPE};
pub use reader::{ArrayReader, InMemoryArray, ValueConversion};
pub use strategy::{read_horizontal_points, read_vertical_section, DataReadingStrategy};
