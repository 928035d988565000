//! Reader for headerless little-endian `f32` files.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::offsets::DimensionLayout;
use super::reader::{ArrayReader, ValueConversion};
use crate::error::{GridError, Result};

/// File type tag reported by [`RawFileReader`].
pub const RAW_FILE_TYPE: &str = "raw-f32";

/// Reads one variable stored as a row-major array of little-endian `f32`.
///
/// Each requested row is read with its own seek, so a block read touches
/// only the bytes of the requested columns.
#[derive(Debug, Clone)]
pub struct RawFileReader {
    path: PathBuf,
    variable: String,
    layout: DimensionLayout,
    conversion: ValueConversion,
}

impl RawFileReader {
    /// Open `path` holding `variable` with the given layout.
    ///
    /// The file length must match the layout exactly.
    pub fn open(path: impl AsRef<Path>, variable: impl Into<String>, layout: DimensionLayout) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = std::fs::metadata(&path)
            .map_err(|e| GridError::io(format!("reading metadata of {}", path.display()), e))?;
        let expected = (layout.len() * 4) as u64;
        if metadata.len() != expected {
            return Err(GridError::invalid_argument(format!(
                "{} is {} bytes but shape {:?} needs {}",
                path.display(),
                metadata.len(),
                layout.shape(),
                expected
            )));
        }
        Ok(Self {
            path,
            variable: variable.into(),
            layout,
            conversion: ValueConversion::default(),
        })
    }

    pub fn with_conversion(mut self, conversion: ValueConversion) -> Self {
        self.conversion = conversion;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn check_variable(&self, variable: &str) -> Result<()> {
        if variable != self.variable {
            return Err(GridError::read_failed(format!(
                "{} holds '{}', not '{}'",
                self.path.display(),
                self.variable,
                variable
            )));
        }
        Ok(())
    }
}

impl ArrayReader for RawFileReader {
    fn file_type(&self) -> &str {
        RAW_FILE_TYPE
    }

    fn layout(&self, variable: &str) -> Result<DimensionLayout> {
        self.check_variable(variable)?;
        Ok(self.layout)
    }

    fn read_block(
        &self,
        variable: &str,
        t: Option<usize>,
        z: Option<usize>,
        y: RangeInclusive<usize>,
        x: RangeInclusive<usize>,
    ) -> Result<Vec<f32>> {
        self.check_variable(variable)?;
        self.layout.check_block(&y, &x)?;

        let context = || format!("reading {}", self.path.display());
        let mut file = File::open(&self.path).map_err(|e| GridError::io(context(), e))?;

        let width = x.end() - x.start() + 1;
        let mut row_bytes = vec![0u8; width * 4];
        let mut out = Vec::with_capacity(width * (y.end() - y.start() + 1));
        for row in y.clone() {
            let offset = self.layout.offset(t, z, row, *x.start())?;
            file.seek(SeekFrom::Start(offset as u64 * 4))
                .map_err(|e| GridError::io(context(), e))?;
            file.read_exact(&mut row_bytes)
                .map_err(|e| GridError::io(context(), e))?;
            out.extend(
                row_bytes
                    .chunks_exact(4)
                    .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]])),
            );
        }

        debug!(
            path = %self.path.display(),
            rows = ?y,
            columns = ?x,
            values = out.len(),
            "Read raw block"
        );
        Ok(out)
    }

    fn conversion(&self, _variable: &str) -> ValueConversion {
        self.conversion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_values(dir: &Path, values: &[f32]) -> PathBuf {
        let path = dir.join("data.bin");
        let mut file = File::create(&path).unwrap();
        for v in values {
            file.write_all(&v.to_le_bytes()).unwrap();
        }
        path
    }

    #[test]
    fn test_reads_block_rows() {
        let dir = tempfile::tempdir().unwrap();
        let values: Vec<f32> = (0..20).map(|v| v as f32).collect();
        let path = write_values(dir.path(), &values);
        let reader = RawFileReader::open(&path, "v", DimensionLayout::horizontal(4, 5)).unwrap();

        let block = reader.read_block("v", None, None, 1..=2, 2..=4).unwrap();
        assert_eq!(block, vec![7.0, 8.0, 9.0, 12.0, 13.0, 14.0]);
    }

    #[test]
    fn test_length_mismatch_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_values(dir.path(), &[0.0; 5]);
        let err = RawFileReader::open(&path, "v", DimensionLayout::horizontal(2, 3)).unwrap_err();
        assert!(matches!(err, GridError::InvalidArgument(_)));
    }

    #[test]
    fn test_missing_file_is_io() {
        let dir = tempfile::tempdir().unwrap();
        let err = RawFileReader::open(dir.path().join("absent.bin"), "v", DimensionLayout::horizontal(1, 1))
            .unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_file_removed_after_open_is_io() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_values(dir.path(), &[1.0; 4]);
        let reader = RawFileReader::open(&path, "v", DimensionLayout::horizontal(2, 2)).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(reader.read_block("v", None, None, 0..=0, 0..=0).unwrap_err().is_io());
    }

    #[test]
    fn test_wrong_variable() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_values(dir.path(), &[1.0; 4]);
        let reader = RawFileReader::open(&path, "v", DimensionLayout::horizontal(2, 2)).unwrap();
        assert!(matches!(reader.layout("w"), Err(GridError::ReadFailed(_))));
    }
}
