//! Temporary files for reader tests.

use std::io::Write;
use std::path::PathBuf;

/// Creates a temporary directory for test output.
///
/// The directory is automatically cleaned up when the returned `TempDir` is dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("coverage_test")
        .tempdir()
        .expect("Failed to create temporary test directory")
}

/// Write `data` as little-endian `f32` values to `dir/name`.
///
/// Returns the path of the new file.
pub fn write_f32_le_file(dir: &tempfile::TempDir, name: &str, data: &[f32]) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("Failed to create test data file");
    for v in data {
        file.write_all(&v.to_le_bytes())
            .expect("Failed to write test data file");
    }
    path
}
