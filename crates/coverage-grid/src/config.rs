//! Tunables for grid indexing and bulk reads.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Configuration for grid construction and data reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageConfig {
    /// Pixel-map bounding boxes larger than this many cells are always
    /// read row by row.
    pub scanline_threshold_cells: usize,

    /// File types (case-insensitive) whose readers prefer row-by-row reads.
    pub scanline_file_types: Vec<String>,

    /// Upper bound for the refresh back-off delay, in seconds.
    pub refresh_max_backoff_secs: u64,

    /// Seconds after a successful load before a dataset is reloaded.
    /// `None` never reloads a loaded dataset.
    pub refresh_update_interval_secs: Option<u64>,

    /// Relative tolerance when deciding whether coordinate values are
    /// evenly spaced.
    pub regular_axis_tolerance: f64,

    /// Look-up table nodes per mean cell edge for curvilinear grids.
    pub lut_resolution_factor: f64,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            scanline_threshold_cells: 25_000_000,
            scanline_file_types: vec!["netCDF".to_string(), "HDF4".to_string()],
            refresh_max_backoff_secs: 600,
            refresh_update_interval_secs: None,
            regular_axis_tolerance: 1e-4,
            lut_resolution_factor: 3.0,
        }
    }
}

impl CoverageConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("COVERAGE_SCANLINE_THRESHOLD") {
            if let Ok(cells) = val.parse() {
                config.scanline_threshold_cells = cells;
            }
        }

        if let Ok(val) = std::env::var("COVERAGE_SCANLINE_FILE_TYPES") {
            config.scanline_file_types = val
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }

        if let Ok(val) = std::env::var("COVERAGE_REFRESH_MAX_BACKOFF_SECS") {
            if let Ok(secs) = val.parse() {
                config.refresh_max_backoff_secs = secs;
            }
        }

        if let Ok(val) = std::env::var("COVERAGE_REFRESH_UPDATE_INTERVAL_SECS") {
            if let Ok(secs) = val.parse() {
                config.refresh_update_interval_secs = Some(secs);
            }
        }

        if let Ok(val) = std::env::var("COVERAGE_REGULAR_AXIS_TOLERANCE") {
            if let Ok(tol) = val.parse() {
                config.regular_axis_tolerance = tol;
            }
        }

        if let Ok(val) = std::env::var("COVERAGE_LUT_RESOLUTION_FACTOR") {
            if let Ok(factor) = val.parse() {
                config.lut_resolution_factor = factor;
            }
        }

        config
    }

    /// Parse a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate().map_err(GridError::config_error)?;
        Ok(config)
    }

    /// Load a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| GridError::io(format!("reading config {}", path.display()), e))?;
        Self::from_yaml_str(&text)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.scanline_threshold_cells == 0 {
            return Err("scanline_threshold_cells must be > 0".to_string());
        }

        if self.refresh_max_backoff_secs == 0 {
            return Err("refresh_max_backoff_secs must be > 0".to_string());
        }

        if !(self.regular_axis_tolerance >= 0.0 && self.regular_axis_tolerance < 1.0) {
            return Err("regular_axis_tolerance must be in [0, 1)".to_string());
        }

        if !(self.lut_resolution_factor > 0.0) || !self.lut_resolution_factor.is_finite() {
            return Err("lut_resolution_factor must be a positive number".to_string());
        }

        Ok(())
    }

    /// Whether readers of `file_type` prefer row-by-row reads.
    pub fn prefers_scanline(&self, file_type: &str) -> bool {
        self.scanline_file_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(file_type))
    }
}
