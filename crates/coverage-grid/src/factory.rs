//! Construction of grids and readers from dataset metadata.
//!
//! Two tables live here:
//!
//! - [`create_horizontal_grid`] picks a grid variant from the shape and
//!   kind of the coordinate variables.
//! - [`ReaderRegistry`] maps a reader key to the constructor that opens
//!   that kind of data source.
//!
//! # Example
//!
//! ```rust,ignore
//! use coverage_grid::{create_horizontal_grid, CoordinateSystemSpec, CoverageConfig};
//!
//! let spec = CoordinateSystemSpec::from_json(&metadata_json)?;
//! let grid = create_horizontal_grid(&spec, &CoverageConfig::from_env())?;
//! let index = grid.find_index_of(&position);
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use coverage_common::CrsCode;
use projection::{Geostationary, LambertConformal, Projection, RotatedPole, WebMercator};

use crate::axis::Axis;
use crate::config::CoverageConfig;
use crate::error::{GridError, Result};
use crate::grid::{CurvilinearCoords, CurvilinearGrid, HorizontalGrid, ProjectedGrid, RectilinearGrid};
use crate::reading::{ArrayReader, DimensionLayout, RawFileReader, ValueConversion, RAW_FILE_TYPE};

// ============================================================================
// Coordinate system metadata
// ============================================================================

/// What a coordinate variable measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisKind {
    Longitude,
    Latitude,
    ProjectionX,
    ProjectionY,
    Other,
}

impl AxisKind {
    fn is_lon_lat(self) -> bool {
        matches!(self, Self::Longitude | Self::Latitude)
    }
}

/// A coordinate variable as reported by a dataset: its values and shape.
///
/// One-dimensional variables have a shape of length 1; two-dimensional
/// ones are `[nj, ni]` with `ni` varying fastest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateVariable {
    pub name: String,
    pub kind: AxisKind,
    pub shape: Vec<usize>,
    pub values: Vec<f64>,
}

impl CoordinateVariable {
    /// A one-dimensional variable.
    pub fn one_d(name: impl Into<String>, kind: AxisKind, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            kind,
            shape: vec![values.len()],
            values,
        }
    }

    /// A two-dimensional variable of `nj` rows and `ni` columns.
    pub fn two_d(name: impl Into<String>, kind: AxisKind, nj: usize, ni: usize, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            kind,
            shape: vec![nj, ni],
            values,
        }
    }

    fn check_shape(&self) -> Result<()> {
        let expected: usize = self.shape.iter().product();
        if self.shape.is_empty() || self.values.len() != expected {
            return Err(GridError::invalid_argument(format!(
                "coordinate variable '{}' has {} values for shape {:?}",
                self.name,
                self.values.len(),
                self.shape
            )));
        }
        Ok(())
    }

    fn to_axis(&self, tolerance: f64) -> Result<Axis> {
        Axis::from_values(
            self.name.clone(),
            &self.values,
            self.kind == AxisKind::Longitude,
            tolerance,
        )
    }
}

/// Parameters of the projection behind projected coordinate variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProjectionSpec {
    LambertConformal {
        lat0: f64,
        lon0: f64,
        latin1: f64,
        latin2: f64,
        #[serde(default = "default_earth_radius")]
        earth_radius: f64,
    },
    Geostationary {
        perspective_point_height: f64,
        semi_major_axis: f64,
        semi_minor_axis: f64,
        longitude_origin: f64,
    },
    RotatedPole {
        pole_lon: f64,
        pole_lat: f64,
    },
    Mercator,
}

fn default_earth_radius() -> f64 {
    6_371_229.0
}

impl ProjectionSpec {
    /// Instantiate the projection.
    pub fn build(&self) -> Result<Arc<dyn Projection>> {
        let projection: Arc<dyn Projection> = match *self {
            Self::LambertConformal {
                lat0,
                lon0,
                latin1,
                latin2,
                earth_radius,
            } => Arc::new(LambertConformal::new(lat0, lon0, latin1, latin2, earth_radius)?),
            Self::Geostationary {
                perspective_point_height,
                semi_major_axis,
                semi_minor_axis,
                longitude_origin,
            } => Arc::new(Geostationary::new(
                perspective_point_height,
                semi_major_axis,
                semi_minor_axis,
                longitude_origin,
            )),
            Self::RotatedPole { pole_lon, pole_lat } => Arc::new(RotatedPole::new(pole_lon, pole_lat)?),
            Self::Mercator => Arc::new(WebMercator),
        };
        Ok(projection)
    }
}

/// The horizontal coordinate system of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateSystemSpec {
    pub x: CoordinateVariable,
    pub y: CoordinateVariable,
    #[serde(default)]
    pub projection: Option<ProjectionSpec>,
}

impl CoordinateSystemSpec {
    /// Parse from JSON metadata.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// ============================================================================
// Grid factory
// ============================================================================

/// Build the grid described by `spec`.
///
/// - 1-D longitude and latitude variables give a [`RectilinearGrid`].
/// - 1-D projected variables with a projection give a [`ProjectedGrid`].
/// - 2-D longitude and latitude variables give a [`CurvilinearGrid`].
///
/// Other combinations are [`GridError::UnsupportedConfiguration`].
pub fn create_horizontal_grid(spec: &CoordinateSystemSpec, config: &CoverageConfig) -> Result<Arc<dyn HorizontalGrid>> {
    spec.x.check_shape()?;
    spec.y.check_shape()?;

    let grid: Arc<dyn HorizontalGrid> = match (spec.x.shape.len(), spec.y.shape.len()) {
        (1, 1) => {
            let x_axis = spec.x.to_axis(config.regular_axis_tolerance)?;
            let y_axis = spec.y.to_axis(config.regular_axis_tolerance)?;
            match (&spec.projection, spec.x.kind, spec.y.kind) {
                (Some(projection), _, _) => {
                    let grid = ProjectedGrid::new(projection.build()?, x_axis, y_axis);
                    info!(
                        projection = grid.projection().name(),
                        x_size = grid.x_size(),
                        y_size = grid.y_size(),
                        "Created projected grid"
                    );
                    Arc::new(grid)
                }
                (None, AxisKind::Longitude, AxisKind::Latitude) => {
                    let regular = matches!(x_axis, Axis::Regular(_)) && matches!(y_axis, Axis::Regular(_));
                    let grid = RectilinearGrid::new(x_axis, y_axis, CrsCode::Epsg4326);
                    info!(
                        x_size = grid.x_size(),
                        y_size = grid.y_size(),
                        regular,
                        "Created rectilinear grid"
                    );
                    Arc::new(grid)
                }
                (None, x_kind, y_kind) => {
                    return Err(GridError::unsupported(format!(
                        "1-D axes of kind {:?} and {:?} need a projection",
                        x_kind, y_kind
                    )))
                }
            }
        }
        (2, 2) => {
            if !(spec.x.kind == AxisKind::Longitude && spec.y.kind == AxisKind::Latitude) {
                return Err(GridError::unsupported(format!(
                    "2-D coordinates of kind {:?} and {:?} are not longitude and latitude",
                    spec.x.kind, spec.y.kind
                )));
            }
            if spec.x.shape != spec.y.shape {
                return Err(GridError::invalid_argument(format!(
                    "longitude shape {:?} differs from latitude shape {:?}",
                    spec.x.shape, spec.y.shape
                )));
            }
            let (nj, ni) = (spec.x.shape[0], spec.x.shape[1]);
            let coords = CurvilinearCoords::new(ni, nj, &spec.x.values, &spec.y.values)?;
            let grid = CurvilinearGrid::new(coords, config.lut_resolution_factor)?;
            info!(
                ni,
                nj,
                lut_lon_points = grid.look_up_table().num_lon_points(),
                lut_lat_points = grid.look_up_table().num_lat_points(),
                "Created curvilinear grid"
            );
            Arc::new(grid)
        }
        (x_rank, y_rank) => {
            let kinds_ok = spec.x.kind.is_lon_lat() && spec.y.kind.is_lon_lat();
            return Err(GridError::unsupported(format!(
                "cannot build a grid from {}-D '{}' and {}-D '{}'{}",
                x_rank,
                spec.x.name,
                y_rank,
                spec.y.name,
                if kinds_ok { "" } else { " of non-geographic kind" }
            )));
        }
    };
    Ok(grid)
}

// ============================================================================
// Reader registry
// ============================================================================

/// Where and how to open a data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSourceSpec {
    /// Registry key of the reader, e.g. `"raw-f32"`
    pub reader: String,
    pub path: PathBuf,
    pub variable: String,
    pub layout: DimensionLayout,
    #[serde(default)]
    pub conversion: Option<ValueConversion>,
}

/// Constructor for a reader.
pub type ReaderConstructor = fn(&DataSourceSpec) -> Result<Box<dyn ArrayReader>>;

/// Explicit table of reader constructors keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ReaderRegistry {
    constructors: HashMap<String, ReaderConstructor>,
}

impl ReaderRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in readers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(RAW_FILE_TYPE, open_raw_file);
        registry
    }

    /// Register `constructor` under `key`, replacing any earlier entry.
    pub fn register(&mut self, key: impl Into<String>, constructor: ReaderConstructor) {
        self.constructors.insert(key.into(), constructor);
    }

    /// Open the source with the reader registered under `spec.reader`.
    pub fn open(&self, spec: &DataSourceSpec) -> Result<Box<dyn ArrayReader>> {
        let constructor = self
            .constructors
            .get(&spec.reader)
            .ok_or_else(|| GridError::UnknownReader(spec.reader.clone()))?;
        constructor(spec)
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

fn open_raw_file(spec: &DataSourceSpec) -> Result<Box<dyn ArrayReader>> {
    let reader = RawFileReader::open(&spec.path, spec.variable.clone(), spec.layout)?;
    Ok(Box::new(reader.with_conversion(spec.conversion.unwrap_or_default())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lon_lat_spec(lons: Vec<f64>, lats: Vec<f64>) -> CoordinateSystemSpec {
        CoordinateSystemSpec {
            x: CoordinateVariable::one_d("lon", AxisKind::Longitude, lons),
            y: CoordinateVariable::one_d("lat", AxisKind::Latitude, lats),
            projection: None,
        }
    }

    #[test]
    fn test_one_d_lon_lat_is_rectilinear() {
        let spec = lon_lat_spec(vec![0.0, 1.0, 2.0, 3.0], vec![10.0, 11.0, 13.0]);
        let grid = create_horizontal_grid(&spec, &CoverageConfig::default()).unwrap();
        let rect = grid.as_rectilinear().unwrap();
        assert!(matches!(rect.x_axis(), Axis::Regular(_)));
        assert!(matches!(rect.y_axis(), Axis::Irregular(_)));
        assert_eq!(grid.size(), 12);
    }

    #[test]
    fn test_shape_mismatch_is_invalid() {
        let mut spec = lon_lat_spec(vec![0.0, 1.0], vec![0.0, 1.0]);
        spec.x.shape = vec![3];
        let err = create_horizontal_grid(&spec, &CoverageConfig::default()).unwrap_err();
        assert!(matches!(err, GridError::InvalidArgument(_)));
    }

    #[test]
    fn test_projected_axes_without_projection_unsupported() {
        let spec = CoordinateSystemSpec {
            x: CoordinateVariable::one_d("x", AxisKind::ProjectionX, vec![0.0, 1.0]),
            y: CoordinateVariable::one_d("y", AxisKind::ProjectionY, vec![0.0, 1.0]),
            projection: None,
        };
        let err = create_horizontal_grid(&spec, &CoverageConfig::default()).unwrap_err();
        assert!(matches!(err, GridError::UnsupportedConfiguration(_)));
    }

    #[test]
    fn test_two_d_projected_unsupported() {
        let spec = CoordinateSystemSpec {
            x: CoordinateVariable::two_d("x", AxisKind::ProjectionX, 2, 2, vec![0.0; 4]),
            y: CoordinateVariable::two_d("y", AxisKind::ProjectionY, 2, 2, vec![0.0; 4]),
            projection: None,
        };
        let err = create_horizontal_grid(&spec, &CoverageConfig::default()).unwrap_err();
        assert!(matches!(err, GridError::UnsupportedConfiguration(_)));
    }

    #[test]
    fn test_mixed_ranks_unsupported() {
        let spec = CoordinateSystemSpec {
            x: CoordinateVariable::two_d("lon", AxisKind::Longitude, 2, 2, vec![0.0; 4]),
            y: CoordinateVariable::one_d("lat", AxisKind::Latitude, vec![0.0, 1.0]),
            projection: None,
        };
        let err = create_horizontal_grid(&spec, &CoverageConfig::default()).unwrap_err();
        assert!(matches!(err, GridError::UnsupportedConfiguration(_)));
    }

    #[test]
    fn test_projection_spec_from_json() {
        let json = r#"{
            "x": {"name": "rlon", "kind": "projection_x", "shape": [3], "values": [-1.0, 0.0, 1.0]},
            "y": {"name": "rlat", "kind": "projection_y", "shape": [3], "values": [-1.0, 0.0, 1.0]},
            "projection": {"type": "rotated_pole", "pole_lon": -170.0, "pole_lat": 40.0}
        }"#;
        let spec = CoordinateSystemSpec::from_json(json).unwrap();
        assert_eq!(
            spec.projection,
            Some(ProjectionSpec::RotatedPole {
                pole_lon: -170.0,
                pole_lat: 40.0
            })
        );
        let grid = create_horizontal_grid(&spec, &CoverageConfig::default()).unwrap();
        assert!(grid.as_rectilinear().is_none());
        assert_eq!(grid.size(), 9);
    }

    #[test]
    fn test_registry_unknown_key() {
        let registry = ReaderRegistry::with_defaults();
        assert_eq!(registry.keys(), vec!["raw-f32"]);
        let spec = DataSourceSpec {
            reader: "grib2".to_string(),
            path: PathBuf::from("/nonexistent"),
            variable: "v".to_string(),
            layout: DimensionLayout::horizontal(1, 1),
            conversion: None,
        };
        assert!(matches!(registry.open(&spec), Err(GridError::UnknownReader(_))));
    }
}
