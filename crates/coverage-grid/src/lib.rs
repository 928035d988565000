//! Horizontal grids, pixel mapping and strategy-driven bulk reads.
//!
//! This crate answers two questions for gridded environmental data:
//! which source cell contains a given position, and how to fetch the
//! source values for a whole target domain with as little I/O as
//! possible. It provides:
//!
//! - **Axes**: regular and irregular 1-D axes with cell-boundary lookup
//!   and longitude wrapping
//! - **Grids**: rectilinear, projected and curvilinear horizontal grids
//!   behind one [`HorizontalGrid`] trait
//! - **Pixel maps**: source-cell to target-position associations
//! - **Reading**: scanline, bounding-box and per-pixel strategies over any
//!   [`ArrayReader`]
//!
//! # Architecture
//!
//! ```text
//! CoordinateSystemSpec
//!      │
//!      ▼
//! create_horizontal_grid()
//!      │
//!      ├─► 1-D lon/lat        ──► RectilinearGrid
//!      ├─► 1-D x/y + proj     ──► ProjectedGrid
//!      └─► 2-D lon/lat        ──► CurvilinearGrid (look-up table + walk)
//!               │
//!               ▼
//! PixelMap::new(source, target)
//!      │
//!      ├─► rectilinear lat/lon pair: shared column lookups
//!      └─► otherwise: find_index_of per target position
//!               │
//!               ▼
//! DataReadingStrategy::optimum(bbox size, file type)
//!      │
//!      ▼
//! read_horizontal_points() ──► ArrayReader::read_block()
//!      │
//!      ▼
//! Vec<Option<f32>> (one per target position)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use coverage_grid::{
//!     create_horizontal_grid, read_horizontal_points, CoverageConfig,
//!     DataReadingStrategy, PixelMap, ReaderRegistry, TargetDomain,
//! };
//!
//! let config = CoverageConfig::from_env();
//! let source = create_horizontal_grid(&source_spec, &config)?;
//! let target = create_horizontal_grid(&target_spec, &config)?;
//!
//! let pixel_map = PixelMap::new(source.as_ref(), TargetDomain::Grid(target.as_ref()));
//! let reader = ReaderRegistry::with_defaults().open(&data_source)?;
//! let strategy = DataReadingStrategy::for_reader(&pixel_map, reader.as_ref(), &config);
//!
//! let values = read_horizontal_points(strategy, reader.as_ref(), "TMP", &pixel_map, None, None)?;
//! ```

pub mod axis;
pub mod config;
pub mod error;
pub mod factory;
pub mod grid;
pub mod linestring;
pub mod pixel_map;
pub mod reading;
pub mod refresh;

// Re-export commonly used types at crate root
pub use axis::{Axis, IrregularAxis, ReferenceableAxis, RegularAxis};
pub use config::CoverageConfig;
pub use error::{GridError, Result};
pub use factory::{
    create_horizontal_grid, AxisKind, CoordinateSystemSpec, CoordinateVariable, DataSourceSpec, ProjectionSpec,
    ReaderConstructor, ReaderRegistry,
};
pub use grid::{
    CurvilinearCell, CurvilinearCoords, CurvilinearGrid, Footprint, GridCell, GridCoordinates, HorizontalGrid,
    LookUpTable, ProjectedGrid, RectilinearGrid,
};
pub use linestring::{haversine_distance_km, LineString};
pub use pixel_map::{PixelMap, PixelMapEntry, TargetDomain};
pub use reading::{
    read_horizontal_points, read_vertical_section, ArrayReader, DataReadingStrategy, DimensionLayout, InMemoryArray,
    RawFileReader, ValueConversion,
};
pub use refresh::RefreshState;
