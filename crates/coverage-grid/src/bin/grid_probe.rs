//! Grid probe
//!
//! Builds a pixel map between two regular lat/lon grids and reports the
//! reading strategy that would be used for it.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use coverage_common::CrsCode;
use coverage_grid::{
    Axis, CoverageConfig, DataReadingStrategy, HorizontalGrid, PixelMap, RectilinearGrid, RegularAxis, TargetDomain,
};

/// Grid probe
#[derive(Parser, Debug)]
#[command(name = "grid-probe")]
#[command(about = "Report pixel-map statistics and reading strategy for a pair of lat/lon grids")]
struct Args {
    /// Source grid as "lon0,dlon,nlon,lat0,dlat,nlat"
    #[arg(long, default_value = "-180,0.25,1440,-90,0.25,721")]
    source: String,

    /// Target grid as "lon0,dlon,nlon,lat0,dlat,nlat"
    #[arg(long, default_value = "-10,0.1,256,40,0.1,256")]
    target: String,

    /// Format tag of the source data
    #[arg(long, default_value = "netCDF", env = "COVERAGE_FILE_TYPE")]
    file_type: String,

    /// YAML configuration file (defaults to environment variables)
    #[arg(long, env = "COVERAGE_CONFIG")]
    config: Option<String>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Emit JSON logs
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let subscriber = fmt().with_env_filter(filter).with_target(true).with_level(true);
    if args.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let config = match &args.config {
        Some(path) => CoverageConfig::load(path).with_context(|| format!("loading {}", path))?,
        None => CoverageConfig::from_env(),
    };

    let source = parse_grid(&args.source).context("parsing --source")?;
    let target = parse_grid(&args.target).context("parsing --target")?;
    info!(
        source_size = source.size(),
        target_size = target.size(),
        "Building pixel map"
    );

    let pixel_map = PixelMap::new(&source, TargetDomain::Grid(&target));
    let strategy = DataReadingStrategy::optimum(pixel_map.bounding_box_size(), &args.file_type, &config);

    println!("strategy:            {}", strategy);
    println!("target positions:    {}", pixel_map.target_size());
    println!("mapped positions:    {}", pixel_map.num_entries());
    println!("unique source cells: {}", pixel_map.num_unique_ij_pairs());
    println!("bounding box cells:  {}", pixel_map.bounding_box_size());
    println!("scanline cells:      {}", pixel_map.sum_row_lengths());
    if let (Some(i0), Some(i1), Some(j0), Some(j1)) =
        (pixel_map.min_i(), pixel_map.max_i(), pixel_map.min_j(), pixel_map.max_j())
    {
        println!("source i range:      {}..={}", i0, i1);
        println!("source j range:      {}..={}", j0, j1);
    }
    Ok(())
}

fn parse_grid(spec: &str) -> Result<RectilinearGrid> {
    let parts: Vec<&str> = spec.split(',').map(str::trim).collect();
    if parts.len() != 6 {
        anyhow::bail!("expected 6 comma-separated values, got {}", parts.len());
    }
    let num = |s: &str| s.parse::<f64>().with_context(|| format!("invalid number '{}'", s));
    let count = |s: &str| s.parse::<usize>().with_context(|| format!("invalid count '{}'", s));

    let x_axis = RegularAxis::new("lon", num(parts[0])?, num(parts[1])?, count(parts[2])?, true)?;
    let y_axis = RegularAxis::new("lat", num(parts[3])?, num(parts[4])?, count(parts[5])?, false)?;
    Ok(RectilinearGrid::new(
        Axis::Regular(x_axis),
        Axis::Regular(y_axis),
        CrsCode::Epsg4326,
    ))
}
