//! Batch reverse geocoding from the command line.
//!
//! `cargo run --example batch -- 28.6139,77.2090 19.0760,72.8777`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use lakhua::{DataLoader, GeocodeOptions, ReverseGeocoder, StoreConfig};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "batch")]
#[command(about = "Reverse geocode lat,lon pairs")]
struct Args {
    /// Points as "lat,lon"
    #[arg(required = true)]
    points: Vec<String>,

    /// TOML file with `data_dir` / `file_prefix`
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding reverse_geo_<resolution>.json
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// H3 resolution for coordinate conversion
    #[arg(short, long)]
    resolution: Option<u8>,

    /// Only accept matches at the requested resolution
    #[arg(long)]
    no_fallback: bool,

    /// Log lookup timings
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.debug { Level::DEBUG } else { Level::INFO })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &args.config {
        Some(path) => StoreConfig::load_from_file(path)?,
        None => StoreConfig::default(),
    };
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    info!("Reading tables from {}", config.data_dir.display());

    let points = args
        .points
        .iter()
        .map(|p| parse_point(p.as_str()))
        .collect::<Result<Vec<_>>>()?;

    let mut options = GeocodeOptions::default()
        .fallback(!args.no_fallback)
        .debug(args.debug);
    options.resolution = args.resolution;

    let geocoder = ReverseGeocoder::new(Arc::new(DataLoader::from_config(config)));
    let results = geocoder.geocode_batch(&points, &options)?;

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

fn parse_point(s: &str) -> Result<(f64, f64)> {
    let (lat, lon) = s
        .split_once(',')
        .with_context(|| format!("Expected lat,lon but got {:?}", s))?;
    let lat = lat.trim().parse().context("Invalid latitude")?;
    let lon = lon.trim().parse().context("Invalid longitude")?;
    Ok((lat, lon))
}
