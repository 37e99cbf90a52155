//! Lakhua - offline reverse geocoding for India over H3 cells.
//!
//! Location tables are keyed by H3 cell id at resolutions 4 through 6 and read
//! from `data/reverse_geo_<resolution>.json` on first use. Lookups that miss at
//! the finest resolution fall back to coarser ancestor cells.
//!
//! ```no_run
//! let result = lakhua::geocode(28.6139, 77.2090, &Default::default())?;
//! if let Some(found) = result {
//!     println!("{}, {} (r{})", found.city, found.state, found.matched_resolution);
//! }
//! # Ok::<(), lakhua::LoadError>(())
//! ```

pub mod cell;
pub mod config;
pub mod geocoder;
pub mod models;
pub mod store;

pub use config::{
    clamp_resolution, StoreConfig, DATA_DIR_NAME, DATA_FILE_PREFIX, DEFAULT_RESOLUTION,
    MAX_RESOLUTION, MIN_RESOLUTION, SUPPORTED_RESOLUTIONS,
};
pub use geocoder::{geocoder, ReverseGeocoder};
pub use models::{GeocodeOptions, GeocodeResult, LocationDetails};
pub use store::{
    data_loader, DataLoader, FileSource, FixedSource, LoadError, ReverseGeoStore, StoreSource,
};

/// Geocode a latitude/longitude with the process-wide geocoder.
pub fn geocode(
    lat: f64,
    lon: f64,
    options: &GeocodeOptions,
) -> Result<Option<GeocodeResult>, LoadError> {
    geocoder().geocode(lat, lon, options)
}

/// Geocode an H3 cell id with the process-wide geocoder.
pub fn geocode_h3(
    h3_index: &str,
    options: &GeocodeOptions,
) -> Result<Option<GeocodeResult>, LoadError> {
    geocoder().geocode_h3(h3_index, options)
}

/// Geocode many `(lat, lon)` pairs with the process-wide geocoder.
pub fn geocode_batch(
    points: &[(f64, f64)],
    options: &GeocodeOptions,
) -> Result<Vec<Option<GeocodeResult>>, LoadError> {
    geocoder().geocode_batch(points, options)
}
