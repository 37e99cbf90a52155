//! Reverse geocoding with resolution fallback.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use geo_types::Point;
use rayon::prelude::*;
use tracing::debug;

use crate::cell::{cell_resolution, cell_to_ancestor, coordinate_to_cell, parse_cell};
use crate::config::{clamp_resolution, MIN_RESOLUTION};
use crate::models::{GeocodeOptions, GeocodeResult};
use crate::store::{data_loader, DataLoader, LoadError};

static DEFAULT_GEOCODER: OnceLock<Arc<ReverseGeocoder>> = OnceLock::new();

/// Process-wide geocoder backed by [`data_loader`].
pub fn geocoder() -> Arc<ReverseGeocoder> {
    Arc::clone(DEFAULT_GEOCODER.get_or_init(|| Arc::new(ReverseGeocoder::new(data_loader()))))
}

/// Resolves coordinates and H3 cells to the nearest known location.
///
/// A lookup starts at the cell's resolution (clamped into the supported range)
/// and, with fallback enabled, walks up through coarser ancestors until one of
/// them has an entry. The finest match wins.
pub struct ReverseGeocoder {
    loader: Arc<DataLoader>,
}

impl ReverseGeocoder {
    pub fn new(loader: Arc<DataLoader>) -> Self {
        Self { loader }
    }

    pub fn data_loader(&self) -> &Arc<DataLoader> {
        &self.loader
    }

    /// Look up an H3 cell id.
    ///
    /// Invalid cell ids and cells without data are `Ok(None)`; only a broken
    /// table on disk is an error.
    pub fn geocode_h3(
        &self,
        h3_index: &str,
        options: &GeocodeOptions,
    ) -> Result<Option<GeocodeResult>, LoadError> {
        let Some(cell) = parse_cell(h3_index) else {
            if options.debug {
                debug!("Invalid h3 index provided: {:?}", h3_index);
            }
            return Ok(None);
        };

        let started = Instant::now();
        let input_resolution = cell_resolution(cell);
        let start_resolution = clamp_resolution(input_resolution);
        let end_resolution = if options.fallback {
            MIN_RESOLUTION
        } else {
            start_resolution
        };

        for resolution in (end_resolution..=start_resolution).rev() {
            let candidate = if resolution == input_resolution {
                cell
            } else {
                // Cells coarser than the supported range have no ancestor here.
                match cell_to_ancestor(cell, resolution) {
                    Some(ancestor) => ancestor,
                    None => continue,
                }
            };
            let candidate = candidate.to_string();

            let store = self.loader.load_resolution_store(resolution, options.debug)?;

            let lookup_started = Instant::now();
            let found = store.get(&candidate);
            if options.debug {
                debug!(
                    "Lookup key {} in r{} took {:.3}ms",
                    candidate,
                    resolution,
                    lookup_started.elapsed().as_secs_f64() * 1000.0
                );
            }

            if let Some(location) = found {
                if options.debug {
                    debug!(
                        "Match found in {:.3}ms",
                        started.elapsed().as_secs_f64() * 1000.0
                    );
                }
                return Ok(Some(GeocodeResult {
                    location: location.clone(),
                    matched_h3: candidate,
                    matched_resolution: resolution,
                }));
            }
        }

        if options.debug {
            debug!(
                "No match found in {:.3}ms",
                started.elapsed().as_secs_f64() * 1000.0
            );
        }
        Ok(None)
    }

    /// Look up a latitude/longitude in degrees.
    ///
    /// Non-finite or out-of-range coordinates are `Ok(None)` and never touch
    /// the store.
    pub fn geocode(
        &self,
        lat: f64,
        lon: f64,
        options: &GeocodeOptions,
    ) -> Result<Option<GeocodeResult>, LoadError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Ok(None);
        }
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Ok(None);
        }

        let resolution = options.effective_resolution();
        let Some(cell) = coordinate_to_cell(lat, lon, resolution) else {
            return Ok(None);
        };

        self.geocode_h3(&cell.to_string(), options)
    }

    /// Look up a point where `x` is longitude and `y` is latitude.
    pub fn geocode_point(
        &self,
        point: Point<f64>,
        options: &GeocodeOptions,
    ) -> Result<Option<GeocodeResult>, LoadError> {
        self.geocode(point.y(), point.x(), options)
    }

    /// Look up many `(lat, lon)` pairs in parallel. Results keep input order.
    pub fn geocode_batch(
        &self,
        points: &[(f64, f64)],
        options: &GeocodeOptions,
    ) -> Result<Vec<Option<GeocodeResult>>, LoadError> {
        // Load once up front so workers don't all queue on the load lock.
        self.loader
            .load_resolution_store(options.effective_resolution(), options.debug)?;

        points
            .par_iter()
            .map(|&(lat, lon)| self.geocode(lat, lon, options))
            .collect()
    }
}
