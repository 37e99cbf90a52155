//! Geocode a few well-known Indian cities with the bundled data.
//!
//! Run with `RUST_LOG=debug cargo run --example basic` to see lookup timings.

use anyhow::Result;
use lakhua::GeocodeOptions;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let options = GeocodeOptions::default().debug(true);

    for (name, lat, lon) in [
        ("New Delhi", 28.6139, 77.2090),
        ("Mumbai", 19.0760, 72.8777),
        ("Bengaluru", 12.9716, 77.5946),
    ] {
        match lakhua::geocode(lat, lon, &options)? {
            Some(found) => info!(
                "{}: {}, {} via {} (r{})",
                name, found.city, found.state, found.matched_h3, found.matched_resolution
            ),
            None => warn!("{}: no match", name),
        }
    }

    Ok(())
}
