//! Resolution-partitioned reverse geocoding tables.
//!
//! Tables are read from a [`StoreSource`] once per process (or until the cache
//! is cleared) and shared behind `Arc`s by every lookup.

mod error;
mod loader;
mod source;

pub use error::LoadError;
pub use loader::{data_loader, DataLoader, StoreMap};
pub use source::{read_reverse_geo_store, FileSource, FixedSource, StoreSource};

use crate::models::LocationDetails;

/// Cell id -> location for a single resolution.
pub type ReverseGeoStore = hashbrown::HashMap<String, LocationDetails>;
