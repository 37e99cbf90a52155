//! Core data models for reverse geocoding.

pub mod location;
pub mod options;

pub use location::{GeocodeResult, LocationDetails};
pub use options::GeocodeOptions;
