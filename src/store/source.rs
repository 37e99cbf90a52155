//! Where lookup tables come from.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use super::{LoadError, ReverseGeoStore};
use crate::config::StoreConfig;

/// Provider of per-resolution tables.
///
/// `Ok(None)` means the source has no table for that resolution, which the
/// loader treats as an empty table.
pub trait StoreSource: Send + Sync {
    fn load(&self, resolution: u8) -> Result<Option<ReverseGeoStore>, LoadError>;
}

/// Reads `reverse_geo_<resolution>.json` files from a data directory.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    config: StoreConfig,
}

impl FileSource {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

impl StoreSource for FileSource {
    fn load(&self, resolution: u8) -> Result<Option<ReverseGeoStore>, LoadError> {
        read_reverse_geo_store(&self.config.data_file_path(resolution))
    }
}

/// Serves tables held in memory. Resolutions without a table load as empty.
#[derive(Debug, Clone, Default)]
pub struct FixedSource {
    stores: HashMap<u8, ReverseGeoStore>,
}

impl FixedSource {
    pub fn new(stores: HashMap<u8, ReverseGeoStore>) -> Self {
        Self { stores }
    }

    pub fn with_store(mut self, resolution: u8, store: ReverseGeoStore) -> Self {
        self.stores.insert(resolution, store);
        self
    }
}

impl StoreSource for FixedSource {
    fn load(&self, resolution: u8) -> Result<Option<ReverseGeoStore>, LoadError> {
        Ok(self.stores.get(&resolution).cloned())
    }
}

impl<S: StoreSource + ?Sized> StoreSource for Arc<S> {
    fn load(&self, resolution: u8) -> Result<Option<ReverseGeoStore>, LoadError> {
        (**self).load(resolution)
    }
}

/// Parse one table file.
///
/// Returns `Ok(None)` if the file does not exist. Unreadable or malformed
/// files are errors.
pub fn read_reverse_geo_store(path: &Path) -> Result<Option<ReverseGeoStore>, LoadError> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No reverse geo store at {}", path.display());
            return Ok(None);
        }
        Err(source) => {
            return Err(LoadError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let store: ReverseGeoStore =
        serde_json::from_slice(&raw).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(Some(store))
}
