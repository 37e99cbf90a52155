//! Resolution bounds and data file locations.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Coarsest H3 resolution with a lookup table (~1,770 km² cells).
pub const MIN_RESOLUTION: u8 = 4;

/// Finest H3 resolution with a lookup table (~36 km² cells).
pub const MAX_RESOLUTION: u8 = 6;

/// Resolution used to convert coordinates when none is requested.
pub const DEFAULT_RESOLUTION: u8 = MAX_RESOLUTION;

/// Every resolution that has a table on disk, coarsest first.
pub const SUPPORTED_RESOLUTIONS: [u8; 3] = [4, 5, 6];

pub const DATA_DIR_NAME: &str = "data";
pub const DATA_FILE_PREFIX: &str = "reverse_geo_";

/// Clamp a requested resolution into the supported range.
pub fn clamp_resolution(resolution: u8) -> u8 {
    resolution.clamp(MIN_RESOLUTION, MAX_RESOLUTION)
}

/// Where the per-resolution lookup tables live.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub file_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: Path::new(env!("CARGO_MANIFEST_DIR")).join(DATA_DIR_NAME),
            file_prefix: DATA_FILE_PREFIX.to_string(),
        }
    }
}

impl StoreConfig {
    pub fn with_data_dir<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Path of the table for one resolution, e.g. `data/reverse_geo_5.json`
    pub fn data_file_path(&self, resolution: u8) -> PathBuf {
        self.data_dir
            .join(format!("{}{}.json", self.file_prefix, resolution))
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read store config file")?;
        let config: StoreConfig =
            toml::from_str(&content).context("Failed to parse store config file")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_resolution() {
        assert_eq!(clamp_resolution(99), MAX_RESOLUTION);
        assert_eq!(clamp_resolution(1), MIN_RESOLUTION);
        assert_eq!(clamp_resolution(0), MIN_RESOLUTION);
        assert_eq!(clamp_resolution(5), 5);
    }

    #[test]
    fn test_supported_resolutions_match_bounds() {
        assert_eq!(SUPPORTED_RESOLUTIONS.first(), Some(&MIN_RESOLUTION));
        assert_eq!(SUPPORTED_RESOLUTIONS.last(), Some(&MAX_RESOLUTION));
        assert_eq!(DEFAULT_RESOLUTION, MAX_RESOLUTION);
    }

    #[test]
    fn test_data_file_path() {
        let config = StoreConfig::with_data_dir("/srv/lakhua");
        assert_eq!(
            config.data_file_path(5),
            PathBuf::from("/srv/lakhua/reverse_geo_5.json")
        );
    }

    #[test]
    fn test_load_from_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lakhua.toml");
        fs::write(&path, "data_dir = \"/opt/geo\"\n").unwrap();

        let config = StoreConfig::load_from_file(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/opt/geo"));
        assert_eq!(config.file_prefix, DATA_FILE_PREFIX);
    }

    #[test]
    fn test_load_from_file_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lakhua.toml");
        fs::write(&path, "data_dir = [").unwrap();

        assert!(StoreConfig::load_from_file(&path).is_err());
    }
}
