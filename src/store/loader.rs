//! Load-once cache of the per-resolution tables.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

use super::{FileSource, LoadError, ReverseGeoStore, StoreSource};
use crate::config::{StoreConfig, SUPPORTED_RESOLUTIONS};

/// Resolution -> table.
pub type StoreMap = HashMap<u8, Arc<ReverseGeoStore>>;

static DEFAULT_LOADER: OnceLock<Arc<DataLoader>> = OnceLock::new();

/// Process-wide loader reading from the default data directory.
pub fn data_loader() -> Arc<DataLoader> {
    Arc::clone(
        DEFAULT_LOADER.get_or_init(|| Arc::new(DataLoader::from_config(StoreConfig::default()))),
    )
}

/// Shared, lazily populated view of every supported resolution's table.
///
/// The first lookup of any resolution loads all of them. Loading is serialized,
/// so concurrent first lookups read the source once and never observe a
/// partially filled cache.
pub struct DataLoader {
    source: Box<dyn StoreSource>,
    stores: RwLock<Option<Arc<StoreMap>>>,
    load_lock: Mutex<()>,
    test_override: RwLock<Option<Arc<StoreMap>>>,
}

impl DataLoader {
    pub fn new<S: StoreSource + 'static>(source: S) -> Self {
        Self {
            source: Box::new(source),
            stores: RwLock::new(None),
            load_lock: Mutex::new(()),
            test_override: RwLock::new(None),
        }
    }

    pub fn from_config(config: StoreConfig) -> Self {
        Self::new(FileSource::new(config))
    }

    /// Table for `resolution`.
    ///
    /// Unsupported resolutions and resolutions without data yield an empty
    /// table. Fails only if a table exists but cannot be read, in which case
    /// nothing is cached and the next call retries.
    pub fn load_resolution_store(
        &self,
        resolution: u8,
        debug: bool,
    ) -> Result<Arc<ReverseGeoStore>, LoadError> {
        if let Some(store) = self
            .test_override
            .read()
            .as_ref()
            .and_then(|stores| stores.get(&resolution))
        {
            if debug {
                debug!("Using test override store for r{}", resolution);
            }
            return Ok(Arc::clone(store));
        }

        let stores = self.load_all_stores_once(debug)?;

        let started = Instant::now();
        let store = stores
            .get(&resolution)
            .cloned()
            .unwrap_or_else(|| Arc::new(ReverseGeoStore::new()));
        if debug {
            debug!(
                "Fetched in-memory store r{} in {:.3}ms",
                resolution,
                started.elapsed().as_secs_f64() * 1000.0
            );
        }

        Ok(store)
    }

    fn load_all_stores_once(&self, debug: bool) -> Result<Arc<StoreMap>, LoadError> {
        if let Some(stores) = self.stores.read().as_ref() {
            return Ok(Arc::clone(stores));
        }

        let _guard = self.load_lock.lock();

        // Another caller may have finished loading while we waited.
        if let Some(stores) = self.stores.read().as_ref() {
            return Ok(Arc::clone(stores));
        }

        let started = Instant::now();
        let mut loaded = StoreMap::new();
        for resolution in SUPPORTED_RESOLUTIONS {
            let store = self.source.load(resolution)?.unwrap_or_default();
            info!("Loaded {} cells for resolution {}", store.len(), resolution);
            loaded.insert(resolution, Arc::new(store));
        }

        let loaded = Arc::new(loaded);
        *self.stores.write() = Some(Arc::clone(&loaded));

        if debug {
            debug!(
                "Loaded all stores into memory in {:.3}ms",
                started.elapsed().as_secs_f64() * 1000.0
            );
        }

        Ok(loaded)
    }

    /// Replace lookups for the given resolutions with fixed tables, or remove
    /// the replacement with `None`. The loaded cache is left untouched.
    pub fn set_stores_for_testing(&self, stores: Option<HashMap<u8, ReverseGeoStore>>) {
        let stores = stores.map(|stores| {
            Arc::new(
                stores
                    .into_iter()
                    .map(|(resolution, store)| (resolution, Arc::new(store)))
                    .collect::<StoreMap>(),
            )
        });
        *self.test_override.write() = stores;
    }

    /// Drop every loaded table so the next lookup reads the source again.
    pub fn clear_store_cache(&self) {
        let _guard = self.load_lock.lock();
        *self.stores.write() = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.stores.read().is_some()
    }

    /// Resolutions currently held in the cache, coarsest first.
    pub fn loaded_resolutions(&self) -> Vec<u8> {
        let mut resolutions: Vec<u8> = self
            .stores
            .read()
            .as_ref()
            .map(|stores| stores.keys().copied().collect())
            .unwrap_or_default();
        resolutions.sort_unstable();
        resolutions
    }
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::from_config(StoreConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LocationDetails;
    use crate::store::FixedSource;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn store_with(cell: &str, city: &str) -> ReverseGeoStore {
        let mut store = ReverseGeoStore::new();
        store.insert(cell.to_string(), LocationDetails::new(city, "Delhi"));
        store
    }

    /// Counts how often each resolution is requested from the source.
    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
    }

    impl StoreSource for CountingSource {
        fn load(&self, _resolution: u8) -> Result<Option<ReverseGeoStore>, LoadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        }
    }

    #[test]
    fn test_loads_all_resolutions_once() {
        let source = Arc::new(CountingSource::default());
        let loader = DataLoader::new(Arc::clone(&source));

        assert!(!loader.is_loaded());
        loader.load_resolution_store(5, false).unwrap();
        loader.load_resolution_store(4, false).unwrap();
        loader.load_resolution_store(6, true).unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), SUPPORTED_RESOLUTIONS.len());
        assert_eq!(loader.loaded_resolutions(), vec![4, 5, 6]);
    }

    #[test]
    fn test_concurrent_first_access_loads_once() {
        let source = Arc::new(CountingSource::default());
        let loader = Arc::new(DataLoader::new(Arc::clone(&source)));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let loader = Arc::clone(&loader);
                std::thread::spawn(move || loader.load_resolution_store(5, false).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(source.calls.load(Ordering::SeqCst), SUPPORTED_RESOLUTIONS.len());
    }

    #[test]
    fn test_unsupported_resolution_is_empty() {
        let loader = DataLoader::new(FixedSource::default().with_store(
            9,
            store_with("8960145b403ffff", "Ignored"),
        ));
        assert!(loader.load_resolution_store(9, false).unwrap().is_empty());
        assert!(loader.load_resolution_store(5, false).unwrap().is_empty());
    }

    #[test]
    fn test_cache_survives_file_changes_until_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reverse_geo_5.json");
        fs::write(&path, r#"{"8560145bfffffff": {"city": "Old", "state": "Delhi"}}"#).unwrap();

        let loader = DataLoader::from_config(StoreConfig::with_data_dir(dir.path()));
        let first = loader.load_resolution_store(5, false).unwrap();
        assert_eq!(first["8560145bfffffff"].city, "Old");

        fs::write(&path, r#"{"8560145bfffffff": {"city": "New", "state": "Delhi"}}"#).unwrap();
        let second = loader.load_resolution_store(5, false).unwrap();
        assert_eq!(second["8560145bfffffff"].city, "Old");

        loader.clear_store_cache();
        assert!(!loader.is_loaded());
        let third = loader.load_resolution_store(5, false).unwrap();
        assert_eq!(third["8560145bfffffff"].city, "New");
    }

    #[test]
    fn test_corrupt_file_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reverse_geo_4.json");
        fs::write(&path, "[1, 2").unwrap();

        let loader = DataLoader::from_config(StoreConfig::with_data_dir(dir.path()));
        let err = loader.load_resolution_store(5, false).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        assert!(!loader.is_loaded());

        fs::write(&path, "{}").unwrap();
        assert!(loader.load_resolution_store(5, false).unwrap().is_empty());
        assert!(loader.is_loaded());
    }

    #[test]
    fn test_override_bypasses_cache() {
        let loader = DataLoader::new(
            FixedSource::default().with_store(5, store_with("8560145bfffffff", "Real")),
        );

        let mut stores = HashMap::new();
        stores.insert(5, store_with("8560145bfffffff", "Override"));
        loader.set_stores_for_testing(Some(stores));

        let store = loader.load_resolution_store(5, false).unwrap();
        assert_eq!(store["8560145bfffffff"].city, "Override");
        assert!(!loader.is_loaded());

        // Resolutions missing from the override still come from the source.
        assert!(loader.load_resolution_store(4, false).unwrap().is_empty());
        assert!(loader.is_loaded());

        loader.set_stores_for_testing(None);
        let store = loader.load_resolution_store(5, false).unwrap();
        assert_eq!(store["8560145bfffffff"].city, "Real");
    }
}
