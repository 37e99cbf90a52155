use std::path::PathBuf;

/// Failure to read a lookup table that exists on disk.
///
/// A missing table is not an error; it loads as an empty table.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read reverse geo store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed reverse geo store {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
