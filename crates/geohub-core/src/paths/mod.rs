//! Data directory layout.
//!
//! Everything geohub writes lives under one data root:
//!
//! ```text
//! <root>/catalog.json   persisted catalog snapshot
//! <root>/thumbnails/    cached preview images
//! <root>/downloads/     default download destination
//! ```
//!
//! The root is `GEOHUB_DATA_DIR` when set, otherwise the platform data
//! directory joined with `geohub`.

mod ensure;
mod error;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub use ensure::{ensure_directory, verify_writable};
pub use error::PathError;

/// Environment variable overriding the data root.
pub const DATA_DIR_ENV: &str = "GEOHUB_DATA_DIR";

const APP_DIR: &str = "geohub";
const CATALOG_FILE: &str = "catalog.json";
const THUMBNAILS_DIR: &str = "thumbnails";
const DOWNLOADS_DIR: &str = "downloads";

/// Resolve the data root from an explicit override value.
///
/// Pure: the caller supplies the environment value, so this can be tested
/// without touching process state. Empty values are ignored.
pub fn data_root_from(env_value: Option<OsString>) -> Result<PathBuf, PathError> {
    if let Some(value) = env_value
        && !value.is_empty()
    {
        return Ok(PathBuf::from(value));
    }
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or(PathError::NoDataDir)
}

/// Resolve the data root from the environment.
pub fn data_root() -> Result<PathBuf, PathError> {
    data_root_from(std::env::var_os(DATA_DIR_ENV))
}

/// Resolved locations under a data root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    /// The data root itself.
    pub root: PathBuf,
    /// Persisted catalog file.
    pub catalog_file: PathBuf,
    /// Thumbnail cache directory.
    pub thumbnails_dir: PathBuf,
    /// Default download directory.
    pub downloads_dir: PathBuf,
}

impl DataPaths {
    /// Lay out the standard locations under `root`.
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            catalog_file: root.join(CATALOG_FILE),
            thumbnails_dir: root.join(THUMBNAILS_DIR),
            downloads_dir: root.join(DOWNLOADS_DIR),
            root,
        }
    }

    /// Resolve from the environment.
    pub fn resolve() -> Result<Self, PathError> {
        data_root().map(Self::from_root)
    }

    /// The data root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_value_wins() {
        let root = data_root_from(Some(OsString::from("/tmp/geohub-test"))).unwrap();
        assert_eq!(root, PathBuf::from("/tmp/geohub-test"));
    }

    #[test]
    fn empty_env_value_is_ignored() {
        // Falls through to the platform directory, which may be absent in
        // minimal containers.
        match data_root_from(Some(OsString::new())) {
            Ok(root) => assert!(root.ends_with(APP_DIR)),
            Err(e) => assert!(matches!(e, PathError::NoDataDir)),
        }
    }

    #[test]
    fn layout_under_root() {
        let paths = DataPaths::from_root("/data/geohub");
        assert_eq!(paths.catalog_file, PathBuf::from("/data/geohub/catalog.json"));
        assert_eq!(paths.thumbnails_dir, PathBuf::from("/data/geohub/thumbnails"));
        assert_eq!(paths.downloads_dir, PathBuf::from("/data/geohub/downloads"));
        assert_eq!(paths.root(), Path::new("/data/geohub"));
    }
}
