//! On-disk catalog persistence.
//!
//! The catalog is written as a JSON envelope to a sibling temp file and
//! renamed into place, so readers never see a half-written file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Catalog;
use crate::errors::{Classify, ErrorKind};

const FORMAT_VERSION: u32 = 1;

/// Errors from loading or saving the catalog file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("Catalog file {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not a catalog this version understands.
    #[error("Catalog file {path} is unreadable: {message}")]
    Format {
        /// File involved
        path: PathBuf,
        /// What was wrong
        message: String,
    },
}

impl StoreError {
    /// Taxonomy kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Storage
    }
}

impl Classify for StoreError {
    fn error_kind(&self) -> Option<ErrorKind> {
        Some(self.kind())
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    format_version: u32,
    catalog: &'a Catalog,
}

#[derive(Deserialize)]
struct Envelope {
    format_version: u32,
    catalog: Catalog,
}

/// JSON file holding a catalog snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    /// Store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The catalog file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the catalog; `Ok(None)` when no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Format`] for corrupt or foreign files and
    /// [`StoreError::Io`] for other read failures.
    pub async fn load(&self) -> Result<Option<Catalog>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let envelope: Envelope =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::Format {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        if envelope.format_version != FORMAT_VERSION {
            return Err(StoreError::Format {
                path: self.path.clone(),
                message: format!("unsupported format version {}", envelope.format_version),
            });
        }

        tracing::debug!(
            path = %self.path.display(),
            records = envelope.catalog.len(),
            sync_version = envelope.catalog.sync_version,
            "Loaded catalog from disk"
        );
        Ok(Some(envelope.catalog))
    }

    /// Atomically write the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created or the
    /// file cannot be written or renamed.
    pub async fn save(&self, catalog: &Catalog) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let json = serde_json::to_vec_pretty(&EnvelopeRef {
            format_version: FORMAT_VERSION,
            catalog,
        })
        .map_err(|e| StoreError::Format {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        let tmp = self.temp_path();
        if let Err(e) = tokio::fs::write(&tmp, &json).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(io_err(e));
        }
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(io_err(e));
        }

        tracing::debug!(
            path = %self.path.display(),
            records = catalog.len(),
            "Saved catalog to disk"
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
