//! On-disk thumbnail cache.

use std::path::{Path, PathBuf};

use geohub_core::{ResourceRecord, Transport};
use tokio_util::sync::CancellationToken;

use crate::downloader::{FileDownloader, no_progress};

/// File name of the hub's generic placeholder icon.
pub const PLACEHOLDER_ICON: &str = "qgis-icon-32x32.png";

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "svg", "gif"];

/// Keeps one thumbnail per record id under a directory.
///
/// Lookups that cannot produce an image return `None`; callers show their own
/// default icon.
#[derive(Debug, Clone)]
pub struct ThumbnailCache<T: Transport> {
    downloader: FileDownloader<T>,
    directory: PathBuf,
}

impl<T: Transport> ThumbnailCache<T> {
    pub fn new(downloader: FileDownloader<T>, directory: impl Into<PathBuf>) -> Self {
        Self {
            downloader,
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Where the thumbnail for `record` lives, if it has a usable one.
    #[must_use]
    pub fn path_for(&self, record: &ResourceRecord) -> Option<PathBuf> {
        let url = usable_url(record)?;
        Some(
            self.directory
                .join(format!("{}.{}", safe_id(&record.id), extension(url))),
        )
    }

    /// Return the cached thumbnail, downloading it first if needed.
    pub async fn fetch(
        &self,
        record: &ResourceRecord,
        cancel: &CancellationToken,
    ) -> Option<PathBuf> {
        let url = usable_url(record)?;
        let path = self.path_for(record)?;

        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::trace!(id = %record.id, path = %path.display(), "Thumbnail cache hit");
            return Some(path);
        }

        let result = self
            .downloader
            .download(url, &path, &no_progress, cancel)
            .await;
        match result.into_result() {
            Ok(path) => Some(path),
            Err(err) => {
                tracing::debug!(id = %record.id, kind = %err.kind(), "Thumbnail unavailable");
                None
            }
        }
    }
}

fn usable_url(record: &ResourceRecord) -> Option<&str> {
    let url = record.thumbnail_url.as_deref()?.trim();
    if url.is_empty() || last_segment(url) == PLACEHOLDER_ICON {
        return None;
    }
    Some(url)
}

fn last_segment(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    path.rsplit('/').next().unwrap_or_default()
}

fn extension(url: &str) -> String {
    last_segment(url)
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or_else(|| "png".to_string())
}

fn safe_id(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
