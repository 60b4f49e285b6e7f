//! Download destination planning and temp files.

use std::path::{Path, PathBuf};

use geohub_core::{DownloadError, ResourceRecord};
use tempfile::TempPath;

/// What to fetch and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Source URL.
    pub url: String,
    /// Final file path.
    pub destination: PathBuf,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            destination: destination.into(),
        }
    }

    /// Plan a download of `record` into `directory`.
    ///
    /// The file name comes from the last segment of the download URL, or the
    /// record id when the URL has none.
    #[must_use]
    pub fn for_record(record: &ResourceRecord, directory: &Path) -> Self {
        Self::new(
            record.download_url.clone(),
            directory.join(record.file_name()),
        )
    }
}

/// Directory that will hold `destination`.
pub(crate) fn parent_dir(destination: &Path) -> &Path {
    destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Create a hidden `.{name}.XXXX.part` file beside `destination`.
///
/// The returned `TempPath` deletes the file when dropped unless it is
/// persisted.
pub(crate) fn create_temp_file(
    destination: &Path,
) -> Result<(tokio::fs::File, TempPath), DownloadError> {
    let name = destination
        .file_name()
        .map_or_else(|| "download".to_string(), |n| n.to_string_lossy().into_owned());

    let temp = tempfile::Builder::new()
        .prefix(&format!(".{name}."))
        .suffix(".part")
        .tempfile_in(parent_dir(destination))
        .map_err(|e| DownloadError::storage("create temp file", &e))?;

    let (file, path) = temp.into_parts();
    Ok((tokio::fs::File::from_std(file), path))
}
