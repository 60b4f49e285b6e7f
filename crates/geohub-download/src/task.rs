//! Download task lifecycle and terminal results.

use std::fmt;
use std::path::{Path, PathBuf};

use geohub_core::{DownloadError, ErrorKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a download.
///
/// `Pending -> InProgress -> Succeeded | Failed | Cancelled`. A task may also
/// fail or be cancelled straight from `Pending` when no response arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadState {
    Pending,
    InProgress,
    Succeeded,
    Failed,
    Cancelled,
}

impl DownloadState {
    /// Whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for DownloadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One in-flight download, owned by the downloader for its duration.
#[derive(Debug, Clone)]
pub struct DownloadTask {
    id: Uuid,
    url: String,
    destination: PathBuf,
    bytes_total: Option<u64>,
    bytes_transferred: u64,
    state: DownloadState,
}

impl DownloadTask {
    pub(crate) fn new(url: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            destination: destination.into(),
            bytes_total: None,
            bytes_transferred: 0,
            state: DownloadState::Pending,
        }
    }

    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    #[must_use]
    pub const fn bytes_total(&self) -> Option<u64> {
        self.bytes_total
    }

    #[must_use]
    pub const fn bytes_transferred(&self) -> u64 {
        self.bytes_transferred
    }

    #[must_use]
    pub const fn state(&self) -> DownloadState {
        self.state
    }

    /// Response headers arrived; the body is about to stream.
    pub(crate) const fn start(&mut self, bytes_total: Option<u64>) {
        self.bytes_total = bytes_total;
        self.state = DownloadState::InProgress;
    }

    /// Record `n` more bytes on disk.
    pub(crate) const fn advance(&mut self, n: u64) {
        self.bytes_transferred = self.bytes_transferred.saturating_add(n);
    }

    /// Consume the task into its terminal result.
    pub(crate) fn finish(self, outcome: Result<PathBuf, DownloadError>) -> DownloadResult {
        let (state, error, final_path) = match outcome {
            Ok(path) => (DownloadState::Succeeded, None, Some(path)),
            Err(err) if err.is_cancelled() => (DownloadState::Cancelled, Some(err), None),
            Err(err) => (DownloadState::Failed, Some(err), None),
        };
        DownloadResult {
            task_id: self.id,
            state,
            error,
            final_path,
            bytes_transferred: self.bytes_transferred,
            bytes_total: self.bytes_total,
        }
    }
}

/// Terminal outcome of a download.
///
/// `final_path` is set only on success; `error` only on failure or
/// cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadResult {
    pub task_id: Uuid,
    pub state: DownloadState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<DownloadError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_path: Option<PathBuf>,
    pub bytes_transferred: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_total: Option<u64>,
}

impl DownloadResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.state == DownloadState::Succeeded
    }

    /// Failure class, if the download did not succeed.
    #[must_use]
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(DownloadError::kind)
    }

    /// Convert into a `Result` for `?`-style callers.
    ///
    /// # Errors
    ///
    /// Returns the download error for failed or cancelled downloads.
    pub fn into_result(self) -> Result<PathBuf, DownloadError> {
        match (self.error, self.final_path) {
            (Some(err), _) => Err(err),
            (None, Some(path)) => Ok(path),
            (None, None) => Err(DownloadError::new(
                ErrorKind::Storage,
                "download finished without a file",
            )),
        }
    }
}
