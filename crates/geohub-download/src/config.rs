//! Downloader configuration.

use std::time::Duration;

/// Default write/progress granularity.
pub const DEFAULT_CHUNK_SIZE: usize = 256 * 1024;

/// Settings for [`FileDownloader`](crate::FileDownloader).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadConfig {
    pub(crate) chunk_size: usize,
    pub(crate) request_timeout: Duration,
    pub(crate) read_timeout: Duration,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            request_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_secs(60),
        }
    }
}

impl DownloadConfig {
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written (and reported) per progress step. Clamped to at least 1.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Time allowed until the response headers arrive.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Longest wait for any single body chunk.
    #[must_use]
    pub const fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    #[must_use]
    pub const fn read_timeout(&self) -> Duration {
        self.read_timeout
    }
}
