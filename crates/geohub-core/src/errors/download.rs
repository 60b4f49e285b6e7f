//! Download error type.
//!
//! Serializable so it can travel to UI adapters alongside progress events.
//! I/O errors are captured as strings instead of `std::io::Error`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::kind::{Classify, ErrorKind};
use super::status::classify_status;
use super::transport::TransportError;

/// Terminal failure of a file download.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct DownloadError {
    /// Failure class.
    pub kind: ErrorKind,
    /// Detailed error message.
    pub message: String,
    /// HTTP status code if the failure came from a response status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl DownloadError {
    /// Create an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    /// Error for a non-success HTTP status.
    pub fn from_status(status: u16, url: &str) -> Self {
        let kind = classify_status(status).unwrap_or(ErrorKind::ServerUnreachable);
        Self {
            kind,
            message: format!("HTTP {status} for {url}"),
            status: Some(status),
        }
    }

    /// The download was cancelled locally.
    #[must_use]
    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "download cancelled")
    }

    /// A local filesystem operation failed.
    #[must_use]
    pub fn storage(operation: &str, err: &std::io::Error) -> Self {
        Self::new(ErrorKind::Storage, format!("{operation}: {err}"))
    }

    /// The body ended before (or after) the advertised length.
    #[must_use]
    pub fn truncated(expected: u64, received: u64) -> Self {
        Self::new(
            ErrorKind::ServerUnreachable,
            format!("body length mismatch: expected {expected} bytes, received {received}"),
        )
    }

    /// Failure class.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Check if this is a cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.kind == ErrorKind::Cancelled
    }

    /// Convert to a user-friendly message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self.status {
            Some(code) => format!("{} (HTTP {code})", self.kind.user_message()),
            None => self.kind.user_message().to_string(),
        }
    }
}

impl From<TransportError> for DownloadError {
    fn from(err: TransportError) -> Self {
        Self::new(err.kind(), err.message())
    }
}

impl Classify for DownloadError {
    fn error_kind(&self) -> Option<ErrorKind> {
        Some(self.kind)
    }
}
