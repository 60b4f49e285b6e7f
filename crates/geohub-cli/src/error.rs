//! CLI error type and exit codes.
//!
//! Library failures are folded into [`CliError`] at the handler boundary so
//! `main` can pick an exit code without knowing every library error.

use geohub_core::{CatalogError, DownloadError, ErrorKind, PathError, SyncError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// A hub, download or storage operation failed.
    #[error("{}", .kind.user_message())]
    Operation {
        kind: ErrorKind,
        #[source]
        detail: Detail,
    },

    /// The id is neither cached nor known to the hub.
    #[error("Resource '{0}' was not found in the catalog")]
    UnknownResource(String),

    /// Another sync holds the catalog.
    #[error("A catalog sync is already running")]
    Busy,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Technical detail behind a user-facing message.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct Detail(String);

impl CliError {
    pub fn operation(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self::Operation {
            kind,
            detail: Detail(detail.into()),
        }
    }

    /// Map to an exit code (sysexits.h where one fits).
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Operation { kind, .. } => match kind {
                ErrorKind::NetworkUnreachable
                | ErrorKind::ServerBusy
                | ErrorKind::ServerUnreachable => 69, // EX_UNAVAILABLE
                ErrorKind::RequestRejected | ErrorKind::MalformedResponse => 76, // EX_PROTOCOL
                ErrorKind::ResourceNotFound => 1,
                ErrorKind::Storage => 74, // EX_IOERR
                ErrorKind::Cancelled => 130,
            },
            Self::UnknownResource(_) => 1,
            Self::Busy => 75, // EX_TEMPFAIL
            Self::Config(_) => 78, // EX_CONFIG
        }
    }
}

impl From<CatalogError> for CliError {
    fn from(err: CatalogError) -> Self {
        Self::operation(err.kind(), err.to_string())
    }
}

impl From<DownloadError> for CliError {
    fn from(err: DownloadError) -> Self {
        Self::operation(err.kind, err.message)
    }
}

impl From<SyncError> for CliError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::AlreadySyncing => Self::Busy,
            SyncError::Cancelled => Self::operation(ErrorKind::Cancelled, "catalog sync cancelled"),
            SyncError::Catalog(e) => e.into(),
        }
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        Self::operation(ErrorKind::Storage, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_kinds() {
        assert_eq!(CliError::operation(ErrorKind::ServerBusy, "x").exit_code(), 69);
        assert_eq!(CliError::operation(ErrorKind::Storage, "x").exit_code(), 74);
        assert_eq!(CliError::operation(ErrorKind::Cancelled, "x").exit_code(), 130);
        assert_eq!(CliError::Busy.exit_code(), 75);
    }

    #[test]
    fn message_is_user_facing_with_detail_as_source() {
        let err: CliError = DownloadError::from_status(503, "https://hub.example/f").into();
        assert!(err.to_string().contains("busy"));
        let chained = format!("{:#}", anyhow::Error::new(err));
        assert!(chained.contains("HTTP 503"));
    }

    #[test]
    fn cancelled_sync_maps_to_cancelled() {
        let err: CliError = SyncError::Cancelled.into();
        assert!(matches!(
            err,
            CliError::Operation {
                kind: ErrorKind::Cancelled,
                ..
            }
        ));
    }
}
