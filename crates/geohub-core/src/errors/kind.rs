//! The failure taxonomy shared by the catalog and download paths.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of every remote or local failure the engine can report.
///
/// Presentation code branches on this instead of on component-specific error
/// types, so each terminal failure maps to one precise user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Connection refused, DNS failure or socket error.
    NetworkUnreachable,
    /// The hub refused the request itself (HTTP 400, 413, other 4xx).
    RequestRejected,
    /// The hub signalled load (HTTP 429, 503, 509).
    ServerBusy,
    /// Other 5xx, timeouts and unexpected transport failures.
    ServerUnreachable,
    /// HTTP 404 / 410.
    ResourceNotFound,
    /// Local cancellation was requested.
    Cancelled,
    /// The hub answered with a payload that could not be understood.
    MalformedResponse,
    /// A local filesystem operation failed (temp file, rename, cache file).
    Storage,
}

impl ErrorKind {
    /// Whether a retry policy may reasonably try the operation again.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::NetworkUnreachable | Self::ServerBusy | Self::ServerUnreachable
        )
    }

    /// Stable snake-case identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NetworkUnreachable => "network_unreachable",
            Self::RequestRejected => "request_rejected",
            Self::ServerBusy => "server_busy",
            Self::ServerUnreachable => "server_unreachable",
            Self::ResourceNotFound => "resource_not_found",
            Self::Cancelled => "cancelled",
            Self::MalformedResponse => "malformed_response",
            Self::Storage => "storage",
        }
    }

    /// Actionable message for end users.
    #[must_use]
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::NetworkUnreachable => {
                "The network is unreachable. Please check your internet connection."
            }
            Self::RequestRejected => {
                "The server rejected the request. Try requesting a smaller resource."
            }
            Self::ServerBusy => {
                "The server is currently busy with other requests. Please try again in a few minutes."
            }
            Self::ServerUnreachable => "The server is unreachable. Please try again later.",
            Self::ResourceNotFound => "The resource was not found on the server.",
            Self::Cancelled => "The operation was cancelled.",
            Self::MalformedResponse => "The hub returned a response that could not be understood.",
            Self::Storage => {
                "The file could not be written. Check that the destination folder is writable."
            }
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that can be placed in the taxonomy.
///
/// Returns `None` for errors that are not about a remote or local operation
/// (for example a rejected concurrent sync request).
pub trait Classify {
    /// The taxonomy kind of this error, if it has one.
    fn error_kind(&self) -> Option<ErrorKind>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_kinds() {
        assert!(ErrorKind::ServerBusy.is_retryable());
        assert!(ErrorKind::ServerUnreachable.is_retryable());
        assert!(ErrorKind::NetworkUnreachable.is_retryable());
        assert!(!ErrorKind::ResourceNotFound.is_retryable());
        assert!(!ErrorKind::RequestRejected.is_retryable());
        assert!(!ErrorKind::Cancelled.is_retryable());
        assert!(!ErrorKind::Storage.is_retryable());
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&ErrorKind::ServerBusy).unwrap();
        assert_eq!(json, "\"server_busy\"");
        assert_eq!(ErrorKind::ResourceNotFound.to_string(), "resource_not_found");
    }

    #[test]
    fn user_messages_are_specific() {
        assert!(ErrorKind::NetworkUnreachable.user_message().contains("internet"));
        assert!(ErrorKind::ServerBusy.user_message().contains("busy"));
        assert_ne!(
            ErrorKind::ServerBusy.user_message(),
            ErrorKind::ServerUnreachable.user_message()
        );
    }
}
