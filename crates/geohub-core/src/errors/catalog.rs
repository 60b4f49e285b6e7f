//! Catalog client errors.

use thiserror::Error;

use super::kind::{Classify, ErrorKind};
use super::status::classify_status;
use super::transport::TransportError;

/// Errors from catalog listing and detail requests.
///
/// Variants mirror the shared taxonomy; use [`CatalogError::kind`] to branch
/// on the failure class.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Connection refused, DNS failure or socket error.
    #[error("Network unreachable: {message}")]
    NetworkUnreachable {
        /// Underlying cause
        message: String,
    },

    /// The hub rejected the request.
    #[error("Hub rejected request with status {status}: {url}")]
    RequestRejected {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// The hub is overloaded.
    #[error("Hub is busy (status {status}): {url}")]
    ServerBusy {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// Server error, timeout or unexpected transport failure.
    #[error("Hub unreachable: {message}")]
    ServerUnreachable {
        /// Description of the failure
        message: String,
    },

    /// The listing or resource does not exist.
    #[error("Not found on hub: {url}")]
    ResourceNotFound {
        /// The URL that was requested
        url: String,
    },

    /// The request was cancelled locally.
    #[error("Catalog request cancelled")]
    Cancelled,

    /// The hub response could not be parsed.
    #[error("Malformed hub response: {message}")]
    MalformedResponse {
        /// What was wrong with the payload
        message: String,
    },

    /// A transport failure with no HTTP status behind it, such as a request
    /// the client library refused to build. Keeps the transport's kind.
    #[error("Hub request failed: {0}")]
    Transport(TransportError),
}

impl CatalogError {
    /// Build the error for a non-success HTTP status.
    ///
    /// Callers only reach this for statuses that [`classify_status`] rejects;
    /// a 2xx here is reported as an unexpected server failure.
    pub fn from_status(status: u16, url: impl Into<String>) -> Self {
        let url = url.into();
        match classify_status(status) {
            Some(ErrorKind::ResourceNotFound) => Self::ResourceNotFound { url },
            Some(ErrorKind::ServerBusy) => Self::ServerBusy { status, url },
            Some(ErrorKind::RequestRejected) => Self::RequestRejected { status, url },
            _ => Self::ServerUnreachable {
                message: format!("status {status} from {url}"),
            },
        }
    }

    /// Build a malformed-response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Taxonomy kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NetworkUnreachable { .. } => ErrorKind::NetworkUnreachable,
            Self::RequestRejected { .. } => ErrorKind::RequestRejected,
            Self::ServerBusy { .. } => ErrorKind::ServerBusy,
            Self::ServerUnreachable { .. } => ErrorKind::ServerUnreachable,
            Self::ResourceNotFound { .. } => ErrorKind::ResourceNotFound,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Self::Transport(err) => err.kind(),
        }
    }

    /// Check if this is a cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<TransportError> for CatalogError {
    fn from(err: TransportError) -> Self {
        match err.kind() {
            ErrorKind::NetworkUnreachable => Self::NetworkUnreachable {
                message: err.message().to_string(),
            },
            ErrorKind::Cancelled => Self::Cancelled,
            ErrorKind::ServerUnreachable => Self::ServerUnreachable {
                message: err.message().to_string(),
            },
            ErrorKind::MalformedResponse => Self::MalformedResponse {
                message: err.message().to_string(),
            },
            ErrorKind::RequestRejected
            | ErrorKind::ServerBusy
            | ErrorKind::ResourceNotFound
            | ErrorKind::Storage => Self::Transport(err),
        }
    }
}

impl Classify for CatalogError {
    fn error_kind(&self) -> Option<ErrorKind> {
        Some(self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_status_follows_shared_table() {
        let url = "https://hub.example/api/v1/resources/";
        assert_eq!(
            CatalogError::from_status(404, url).kind(),
            ErrorKind::ResourceNotFound
        );
        assert_eq!(
            CatalogError::from_status(503, url).kind(),
            ErrorKind::ServerBusy
        );
        assert_eq!(
            CatalogError::from_status(500, url).kind(),
            ErrorKind::ServerUnreachable
        );
        assert_eq!(
            CatalogError::from_status(400, url).kind(),
            ErrorKind::RequestRejected
        );
    }

    #[test]
    fn transport_errors_keep_their_class() {
        let err: CatalogError = TransportError::network_unreachable("dns").into();
        assert_eq!(err.kind(), ErrorKind::NetworkUnreachable);

        let err: CatalogError = TransportError::cancelled().into();
        assert!(err.is_cancelled());

        let err: CatalogError = TransportError::server_unreachable("timed out").into();
        assert_eq!(err.kind(), ErrorKind::ServerUnreachable);
        assert!(err.to_string().contains("timed out"));

        let err: CatalogError = TransportError::malformed("bad gzip").into();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn statusless_transport_errors_are_not_widened() {
        for kind in [
            ErrorKind::RequestRejected,
            ErrorKind::ServerBusy,
            ErrorKind::ResourceNotFound,
            ErrorKind::Storage,
        ] {
            let err: CatalogError = TransportError::new(kind, "builder error").into();
            assert_eq!(err.kind(), kind);
            assert_eq!(err.kind().is_retryable(), kind.is_retryable());
            assert!(err.to_string().contains("builder error"));
        }

        let rejected: CatalogError =
            TransportError::new(ErrorKind::RequestRejected, "unsupported scheme").into();
        assert!(!rejected.kind().is_retryable());
    }

    #[test]
    fn error_message_mentions_url() {
        let err = CatalogError::from_status(429, "https://hub.example/x");
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("hub.example"));
    }
}
