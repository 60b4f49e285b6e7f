//! Transport-level error.
//!
//! Transport adapters translate their HTTP library's errors into this type so
//! nothing above the transport boundary sees library-specific errors.

use thiserror::Error;

use super::kind::{Classify, ErrorKind};

/// A failure while executing a request or reading its body.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct TransportError {
    kind: ErrorKind,
    message: String,
}

impl TransportError {
    /// Create an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The request or body read was cancelled locally.
    #[must_use]
    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "request cancelled")
    }

    /// Connection refused, DNS failure, socket error.
    pub fn network_unreachable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NetworkUnreachable, message)
    }

    /// Timeout or unexpected failure after the connection was established.
    pub fn server_unreachable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServerUnreachable, message)
    }

    /// The response could not be read as expected.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedResponse, message)
    }

    /// Taxonomy kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Human-readable detail.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether this is a local cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.kind == ErrorKind::Cancelled
    }
}

impl Classify for TransportError {
    fn error_kind(&self) -> Option<ErrorKind> {
        Some(self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let err = TransportError::network_unreachable("connection refused");
        assert_eq!(err.to_string(), "network_unreachable: connection refused");
        assert_eq!(err.kind(), ErrorKind::NetworkUnreachable);
    }

    #[test]
    fn cancelled_is_flagged() {
        assert!(TransportError::cancelled().is_cancelled());
        assert!(!TransportError::malformed("bad").is_cancelled());
    }
}
