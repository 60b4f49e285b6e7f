//! HTTP status classification.
//!
//! Both the downloader and the catalog client talk to the same hub origin, so
//! they share one status → kind table.

use super::kind::ErrorKind;

/// Map an HTTP status code to the failure taxonomy.
///
/// Returns `None` for 2xx responses.
#[must_use]
pub const fn classify_status(status: u16) -> Option<ErrorKind> {
    match status {
        200..=299 => None,
        404 | 410 => Some(ErrorKind::ResourceNotFound),
        429 | 503 | 509 => Some(ErrorKind::ServerBusy),
        // 408 is what the hub sends when a request asked for too much at once
        400 | 408 | 413 | 414 | 431 => Some(ErrorKind::RequestRejected),
        500..=599 => Some(ErrorKind::ServerUnreachable),
        401..=499 => Some(ErrorKind::RequestRejected),
        _ => Some(ErrorKind::ServerUnreachable),
    }
}
