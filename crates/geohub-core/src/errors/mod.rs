//! Error taxonomy shared by the catalog and download paths.
//!
//! - `kind` - the `ErrorKind` classification and the `Classify` trait
//! - `status` - HTTP status → kind table
//! - `transport` - errors raised at the transport boundary
//! - `catalog` - catalog client errors
//! - `download` - file downloader errors

mod catalog;
mod download;
mod kind;
mod status;
mod transport;

pub use catalog::CatalogError;
pub use download::DownloadError;
pub use kind::{Classify, ErrorKind};
pub use status::classify_status;
pub use transport::TransportError;

/// Result type alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
