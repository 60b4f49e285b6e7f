//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the core expects from infrastructure. They use
//! only domain types; no HTTP library types cross this boundary.

pub mod catalog_client;
pub mod transport;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use catalog_client::CatalogClientPort;
pub use transport::{
    ResponseBody, ResponseHeaders, Transport, TransportRequest, TransportResponse,
};
