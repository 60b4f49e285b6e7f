#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod client;
mod config;
mod error;
mod parsing;
mod port;
mod transport;
mod url;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::{DefaultHubClient, HubClient};

// Configuration
pub use config::{DEFAULT_BASE_URL, HubClientConfig};

// Errors
pub use error::HubSetupError;

// Transport
pub use transport::ReqwestTransport;

// Record parsing, exposed for adapters that read hub JSON from other sources
pub use parsing::{RecordError, parse_record};
