//! Setup errors for the hub adapters.
//!
//! Request-time failures use the core taxonomy (`CatalogError`,
//! `TransportError`); this type only covers construction.

use thiserror::Error;

/// Errors building a hub client or transport.
#[derive(Debug, Error)]
pub enum HubSetupError {
    /// The base URL does not parse.
    #[error("Invalid hub URL '{url}': {source}")]
    InvalidBaseUrl {
        /// The configured URL
        url: String,
        /// Parser error
        #[source]
        source: url::ParseError,
    },

    /// The base URL is not http or https.
    #[error("Hub URL '{url}' must use http or https")]
    UnsupportedScheme {
        /// The configured URL
        url: String,
    },

    /// The HTTP client could not be constructed.
    #[error("Failed to initialize HTTP client: {0}")]
    Transport(String),
}
