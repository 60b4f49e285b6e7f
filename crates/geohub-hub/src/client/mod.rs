//! Hub client for catalog listings and resource detail.

mod detail;
mod listing;

use std::sync::Arc;
use std::time::Duration;

use geohub_core::{CatalogError, CatalogResult, Transport, TransportRequest};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::HubClientConfig;
use crate::error::HubSetupError;
use crate::transport::ReqwestTransport;

// ============================================================================
// Type Aliases
// ============================================================================

/// Hub client over a shared reqwest transport.
pub type DefaultHubClient = HubClient<Arc<ReqwestTransport>>;

// ============================================================================
// Client
// ============================================================================

/// Validated settings the client runs with.
#[derive(Debug, Clone)]
pub(crate) struct HubConfig {
    pub(crate) base_url: Url,
    pub(crate) page_size: u32,
    pub(crate) timeout: Duration,
    pub(crate) max_body_bytes: usize,
}

impl HubConfig {
    fn from_public(config: &HubClientConfig) -> Result<Self, HubSetupError> {
        Ok(Self {
            base_url: config.parsed_base_url()?,
            page_size: config.page_size,
            timeout: config.timeout,
            max_body_bytes: config.max_body_bytes,
        })
    }
}

/// Client for the hub's resource API.
///
/// Generic over the transport so tests can script responses. Use
/// [`DefaultHubClient`] in production and talk to it through
/// `CatalogClientPort`.
pub struct HubClient<T: Transport> {
    pub(crate) transport: T,
    pub(crate) config: HubConfig,
}

impl DefaultHubClient {
    /// Create a client with its own reqwest transport.
    pub fn new(config: &HubClientConfig) -> Result<Self, HubSetupError> {
        let transport = ReqwestTransport::new(&config.user_agent, config.timeout)?;
        Self::with_transport(config, Arc::new(transport))
    }
}

impl<T: Transport> HubClient<T> {
    /// Create a client over an existing transport.
    pub fn with_transport(config: &HubClientConfig, transport: T) -> Result<Self, HubSetupError> {
        Ok(Self {
            transport,
            config: HubConfig::from_public(config)?,
        })
    }

    /// The underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// The resolved base URL.
    pub const fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    /// GET `url` and parse the body as JSON.
    pub(crate) async fn get_json(&self, url: &Url, cancel: &CancellationToken) -> CatalogResult<Value> {
        let request = TransportRequest::get(url.as_str())
            .with_timeout(self.config.timeout)
            .with_header("Accept", "application/json");

        let response = self.transport.execute(request, cancel).await?;
        if !response.is_success() {
            tracing::debug!(url = %url, status = response.status, "Hub returned error status");
            return Err(CatalogError::from_status(response.status, url.as_str()));
        }

        let body = response.read_to_end(self.config.max_body_bytes).await?;
        serde_json::from_slice(&body)
            .map_err(|e| CatalogError::malformed(format!("invalid JSON from {url}: {e}")))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use geohub_core::ErrorKind;
    use geohub_core::ports::testing::{ScriptedResponse, ScriptedTransport};

    pub const BASE: &str = "https://hub.example/api/v1/resources/";
    pub const FIRST_PAGE: &str = "https://hub.example/api/v1/resources/?format=json&limit=1000";

    pub fn client(transport: ScriptedTransport) -> HubClient<ScriptedTransport> {
        HubClient::with_transport(&HubClientConfig::new().with_base_url(BASE), transport).unwrap()
    }

    pub fn record_json(id: &str, name: &str) -> Value {
        serde_json::json!({
            "uuid": id,
            "name": name,
            "resource_type": "Style",
            "creator": "tester",
            "file": format!("https://hub.example/media/{id}.xml"),
        })
    }

    #[test]
    fn default_client_creation() {
        let client = DefaultHubClient::new(&HubClientConfig::new()).unwrap();
        assert_eq!(client.base_url().as_str(), crate::DEFAULT_BASE_URL);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = HubClient::with_transport(
            &HubClientConfig::new().with_base_url("::"),
            ScriptedTransport::new(),
        );
        assert!(matches!(result, Err(HubSetupError::InvalidBaseUrl { .. })));
    }

    #[tokio::test]
    async fn oversized_body_is_malformed() {
        let transport = ScriptedTransport::new().on(BASE, ScriptedResponse::json("[1,2,3]"));
        let client = HubClient::with_transport(
            &HubClientConfig::new().with_base_url(BASE).with_max_body_bytes(3),
            transport,
        )
        .unwrap();
        let err = client
            .get_json(&Url::parse(BASE).unwrap(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn parses_json_body() {
        let transport = ScriptedTransport::new().on(BASE, ScriptedResponse::json(r#"{"ok":true}"#));
        let client = client(transport);
        let value = client
            .get_json(&Url::parse(BASE).unwrap(), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(value["ok"], serde_json::json!(true));
        assert_eq!(client.transport().requests(), [BASE]);
    }
}
