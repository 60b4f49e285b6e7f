//! Reqwest implementation of the core `Transport` port.
//!
//! The request timeout covers everything up to the response headers; each
//! body chunk then has its own idle timeout so large downloads are not cut
//! off by a fixed deadline. Cancelling the token drops the response, which
//! closes the connection.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use geohub_core::{
    ErrorKind, ResponseBody, ResponseHeaders, Transport, TransportError, TransportRequest,
    TransportResponse,
};
use tokio_util::sync::CancellationToken;

use crate::error::HubSetupError;

/// Production transport using reqwest over rustls.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
    read_timeout: Duration,
}

impl ReqwestTransport {
    /// Build a transport with the given user agent and request timeout.
    ///
    /// The idle read timeout defaults to the request timeout.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, HubSetupError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| HubSetupError::Transport(e.to_string()))?;
        Ok(Self::from_client(client, timeout))
    }

    /// Wrap an existing reqwest client.
    #[must_use]
    pub const fn from_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            read_timeout: timeout,
        }
    }

    /// Set the maximum wait for any single body chunk.
    #[must_use]
    pub const fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(
        &self,
        request: TransportRequest,
        cancel: &CancellationToken,
    ) -> Result<TransportResponse, TransportError> {
        let timeout = request.timeout.unwrap_or(self.timeout);
        let mut builder = self.client.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        tracing::debug!(url = %request.url, timeout_ms = timeout.as_millis(), "HTTP GET");

        let sent = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(TransportError::cancelled()),
            sent = tokio::time::timeout(timeout, builder.send()) => sent,
        };

        let response = match sent {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(map_reqwest_error(&e)),
            Err(_) => {
                return Err(TransportError::server_unreachable(format!(
                    "no response from {} within {}s",
                    request.url,
                    timeout.as_secs()
                )));
            }
        };

        let status = response.status().as_u16();
        let headers = ResponseHeaders::from_pairs(response.headers().iter().filter_map(
            |(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            },
        ));

        tracing::debug!(url = %request.url, status, "HTTP response headers received");

        Ok(TransportResponse {
            status,
            headers,
            body: Box::new(ReqwestBody {
                response: Some(response),
                cancel: cancel.clone(),
                read_timeout: self.read_timeout,
            }),
        })
    }
}

/// Streaming body over a live reqwest response.
///
/// `response` becomes `None` once the stream ends, fails, or is cancelled;
/// dropping it releases the connection.
struct ReqwestBody {
    response: Option<reqwest::Response>,
    cancel: CancellationToken,
    read_timeout: Duration,
}

#[async_trait]
impl ResponseBody for ReqwestBody {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, TransportError> {
        let Some(response) = self.response.as_mut() else {
            return Ok(None);
        };

        let read = tokio::select! {
            biased;
            () = self.cancel.cancelled() => None,
            read = tokio::time::timeout(self.read_timeout, response.chunk()) => Some(read),
        };

        match read {
            None => {
                self.response = None;
                Err(TransportError::cancelled())
            }
            Some(Ok(Ok(Some(chunk)))) => Ok(Some(chunk)),
            Some(Ok(Ok(None))) => {
                self.response = None;
                Ok(None)
            }
            Some(Ok(Err(e))) => {
                self.response = None;
                Err(map_reqwest_error(&e))
            }
            Some(Err(_)) => {
                self.response = None;
                Err(TransportError::server_unreachable(format!(
                    "body read stalled for {}s",
                    self.read_timeout.as_secs()
                )))
            }
        }
    }
}

/// Translate a reqwest error into the core taxonomy.
fn map_reqwest_error(err: &reqwest::Error) -> TransportError {
    let kind = if err.is_timeout() {
        ErrorKind::ServerUnreachable
    } else if err.is_builder() {
        ErrorKind::RequestRejected
    } else if err.is_connect() || err.is_request() {
        ErrorKind::NetworkUnreachable
    } else {
        // body, decode, redirect and anything unclassified
        ErrorKind::ServerUnreachable
    };
    TransportError::new(kind, err.to_string())
}
