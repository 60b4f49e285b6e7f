//! HTTP transport port.
//!
//! The transport executes a single request and hands back the status and
//! headers before any of the body is read. Body chunks are pulled on demand.
//!
//! # Design
//!
//! - No HTTP library types in any signature
//! - Cancellation is carried by the token passed to `execute`; the returned
//!   body observes the same token, and cancelling it closes the connection
//! - No retry logic lives here

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use tokio_util::sync::CancellationToken;

use crate::errors::TransportError;

/// An outbound GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// Absolute URL.
    pub url: String,
    /// Overrides the transport's default timeout.
    pub timeout: Option<Duration>,
    /// Extra request headers.
    pub headers: Vec<(String, String)>,
}

impl TransportRequest {
    /// GET the given URL.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: None,
            headers: Vec::new(),
        }
    }

    /// Set a per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a request header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Response headers with case-insensitive lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    entries: HashMap<String, String>,
}

impl ResponseHeaders {
    /// Build from name/value pairs; names are lowercased.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v.into()))
            .collect();
        Self { entries }
    }

    /// Look up a header value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Parsed `Content-Length`.
    #[must_use]
    pub fn content_length(&self) -> Option<u64> {
        self.get("content-length")
            .and_then(|v| v.trim().parse().ok())
    }
}

/// A streaming response body.
#[async_trait]
pub trait ResponseBody: Send {
    /// Next chunk of the body, or `None` at end of stream.
    ///
    /// Fails with a `Cancelled` error once the request's token is cancelled.
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, TransportError>;
}

/// Status, headers and a not-yet-read body.
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: ResponseHeaders,
    /// Streaming body.
    pub body: Box<dyn ResponseBody>,
}

impl TransportResponse {
    /// Whether the status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Advertised body length.
    #[must_use]
    pub fn content_length(&self) -> Option<u64> {
        self.headers.content_length()
    }

    /// Read the whole body into memory, failing once it exceeds `limit` bytes.
    ///
    /// # Errors
    ///
    /// Propagates body read errors; an oversized body is `MalformedResponse`.
    pub async fn read_to_end(mut self, limit: usize) -> Result<Bytes, TransportError> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = self.body.next_chunk().await? {
            if buf.len() + chunk.len() > limit {
                return Err(TransportError::malformed(format!(
                    "response body exceeds {limit} bytes"
                )));
            }
            buf.extend_from_slice(&chunk);
        }
        Ok(buf.freeze())
    }
}

impl fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Executes HTTP requests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return once status and headers are available.
    ///
    /// # Errors
    ///
    /// Connection and timeout failures are reported as [`TransportError`];
    /// non-2xx statuses are not errors at this layer.
    async fn execute(
        &self,
        request: TransportRequest,
        cancel: &CancellationToken,
    ) -> Result<TransportResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(
        &self,
        request: TransportRequest,
        cancel: &CancellationToken,
    ) -> Result<TransportResponse, TransportError> {
        (**self).execute(request, cancel).await
    }
}
