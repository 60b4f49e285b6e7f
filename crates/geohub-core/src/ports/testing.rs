//! Scripted fakes for tests.
//!
//! Enabled with the `test-utils` feature so adapter crates can drive their
//! clients without a network.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use super::catalog_client::CatalogClientPort;
use super::transport::{
    ResponseBody, ResponseHeaders, Transport, TransportRequest, TransportResponse,
};
use crate::domain::{CatalogPage, PageCursor, ResourceRecord};
use crate::errors::{CatalogError, CatalogResult, TransportError};

/// A canned response for one request.
#[derive(Debug, Clone)]
pub struct ScriptedResponse {
    status: u16,
    headers: Vec<(String, String)>,
    chunks: Vec<Bytes>,
    hang_after: Option<usize>,
    fail_after: Option<(usize, TransportError)>,
}

impl ScriptedResponse {
    /// A response with the given status and no body.
    #[must_use]
    pub const fn status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            chunks: Vec::new(),
            hang_after: None,
            fail_after: None,
        }
    }

    /// 200 with a JSON body delivered as one chunk.
    #[must_use]
    pub fn json(body: impl Into<String>) -> Self {
        let body: String = body.into();
        Self::status(200)
            .with_header("content-type", "application/json")
            .with_body(body.into_bytes(), usize::MAX)
    }

    /// 200 with a binary body split into `chunk_size` pieces.
    #[must_use]
    pub fn bytes(data: Vec<u8>, chunk_size: usize) -> Self {
        Self::status(200).with_body(data, chunk_size)
    }

    /// Replace the body, setting `Content-Length`.
    #[must_use]
    pub fn with_body(mut self, data: Vec<u8>, chunk_size: usize) -> Self {
        let len = data.len();
        let data = Bytes::from(data);
        let step = chunk_size.max(1);
        self.chunks = (0..len)
            .step_by(step)
            .map(|start| data.slice(start..len.min(start.saturating_add(step))))
            .collect();
        self.headers.retain(|(k, _)| k != "content-length");
        self.headers
            .push(("content-length".to_string(), len.to_string()));
        self
    }

    /// Add a response header.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .push((name.to_ascii_lowercase(), value.to_string()));
        self
    }

    /// Remove the `Content-Length` header.
    #[must_use]
    pub fn without_content_length(mut self) -> Self {
        self.headers.retain(|(k, _)| k != "content-length");
        self
    }

    /// Stall after `n` chunks until the request is cancelled.
    #[must_use]
    pub const fn hang_after(mut self, n: usize) -> Self {
        self.hang_after = Some(n);
        self
    }

    /// Fail the body read after `n` chunks.
    #[must_use]
    pub fn fail_after(mut self, n: usize, err: TransportError) -> Self {
        self.fail_after = Some((n, err));
        self
    }
}

#[derive(Debug, Clone)]
enum Route {
    Respond(ScriptedResponse),
    Fail(TransportError),
}

/// Transport that serves scripted responses keyed by exact URL.
///
/// Each URL holds a queue; the last entry repeats once the queue drains.
/// Unscripted URLs answer 404.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<Route>>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    /// Create an empty transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `url`.
    #[must_use]
    pub fn on(self, url: &str, response: ScriptedResponse) -> Self {
        self.push(url, Route::Respond(response));
        self
    }

    /// Queue a connection-level failure for `url`.
    #[must_use]
    pub fn fail(self, url: &str, err: TransportError) -> Self {
        self.push(url, Route::Fail(err));
        self
    }

    /// URLs requested so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, url: &str, route: Route) {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(url.to_string())
            .or_default()
            .push_back(route);
    }

    fn next_route(&self, url: &str) -> Option<Route> {
        let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        let queue = routes.get_mut(url)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(
        &self,
        request: TransportRequest,
        cancel: &CancellationToken,
    ) -> Result<TransportResponse, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.url.clone());

        if cancel.is_cancelled() {
            return Err(TransportError::cancelled());
        }

        let scripted = match self.next_route(&request.url) {
            Some(Route::Respond(response)) => response,
            Some(Route::Fail(err)) => return Err(err),
            None => ScriptedResponse::status(404),
        };

        Ok(TransportResponse {
            status: scripted.status,
            headers: ResponseHeaders::from_pairs(scripted.headers),
            body: Box::new(ScriptedBody {
                chunks: scripted.chunks.into(),
                emitted: 0,
                hang_after: scripted.hang_after,
                fail_after: scripted.fail_after,
                cancel: cancel.clone(),
            }),
        })
    }
}

struct ScriptedBody {
    chunks: VecDeque<Bytes>,
    emitted: usize,
    hang_after: Option<usize>,
    fail_after: Option<(usize, TransportError)>,
    cancel: CancellationToken,
}

#[async_trait]
impl ResponseBody for ScriptedBody {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, TransportError> {
        if self.cancel.is_cancelled() {
            return Err(TransportError::cancelled());
        }
        if let Some((n, err)) = &self.fail_after
            && self.emitted >= *n
        {
            return Err(err.clone());
        }
        if self.hang_after.is_some_and(|n| self.emitted >= n) {
            self.cancel.cancelled().await;
            return Err(TransportError::cancelled());
        }
        let chunk = self.chunks.pop_front();
        if chunk.is_some() {
            self.emitted += 1;
        }
        Ok(chunk)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Catalog client
// ─────────────────────────────────────────────────────────────────────────────

/// Catalog client serving scripted pages keyed by cursor token.
///
/// The first page is keyed by `None`. Unknown cursors answer
/// `ResourceNotFound`.
#[derive(Debug, Default)]
pub struct ScriptedCatalogClient {
    pages: Mutex<HashMap<Option<String>, CatalogResult<CatalogPage>>>,
    resources: Mutex<HashMap<String, ResourceRecord>>,
    gate: Option<Arc<Notify>>,
    page_calls: AtomicUsize,
}

impl ScriptedCatalogClient {
    /// Create a client with no pages.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `page` for `cursor`.
    #[must_use]
    pub fn with_page(self, cursor: Option<&str>, page: CatalogPage) -> Self {
        self.script(cursor, Ok(page))
    }

    /// Fail requests for `cursor`.
    #[must_use]
    pub fn with_error(self, cursor: Option<&str>, err: CatalogError) -> Self {
        self.script(cursor, Err(err))
    }

    /// Serve `record` from `fetch_resource`.
    #[must_use]
    pub fn with_resource(self, record: ResourceRecord) -> Self {
        self.resources
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record.id.clone(), record);
        self
    }

    /// Hold every page request until `gate` is notified (or cancelled).
    #[must_use]
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Number of page requests received.
    #[must_use]
    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    fn script(self, cursor: Option<&str>, result: CatalogResult<CatalogPage>) -> Self {
        self.pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(cursor.map(str::to_string), result);
        self
    }
}

#[async_trait]
impl CatalogClientPort for ScriptedCatalogClient {
    async fn fetch_page(
        &self,
        cursor: Option<&PageCursor>,
        cancel: &CancellationToken,
    ) -> CatalogResult<CatalogPage> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(CatalogError::Cancelled),
                () = gate.notified() => {}
            }
        }
        if cancel.is_cancelled() {
            return Err(CatalogError::Cancelled);
        }

        let key = cursor.map(|c| c.as_str().to_string());
        self.pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
            .unwrap_or_else(|| {
                Err(CatalogError::ResourceNotFound {
                    url: key.unwrap_or_default(),
                })
            })
    }

    async fn fetch_resource(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> CatalogResult<ResourceRecord> {
        if cancel.is_cancelled() {
            return Err(CatalogError::Cancelled);
        }
        self.resources
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::ResourceNotFound { url: id.to_string() })
    }
}
