//! Sync orchestration.
//!
//! A sync pass walks every catalog page, then publishes the collected records
//! to the [`ResourceCache`] in a single swap. Failure or cancellation leaves
//! the cache exactly as it was before the pass started.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::pages::PageWalker;
use crate::cache::{CatalogStore, ResourceCache};
use crate::errors::{CatalogError, Classify, ErrorKind};
use crate::ports::CatalogClientPort;

// ─────────────────────────────────────────────────────────────────────────────
// Status Types
// ─────────────────────────────────────────────────────────────────────────────

/// Sync state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    /// No pass has run yet.
    #[default]
    Idle,
    /// A pass is fetching pages.
    Syncing,
    /// The last pass published a new snapshot.
    Completed,
    /// The last pass failed; the cache is unchanged.
    Failed,
    /// The last pass was cancelled; the cache is unchanged.
    Cancelled,
}

impl SyncState {
    /// Whether this is a terminal state of a pass.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

/// Progress of the current or most recent sync pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    /// Current state.
    pub state: SyncState,
    /// Pages received in this pass.
    pub pages_fetched: usize,
    /// Well-formed records received in this pass (before de-duplication).
    pub records_fetched: usize,
    /// Malformed records dropped in this pass.
    pub records_dropped: usize,
    /// Total record count reported by the hub.
    pub total_hint: Option<u64>,
    /// Failure kind when `state` is `Failed` or `Cancelled`.
    pub error: Option<ErrorKind>,
    /// Catalog version published by the last completed pass.
    pub sync_version: u64,
}

/// Summary of a completed sync pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Version of the published snapshot.
    pub sync_version: u64,
    /// Distinct records in the published snapshot.
    pub records: usize,
    /// Pages fetched.
    pub pages: usize,
    /// Malformed records dropped.
    pub dropped: usize,
    /// Wall-clock duration of the pass.
    pub duration: Duration,
    /// Whether the snapshot was written to the attached store.
    pub persisted: bool,
}

/// How `load_or_sync` obtained its catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The cache already held a synced catalog.
    InMemory {
        /// Records in the cache
        records: usize,
    },
    /// A persisted catalog was restored from disk.
    Restored {
        /// Records restored
        records: usize,
        /// Version of the restored snapshot
        sync_version: u64,
        /// When the restored snapshot was synced
        last_synced_at: Option<DateTime<Utc>>,
    },
    /// A fresh sync pass ran.
    Synced(SyncReport),
}

/// Errors from a sync pass.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    /// Another pass is in flight.
    #[error("A catalog sync is already in progress")]
    AlreadySyncing,

    /// The pass was cancelled.
    #[error("Catalog sync cancelled")]
    Cancelled,

    /// A page request failed.
    #[error(transparent)]
    Catalog(CatalogError),
}

impl From<CatalogError> for SyncError {
    fn from(err: CatalogError) -> Self {
        if err.is_cancelled() {
            Self::Cancelled
        } else {
            Self::Catalog(err)
        }
    }
}

impl Classify for SyncError {
    fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::AlreadySyncing => None,
            Self::Cancelled => Some(ErrorKind::Cancelled),
            Self::Catalog(e) => Some(e.kind()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ─────────────────────────────────────────────────────────────────────────────

/// Coordinates sync passes between a catalog client and a cache.
///
/// Owns the sync state machine. At most one pass runs at a time; a second
/// `start_sync` while one is in flight is rejected immediately.
pub struct SyncOrchestrator {
    client: Arc<dyn CatalogClientPort>,
    cache: ResourceCache,
    store: Option<CatalogStore>,
    in_flight: AtomicBool,
    status: watch::Sender<SyncStatus>,
}

impl SyncOrchestrator {
    /// Create an orchestrator publishing into `cache`.
    pub fn new(client: Arc<dyn CatalogClientPort>, cache: ResourceCache) -> Self {
        let (status, _) = watch::channel(SyncStatus {
            sync_version: cache.sync_version(),
            ..SyncStatus::default()
        });
        Self {
            client,
            cache,
            store: None,
            in_flight: AtomicBool::new(false),
            status,
        }
    }

    /// Persist every completed pass to `store`, and restore from it in
    /// [`load_or_sync`](Self::load_or_sync).
    #[must_use]
    pub fn with_store(mut self, store: CatalogStore) -> Self {
        self.store = Some(store);
        self
    }

    /// The cache this orchestrator publishes to.
    #[must_use]
    pub const fn cache(&self) -> &ResourceCache {
        &self.cache
    }

    /// Observe status changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.status.subscribe()
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> SyncStatus {
        self.status.borrow().clone()
    }

    /// Whether a pass is in flight.
    #[must_use]
    pub fn is_syncing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run one full sync pass.
    ///
    /// # Errors
    ///
    /// - [`SyncError::AlreadySyncing`] if a pass is already running
    /// - [`SyncError::Cancelled`] if `cancel` fires before the snapshot is
    ///   published
    /// - [`SyncError::Catalog`] with the failing page's error otherwise
    pub async fn start_sync(&self, cancel: &CancellationToken) -> Result<SyncReport, SyncError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("Rejected sync request: a sync is already in progress");
            return Err(SyncError::AlreadySyncing);
        }
        let mut guard = InFlightGuard {
            flag: &self.in_flight,
            status: &self.status,
            finished: false,
        };

        let previous_version = self.cache.sync_version();
        self.status.send_replace(SyncStatus {
            state: SyncState::Syncing,
            sync_version: previous_version,
            ..SyncStatus::default()
        });
        tracing::info!(sync_version = previous_version, "Catalog sync started");

        let started = Instant::now();
        let result = self.run_pass(cancel, started).await;

        match &result {
            Ok(report) => {
                self.status.send_modify(|s| {
                    s.state = SyncState::Completed;
                    s.error = None;
                    s.sync_version = report.sync_version;
                });
                tracing::info!(
                    records = report.records,
                    pages = report.pages,
                    dropped = report.dropped,
                    sync_version = report.sync_version,
                    elapsed_ms = report.duration.as_millis(),
                    "Catalog sync completed"
                );
            }
            Err(SyncError::Cancelled) => {
                self.status.send_modify(|s| {
                    s.state = SyncState::Cancelled;
                    s.error = Some(ErrorKind::Cancelled);
                });
                tracing::info!("Catalog sync cancelled; cache unchanged");
            }
            Err(e) => {
                let kind = e.error_kind();
                self.status.send_modify(|s| {
                    s.state = SyncState::Failed;
                    s.error = kind;
                });
                tracing::warn!(error = %e, "Catalog sync failed; cache unchanged");
            }
        }

        guard.finished = true;
        result
    }

    async fn run_pass(
        &self,
        cancel: &CancellationToken,
        started: Instant,
    ) -> Result<SyncReport, SyncError> {
        let mut walker = PageWalker::new(self.client.as_ref(), cancel);
        let mut records = Vec::new();
        let mut dropped = 0;

        while let Some(page) = walker.next_page().await {
            let page = page?;
            dropped += page.dropped;
            records.extend(page.records);

            let pages = walker.pages_fetched();
            let fetched = records.len();
            self.status.send_modify(|s| {
                s.pages_fetched = pages;
                s.records_fetched = fetched;
                s.records_dropped = dropped;
                if page.total_hint.is_some() {
                    s.total_hint = page.total_hint;
                }
            });
            tracing::debug!(page = pages, records = fetched, "Fetched catalog page");
        }

        // Last chance to abandon the pass before publishing.
        if cancel.is_cancelled() {
            return Err(SyncError::Cancelled);
        }

        let pages = walker.pages_fetched();
        let snapshot = self.cache.replace(records);

        let persisted = match &self.store {
            Some(store) => match store.save(&snapshot).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to persist catalog snapshot");
                    false
                }
            },
            None => false,
        };

        Ok(SyncReport {
            sync_version: snapshot.sync_version,
            records: snapshot.len(),
            pages,
            dropped,
            duration: started.elapsed(),
            persisted,
        })
    }

    /// Use an existing catalog when possible, otherwise sync.
    ///
    /// With `force_refresh` unset, an already-synced cache is reused, then a
    /// persisted catalog from the attached store. An unreadable store file is
    /// logged and treated as absent.
    ///
    /// # Errors
    ///
    /// Same as [`start_sync`](Self::start_sync) when a sync pass runs.
    pub async fn load_or_sync(
        &self,
        force_refresh: bool,
        cancel: &CancellationToken,
    ) -> Result<LoadOutcome, SyncError> {
        if !force_refresh {
            let snapshot = self.cache.snapshot();
            if snapshot.sync_version > 0 || !snapshot.is_empty() {
                return Ok(LoadOutcome::InMemory {
                    records: snapshot.len(),
                });
            }

            if let Some(store) = &self.store {
                match store.load().await {
                    Ok(Some(catalog)) => {
                        let restored = self.cache.restore(catalog);
                        self.status.send_modify(|s| s.sync_version = restored.sync_version);
                        tracing::info!(
                            records = restored.len(),
                            sync_version = restored.sync_version,
                            "Restored catalog from disk"
                        );
                        return Ok(LoadOutcome::Restored {
                            records: restored.len(),
                            sync_version: restored.sync_version,
                            last_synced_at: restored.last_synced_at,
                        });
                    }
                    Ok(None) => {
                        tracing::debug!("No persisted catalog; syncing");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Ignoring unreadable catalog cache");
                    }
                }
            }
        }

        self.start_sync(cancel).await.map(LoadOutcome::Synced)
    }
}

/// Clears the in-flight flag even if the sync future is dropped mid-pass.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
    status: &'a watch::Sender<SyncStatus>,
    finished: bool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.status.send_modify(|s| {
                s.state = SyncState::Cancelled;
                s.error = Some(ErrorKind::Cancelled);
            });
        }
        self.flag.store(false, Ordering::Release);
    }
}
