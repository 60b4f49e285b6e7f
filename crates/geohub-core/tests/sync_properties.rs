//! Behavioral properties of a sync pass observed through the public API.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use geohub_core::{
    CatalogClientPort, CatalogError, CatalogFilter, CatalogPage, CatalogResult, ErrorKind,
    PageCursor, ResourceCache, ResourceRecord, ResourceType, SyncError, SyncOrchestrator,
    SyncState,
};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

/// Serves pages `p0..pN` where page `i` links to `p{i+1}`.
struct PagedHub {
    pages: Vec<Vec<ResourceRecord>>,
    fail_at: Option<usize>,
    hold_first: Option<Arc<Notify>>,
    calls: AtomicUsize,
}

impl PagedHub {
    fn new(pages: Vec<Vec<ResourceRecord>>) -> Self {
        Self {
            pages,
            fail_at: None,
            hold_first: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    fn holding_first_page(mut self, gate: Arc<Notify>) -> Self {
        self.hold_first = Some(gate);
        self
    }
}

#[async_trait]
impl CatalogClientPort for PagedHub {
    async fn fetch_page(
        &self,
        cursor: Option<&PageCursor>,
        cancel: &CancellationToken,
    ) -> CatalogResult<CatalogPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let index = match cursor {
            None => 0,
            Some(c) => c.as_str().trim_start_matches('p').parse().unwrap(),
        };

        if index == 0
            && let Some(gate) = &self.hold_first
        {
            tokio::select! {
                () = cancel.cancelled() => return Err(CatalogError::Cancelled),
                () = gate.notified() => {}
            }
        }

        if self.fail_at == Some(index) {
            return Err(CatalogError::ServerBusy {
                status: 503,
                url: format!("https://hub.example/?page={index}"),
            });
        }

        let mut page = CatalogPage::last(self.pages[index].clone());
        if index + 1 < self.pages.len() {
            page = page.with_next(format!("p{}", index + 1));
        }
        Ok(page)
    }

    async fn fetch_resource(
        &self,
        id: &str,
        _cancel: &CancellationToken,
    ) -> CatalogResult<ResourceRecord> {
        self.pages
            .iter()
            .flatten()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::ResourceNotFound { url: id.into() })
    }
}

fn record(id: &str, name: &str) -> ResourceRecord {
    ResourceRecord::new(
        id,
        name,
        ResourceType::Style,
        format!("https://hub.example/media/{id}.xml"),
    )
}

fn five_pages() -> Vec<Vec<ResourceRecord>> {
    (0..5)
        .map(|p| {
            (0..4)
                .map(|i| record(&format!("r{p}-{i}"), &format!("Resource {p}.{i}")))
                .collect()
        })
        .collect()
}

#[tokio::test]
async fn completed_sync_holds_one_record_per_id() {
    let pages = vec![
        vec![record("a", "Alpha"), record("b", "Beta")],
        vec![record("b", "Beta v2"), record("c", "Gamma")],
        vec![record("a", "Alpha v3"), record("d", "Delta")],
    ];
    let cache = ResourceCache::new();
    let sync = SyncOrchestrator::new(Arc::new(PagedHub::new(pages)), cache.clone());

    let report = sync.start_sync(&CancellationToken::new()).await.unwrap();
    assert_eq!(report.pages, 3);
    assert_eq!(report.records, 4);

    let snapshot = cache.snapshot();
    let mut ids: Vec<_> = snapshot.records().map(|r| r.id.clone()).collect();
    ids.sort();
    assert_eq!(ids, ["a", "b", "c", "d"]);
    assert_eq!(cache.get("a").unwrap().name, "Alpha v3");
    assert_eq!(cache.get("b").unwrap().name, "Beta v2");
}

#[tokio::test]
async fn failure_on_page_three_leaves_cache_identical() {
    let cache = ResourceCache::new();
    let first = SyncOrchestrator::new(Arc::new(PagedHub::new(five_pages())), cache.clone());
    first.start_sync(&CancellationToken::new()).await.unwrap();
    let before = cache.snapshot();

    let mut changed = five_pages();
    changed[0][0].name = "Changed".into();
    let hub = Arc::new(PagedHub::new(changed).failing_at(2));
    let failing = SyncOrchestrator::new(hub.clone(), cache.clone());

    let err = failing
        .start_sync(&CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Catalog(ref e) if e.kind() == ErrorKind::ServerBusy));
    assert_eq!(hub.calls.load(Ordering::SeqCst), 3);

    let after = cache.snapshot();
    assert_eq!(*after, *before);
    assert_eq!(after.sync_version, before.sync_version);
    assert_eq!(failing.status().state, SyncState::Failed);
    assert_eq!(failing.status().error, Some(ErrorKind::ServerBusy));
}

#[tokio::test]
async fn name_query_matches_case_insensitively_and_is_order_stable() {
    let pages = vec![
        vec![
            record("1", "Road network"),
            record("2", "Rivers"),
            record("3", "Railroads"),
        ],
        vec![record("4", "ROADS dark"), record("5", "Buildings")],
    ];
    let cache = ResourceCache::new();
    SyncOrchestrator::new(Arc::new(PagedHub::new(pages)), cache.clone())
        .start_sync(&CancellationToken::new())
        .await
        .unwrap();

    let roads = cache.query(CatalogFilter::new().with_name_contains("road"));
    let ids: Vec<_> = roads.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["1", "3", "4"]);

    let all = cache.query(CatalogFilter::new());
    let first: Vec<_> = all.iter().map(|r| r.id.clone()).collect();
    let second: Vec<_> = cache
        .query(CatalogFilter::new())
        .iter()
        .map(|r| r.id.clone())
        .collect();
    assert_eq!(first.len(), 5);
    assert_eq!(first, second);
}

#[tokio::test]
async fn concurrent_sync_is_rejected_and_first_completes() {
    let gate = Arc::new(Notify::new());
    let hub = PagedHub::new(five_pages()).holding_first_page(Arc::clone(&gate));
    let cache = ResourceCache::new();
    let sync = Arc::new(SyncOrchestrator::new(Arc::new(hub), cache.clone()));

    let first = {
        let sync = Arc::clone(&sync);
        tokio::spawn(async move { sync.start_sync(&CancellationToken::new()).await })
    };

    let mut status = sync.subscribe();
    status
        .wait_for(|s| s.state == SyncState::Syncing)
        .await
        .unwrap();

    let second = sync.start_sync(&CancellationToken::new()).await;
    assert_eq!(second.unwrap_err(), SyncError::AlreadySyncing);

    gate.notify_one();
    let report = first.await.unwrap().unwrap();
    assert_eq!(report.records, 20);
    assert_eq!(cache.len(), 20);
    assert_eq!(sync.status().state, SyncState::Completed);
}
