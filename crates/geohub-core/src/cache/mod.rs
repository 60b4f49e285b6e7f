//! In-memory resource cache with snapshot-swap publishing.
//!
//! Readers take an `Arc<Catalog>` snapshot and never block a sync for longer
//! than a pointer swap. Writers build the next snapshot outside the lock and
//! publish it in one step.

mod filter;
mod store;

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};

use crate::domain::{Catalog, ResourceRecord};

pub use filter::{CatalogFilter, QueryResults, SortOrder};
pub use store::{CatalogStore, StoreError};

/// Shared handle to the current catalog snapshot.
///
/// Cloning the handle shares the same catalog. Independent instances are
/// fully isolated.
#[derive(Debug, Clone, Default)]
pub struct ResourceCache {
    current: Arc<RwLock<Arc<Catalog>>>,
}

impl ResourceCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Catalog> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<ResourceRecord> {
        self.snapshot().get(id).cloned()
    }

    /// Filter the current snapshot.
    #[must_use]
    pub fn query(&self, filter: CatalogFilter) -> QueryResults {
        QueryResults::new(self.snapshot(), filter)
    }

    /// Replace the whole catalog with `records`.
    ///
    /// Bumps `sync_version`, stamps `last_synced_at`, and returns the new
    /// snapshot.
    pub fn replace<I>(&self, records: I) -> Arc<Catalog>
    where
        I: IntoIterator<Item = ResourceRecord>,
    {
        let mut next = Catalog::from_records(records);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        next.sync_version = guard.sync_version + 1;
        next.last_synced_at = Some(Utc::now());
        let next = Arc::new(next);
        *guard = Arc::clone(&next);
        drop(guard);

        tracing::debug!(
            records = next.len(),
            sync_version = next.sync_version,
            "Published catalog snapshot"
        );
        next
    }

    /// Merge `records` into the current catalog, last writer wins per id.
    ///
    /// The merged copy is built outside the lock. If another writer published
    /// in the meantime the merge is redone on top of its snapshot. Version and
    /// timestamp are left unchanged.
    pub fn upsert<I>(&self, records: I) -> Arc<Catalog>
    where
        I: IntoIterator<Item = ResourceRecord>,
    {
        let records: Vec<_> = records.into_iter().collect();
        loop {
            let base = self.snapshot();
            let mut next = Catalog::clone(&base);
            next.merge(records.iter().cloned());
            let next = Arc::new(next);

            let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
            if Arc::ptr_eq(&guard, &base) {
                *guard = Arc::clone(&next);
                return next;
            }
            drop(guard);
            tracing::trace!("Catalog changed during upsert, merging again");
        }
    }

    /// Publish a previously persisted catalog as-is.
    pub fn restore(&self, catalog: Catalog) -> Arc<Catalog> {
        let next = Arc::new(catalog);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&next);
        next
    }

    /// Version of the current snapshot.
    #[must_use]
    pub fn sync_version(&self) -> u64 {
        self.snapshot().sync_version
    }

    /// When the current snapshot was synced.
    #[must_use]
    pub fn last_synced_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot().last_synced_at
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Whether the cache holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ResourceType;

    fn rec(id: &str, name: &str) -> ResourceRecord {
        ResourceRecord::new(id, name, ResourceType::Style, format!("https://h/{id}"))
    }

    #[test]
    fn replace_bumps_version_and_drops_old_records() {
        let cache = ResourceCache::new();
        assert_eq!(cache.sync_version(), 0);
        assert!(cache.last_synced_at().is_none());

        cache.replace([rec("a", "A"), rec("b", "B")]);
        assert_eq!(cache.sync_version(), 1);
        assert!(cache.last_synced_at().is_some());

        cache.replace([rec("c", "C")]);
        assert_eq!(cache.sync_version(), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("a").is_none());
    }

    #[test]
    fn upsert_merges_without_bumping_version() {
        let cache = ResourceCache::new();
        cache.replace([rec("a", "A"), rec("b", "B")]);
        cache.upsert([rec("a", "A2"), rec("c", "C")]);

        assert_eq!(cache.sync_version(), 1);
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("a").unwrap().name, "A2");
    }

    #[test]
    fn concurrent_upserts_lose_no_records() {
        let cache = ResourceCache::new();
        cache.replace([rec("seed", "Seed")]);
        let before = cache.snapshot();

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for i in 0..25 {
                        cache.upsert([rec(&format!("t{t}-{i}"), "R")]);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 1 + 8 * 25);
        assert_eq!(cache.sync_version(), 1);
        assert_eq!(before.len(), 1);
    }

    #[test]
    fn readers_keep_their_snapshot() {
        let cache = ResourceCache::new();
        cache.replace([rec("a", "A")]);
        let before = cache.snapshot();
        let results = cache.query(CatalogFilter::new());

        cache.replace([rec("b", "B")]);
        assert!(before.contains("a"));
        assert_eq!(results.to_vec()[0].id, "a");
        assert!(cache.get("b").is_some());
    }

    #[test]
    fn clones_share_state_but_instances_do_not() {
        let cache = ResourceCache::new();
        let shared = cache.clone();
        let other = ResourceCache::new();

        cache.replace([rec("a", "A")]);
        assert_eq!(shared.len(), 1);
        assert!(other.is_empty());
    }

    #[test]
    fn restore_publishes_catalog_verbatim() {
        let mut catalog = Catalog::from_records([rec("a", "A")]);
        catalog.sync_version = 9;
        let cache = ResourceCache::new();
        cache.restore(catalog);
        assert_eq!(cache.sync_version(), 9);
        assert!(cache.last_synced_at().is_none());
    }
}
