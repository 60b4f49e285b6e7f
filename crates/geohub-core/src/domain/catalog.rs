//! Catalog snapshot and pagination types.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::resource::ResourceRecord;

/// An immutable view of every known record, keyed by id.
///
/// Holds at most one record per id. Iteration order follows first insertion
/// so repeated queries over the same snapshot are order-stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    records: IndexMap<String, ResourceRecord>,
    /// Incremented by every completed sync pass.
    pub sync_version: u64,
    /// When the last completed sync pass was published.
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from records; later duplicates of an id win.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = ResourceRecord>,
    {
        let mut catalog = Self::new();
        catalog.merge(records);
        catalog
    }

    /// Merge records, last writer wins per id.
    pub fn merge<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = ResourceRecord>,
    {
        for record in records {
            self.records.insert(record.id.clone(), record);
        }
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ResourceRecord> {
        self.records.get(id)
    }

    /// Whether a record with this id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Iterate records in stable order.
    pub fn records(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.records.values()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Opaque token for the next page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageCursor(String);

impl PageCursor {
    /// Wrap a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PageCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of a catalog listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogPage {
    /// Well-formed records on this page.
    pub records: Vec<ResourceRecord>,
    /// Cursor for the following page; `None` when the listing is exhausted.
    pub next_cursor: Option<PageCursor>,
    /// Total record count reported by the hub, if any.
    pub total_hint: Option<u64>,
    /// Number of malformed records dropped from this page.
    pub dropped: usize,
}

impl CatalogPage {
    /// A final page holding the given records.
    #[must_use]
    pub const fn last(records: Vec<ResourceRecord>) -> Self {
        Self {
            records,
            next_cursor: None,
            total_hint: None,
            dropped: 0,
        }
    }

    /// Set the next cursor.
    #[must_use]
    pub fn with_next(mut self, cursor: impl Into<String>) -> Self {
        self.next_cursor = Some(PageCursor::new(cursor));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ResourceType;

    fn rec(id: &str, name: &str) -> ResourceRecord {
        ResourceRecord::new(id, name, ResourceType::Style, format!("https://h/{id}.xml"))
    }

    #[test]
    fn later_duplicate_wins() {
        let catalog = Catalog::from_records([rec("a", "first"), rec("b", "b"), rec("a", "second")]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("a").map(|r| r.name.as_str()), Some("second"));
    }

    #[test]
    fn iteration_order_is_first_insertion() {
        let catalog = Catalog::from_records([rec("b", "b"), rec("a", "a"), rec("b", "b2")]);
        let ids: Vec<_> = catalog.records().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn serde_round_trip_keeps_version() {
        let mut catalog = Catalog::from_records([rec("a", "Roads")]);
        catalog.sync_version = 7;
        catalog.last_synced_at = Some(Utc::now());

        let json = serde_json::to_string(&catalog).unwrap();
        let parsed: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, catalog);
    }
}
