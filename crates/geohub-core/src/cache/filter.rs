//! Catalog query filters.

use std::sync::Arc;

use crate::domain::{Catalog, ResourceRecord, ResourceType};

/// Composable record filter.
///
/// All set criteria must match. Text criteria are case-insensitive substring
/// matches; type and subtype are exact (case-insensitive) matches. An empty
/// filter matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    text: Option<String>,
    name_contains: Option<String>,
    types: Vec<ResourceType>,
    subtype: Option<String>,
}

impl CatalogFilter {
    /// A filter that matches everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Free-text match against name or creator.
    #[must_use]
    pub fn with_text(mut self, text: impl AsRef<str>) -> Self {
        self.text = normalize(text.as_ref());
        self
    }

    /// Substring match against the name only.
    #[must_use]
    pub fn with_name_contains(mut self, needle: impl AsRef<str>) -> Self {
        self.name_contains = normalize(needle.as_ref());
        self
    }

    /// Restrict to a resource type. Repeat to allow several.
    #[must_use]
    pub fn with_type(mut self, resource_type: ResourceType) -> Self {
        if !self.types.contains(&resource_type) {
            self.types.push(resource_type);
        }
        self
    }

    /// Restrict to records carrying this subtype.
    #[must_use]
    pub fn with_subtype(mut self, subtype: impl AsRef<str>) -> Self {
        self.subtype = normalize(subtype.as_ref());
        self
    }

    /// Whether no criteria are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.name_contains.is_none()
            && self.types.is_empty()
            && self.subtype.is_none()
    }

    /// Check a single record.
    #[must_use]
    pub fn matches(&self, record: &ResourceRecord) -> bool {
        if let Some(text) = &self.text {
            let in_name = record.name.to_lowercase().contains(text.as_str());
            let in_creator = record.creator.to_lowercase().contains(text.as_str());
            if !in_name && !in_creator {
                return false;
            }
        }

        if let Some(needle) = &self.name_contains
            && !record.name.to_lowercase().contains(needle.as_str())
        {
            return false;
        }

        if !self.types.is_empty() && !self.types.contains(&record.resource_type) {
            return false;
        }

        if let Some(subtype) = &self.subtype
            && !record.has_subtype(subtype)
        {
            return false;
        }

        true
    }
}

fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

/// Ordering for materialized query results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Catalog (first-seen) order.
    #[default]
    Catalog,
    /// Case-insensitive name, ascending.
    Name,
    /// Download count, highest first.
    MostDownloaded,
    /// Upload date, newest first; undated records last.
    Newest,
}

/// Lazily filtered view over one catalog snapshot.
///
/// Holds the snapshot it was created from, so results stay consistent while a
/// sync publishes a newer one. Iterate as many times as needed.
#[derive(Debug, Clone)]
pub struct QueryResults {
    snapshot: Arc<Catalog>,
    filter: CatalogFilter,
}

impl QueryResults {
    pub(crate) const fn new(snapshot: Arc<Catalog>, filter: CatalogFilter) -> Self {
        Self { snapshot, filter }
    }

    /// Iterate matching records in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.snapshot
            .records()
            .filter(move |record| self.filter.matches(record))
    }

    /// Number of matches.
    #[must_use]
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Whether nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Clone the matches out.
    #[must_use]
    pub fn to_vec(&self) -> Vec<ResourceRecord> {
        self.iter().cloned().collect()
    }

    /// Clone the matches out in the given order.
    ///
    /// Ties keep catalog order.
    #[must_use]
    pub fn sorted(&self, order: SortOrder) -> Vec<ResourceRecord> {
        let mut records = self.to_vec();
        match order {
            SortOrder::Catalog => {}
            SortOrder::Name => records.sort_by_cached_key(|r| r.name.to_lowercase()),
            SortOrder::MostDownloaded => {
                records.sort_by(|a, b| b.download_count.cmp(&a.download_count));
            }
            SortOrder::Newest => records.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }
        records
    }

    /// Sync version of the snapshot being queried.
    #[must_use]
    pub fn sync_version(&self) -> u64 {
        self.snapshot.sync_version
    }
}

impl<'a> IntoIterator for &'a QueryResults {
    type Item = &'a ResourceRecord;
    type IntoIter = Box<dyn Iterator<Item = &'a ResourceRecord> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, name: &str, creator: &str, ty: ResourceType) -> ResourceRecord {
        ResourceRecord::new(id, name, ty, format!("https://h/{id}")).with_creator(creator)
    }

    #[test]
    fn empty_filter_matches_all() {
        let filter = CatalogFilter::new().with_text("   ");
        assert!(filter.is_empty());
        assert!(filter.matches(&rec("a", "x", "y", ResourceType::Map)));
    }

    #[test]
    fn text_matches_name_or_creator() {
        let filter = CatalogFilter::new().with_text("OSM");
        assert!(filter.matches(&rec("a", "osm roads", "", ResourceType::Style)));
        assert!(filter.matches(&rec("b", "Rivers", "OSMfan", ResourceType::Style)));
        assert!(!filter.matches(&rec("c", "Rivers", "someone", ResourceType::Style)));
    }

    #[test]
    fn name_contains_ignores_creator() {
        let filter = CatalogFilter::new().with_name_contains("road");
        assert!(filter.matches(&rec("a", "Main ROADS", "", ResourceType::Style)));
        assert!(!filter.matches(&rec("b", "Rivers", "roadie", ResourceType::Style)));
    }

    #[test]
    fn type_and_subtype_are_exact() {
        let fill = rec("a", "Fill", "", ResourceType::Style).with_subtype("Fill");
        let model = rec("b", "Model", "", ResourceType::Model);

        let styles = CatalogFilter::new().with_type(ResourceType::Style);
        assert!(styles.matches(&fill));
        assert!(!styles.matches(&model));

        let either = styles.clone().with_type(ResourceType::Model);
        assert!(either.matches(&model));

        let subtype = CatalogFilter::new().with_subtype("fill");
        assert!(subtype.matches(&fill));
        assert!(!CatalogFilter::new().with_subtype("Fil").matches(&fill));
    }

    #[test]
    fn results_are_restartable() {
        let catalog = Catalog::from_records([
            rec("a", "Road A", "", ResourceType::Style),
            rec("b", "River", "", ResourceType::Style),
            rec("c", "road c", "", ResourceType::Map),
        ]);
        let results = QueryResults::new(
            Arc::new(catalog),
            CatalogFilter::new().with_name_contains("road"),
        );
        let first: Vec<_> = results.iter().map(|r| r.id.clone()).collect();
        let second: Vec<_> = (&results).into_iter().map(|r| r.id.clone()).collect();
        assert_eq!(first, ["a", "c"]);
        assert_eq!(first, second);
        assert_eq!(results.count(), 2);
    }

    #[test]
    fn sorted_orders() {
        let mut low = rec("a", "beta", "", ResourceType::Style);
        low.download_count = 10;
        let mut high = rec("b", "Alpha", "", ResourceType::Style);
        high.download_count = 50;
        high.created_at = chrono::DateTime::from_timestamp(1_700_000_000, 0);
        let results = QueryResults::new(
            Arc::new(Catalog::from_records([low, high])),
            CatalogFilter::new(),
        );

        let ids = |order| -> Vec<String> {
            results.sorted(order).into_iter().map(|r| r.id).collect()
        };
        assert_eq!(ids(SortOrder::Catalog), ["a", "b"]);
        assert_eq!(ids(SortOrder::Name), ["b", "a"]);
        assert_eq!(ids(SortOrder::MostDownloaded), ["b", "a"]);
        assert_eq!(ids(SortOrder::Newest), ["b", "a"]);
    }
}
