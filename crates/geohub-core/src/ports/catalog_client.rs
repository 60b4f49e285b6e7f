//! Catalog client port.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::{CatalogPage, PageCursor, ResourceRecord};
use crate::errors::CatalogResult;

/// Port trait for hub catalog listings.
///
/// The implementation lives in `geohub-hub`. Implementations drop malformed
/// records (logging them) instead of failing the page.
#[async_trait]
pub trait CatalogClientPort: Send + Sync {
    /// Fetch one page of the listing. `None` requests the first page.
    async fn fetch_page(
        &self,
        cursor: Option<&PageCursor>,
        cancel: &CancellationToken,
    ) -> CatalogResult<CatalogPage>;

    /// Fetch a single resource by id.
    async fn fetch_resource(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> CatalogResult<ResourceRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    // Verify the trait is object-safe
    fn _assert_object_safe(_: Arc<dyn CatalogClientPort>) {}
}
