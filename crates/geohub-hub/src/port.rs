//! `CatalogClientPort` implementation for `HubClient`.

use async_trait::async_trait;
use geohub_core::{CatalogClientPort, CatalogPage, CatalogResult, PageCursor, ResourceRecord, Transport};
use tokio_util::sync::CancellationToken;

use crate::client::HubClient;

#[async_trait]
impl<T: Transport> CatalogClientPort for HubClient<T> {
    async fn fetch_page(
        &self,
        cursor: Option<&PageCursor>,
        cancel: &CancellationToken,
    ) -> CatalogResult<CatalogPage> {
        self.list_page(cursor, cancel).await
    }

    async fn fetch_resource(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> CatalogResult<ResourceRecord> {
        self.resource_detail(id, cancel).await
    }
}
