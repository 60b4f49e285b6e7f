//! Paginated catalog listing.

use geohub_core::{CatalogError, CatalogPage, CatalogResult, PageCursor, Transport};
use tokio_util::sync::CancellationToken;

use super::HubClient;
use crate::parsing::parse_page;
use crate::url::{build_listing_url, resolve_cursor};

impl<T: Transport> HubClient<T> {
    /// Fetch one listing page.
    ///
    /// `None` requests the first page; otherwise the cursor is the hub's
    /// `next` URL from the previous page.
    pub(crate) async fn list_page(
        &self,
        cursor: Option<&PageCursor>,
        cancel: &CancellationToken,
    ) -> CatalogResult<CatalogPage> {
        let url = match cursor {
            None => build_listing_url(&self.config),
            Some(cursor) => resolve_cursor(&self.config, cursor.as_str()).map_err(|e| {
                CatalogError::malformed(format!("unusable pagination cursor '{cursor}': {e}"))
            })?,
        };

        let json = self.get_json(&url, cancel).await?;
        let page = parse_page(&json)?;

        tracing::debug!(
            url = %url,
            records = page.records.len(),
            dropped = page.dropped,
            has_next = page.next_cursor.is_some(),
            "Fetched listing page"
        );
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{FIRST_PAGE, client, record_json};
    use super::*;
    use geohub_core::ports::testing::{ScriptedResponse, ScriptedTransport};
    use geohub_core::{ErrorKind, TransportError};
    use serde_json::json;

    const SECOND_PAGE: &str = "https://hub.example/api/v1/resources/?format=json&limit=1000&offset=2";

    #[tokio::test]
    async fn first_page_parses_records_and_cursor() {
        let body = json!({
            "total": 3,
            "count": 3,
            "next": SECOND_PAGE,
            "previous": null,
            "results": [record_json("a", "Roads"), record_json("b", "Rivers")]
        });
        let transport = ScriptedTransport::new().on(FIRST_PAGE, ScriptedResponse::json(body.to_string()));
        let client = client(transport);

        let page = client.list_page(None, &CancellationToken::new()).await.unwrap();
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.records[0].name, "Roads");
        assert_eq!(page.total_hint, Some(3));
        assert_eq!(page.next_cursor.as_ref().map(PageCursor::as_str), Some(SECOND_PAGE));
    }

    #[tokio::test]
    async fn follows_cursor_url_verbatim() {
        let body = json!({"next": null, "results": [record_json("c", "Coast")]});
        let transport = ScriptedTransport::new().on(SECOND_PAGE, ScriptedResponse::json(body.to_string()));
        let client = client(transport);

        let page = client
            .list_page(Some(&PageCursor::new(SECOND_PAGE)), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(page.records[0].id, "c");
        assert!(page.next_cursor.is_none());
        assert_eq!(client.transport().requests(), [SECOND_PAGE]);
    }

    #[tokio::test]
    async fn malformed_records_are_dropped_not_fatal() {
        let body = json!({
            "next": null,
            "results": [record_json("a", "Roads"), {"uuid": "x", "name": "no file", "resource_type": "Style"}]
        });
        let transport = ScriptedTransport::new().on(FIRST_PAGE, ScriptedResponse::json(body.to_string()));

        let page = client(transport)
            .list_page(None, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.dropped, 1);
    }

    #[tokio::test]
    async fn status_codes_map_to_kinds() {
        for (status, kind) in [
            (503, ErrorKind::ServerBusy),
            (429, ErrorKind::ServerBusy),
            (500, ErrorKind::ServerUnreachable),
            (404, ErrorKind::ResourceNotFound),
            (400, ErrorKind::RequestRejected),
        ] {
            let transport = ScriptedTransport::new().on(FIRST_PAGE, ScriptedResponse::status(status));
            let err = client(transport)
                .list_page(None, &CancellationToken::new())
                .await
                .unwrap_err();
            assert_eq!(err.kind(), kind, "status {status}");
        }
    }

    #[tokio::test]
    async fn invalid_json_is_malformed() {
        let transport = ScriptedTransport::new().on(FIRST_PAGE, ScriptedResponse::json("<html>oops</html>"));
        let err = client(transport)
            .list_page(None, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn connection_failure_is_network_unreachable() {
        let transport = ScriptedTransport::new().fail(
            FIRST_PAGE,
            TransportError::network_unreachable("dns lookup failed"),
        );
        let err = client(transport)
            .list_page(None, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NetworkUnreachable);
    }

    #[tokio::test]
    async fn cancelled_request() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = client(ScriptedTransport::new())
            .list_page(None, &cancel)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }
}
