//! Single-resource detail.

use geohub_core::{CatalogError, CatalogResult, ResourceRecord, Transport};
use tokio_util::sync::CancellationToken;

use super::HubClient;
use crate::parsing::parse_record;
use crate::url::build_detail_url;

impl<T: Transport> HubClient<T> {
    /// Fetch one resource by id.
    pub(crate) async fn resource_detail(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> CatalogResult<ResourceRecord> {
        let url = build_detail_url(&self.config, id);
        let json = self.get_json(&url, cancel).await?;
        parse_record(&json).map_err(|e| {
            tracing::warn!(id, reason = %e, "Hub returned a malformed resource");
            CatalogError::malformed(format!("resource {id}: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{client, record_json};
    use super::*;
    use geohub_core::ErrorKind;
    use geohub_core::ports::testing::{ScriptedResponse, ScriptedTransport};

    const DETAIL: &str = "https://hub.example/api/v1/resources/abc/?format=json";

    #[tokio::test]
    async fn fetches_and_parses_detail() {
        let transport = ScriptedTransport::new()
            .on(DETAIL, ScriptedResponse::json(record_json("abc", "Roads").to_string()));
        let record = client(transport)
            .resource_detail("abc", &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(record.id, "abc");
        assert_eq!(record.creator, "tester");
    }

    #[tokio::test]
    async fn missing_resource_is_not_found() {
        let err = client(ScriptedTransport::new())
            .resource_detail("abc", &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceNotFound);
    }

    #[tokio::test]
    async fn malformed_detail_fails() {
        let transport = ScriptedTransport::new()
            .on(DETAIL, ScriptedResponse::json(r#"{"uuid": "abc"}"#));
        let err = client(transport)
            .resource_detail("abc", &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }
}
