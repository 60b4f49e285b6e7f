//! URL construction for hub API requests.

use url::Url;

use crate::client::HubConfig;

/// URL of the first listing page.
pub fn build_listing_url(config: &HubConfig) -> Url {
    let mut url = config.base_url.clone();
    url.query_pairs_mut()
        .append_pair("format", "json")
        .append_pair("limit", &config.page_size.to_string());
    url
}

/// Resolve a `next` cursor against the base URL.
///
/// The hub normally returns absolute URLs; relative ones are joined onto the
/// base.
pub fn resolve_cursor(config: &HubConfig, cursor: &str) -> Result<Url, url::ParseError> {
    config.base_url.join(cursor)
}

/// URL of a single resource: `{base}/{id}/?format=json`.
pub fn build_detail_url(config: &HubConfig, id: &str) -> Url {
    let mut url = config.base_url.clone();
    let base_path = url.path().trim_end_matches('/');
    let path = format!("{base_path}/{}/", urlencoding::encode(id.trim()));
    url.set_path(&path);
    url.set_query(Some("format=json"));
    url
}
