//! Public configuration for the hub client.

use std::time::Duration;

use url::Url;

use crate::error::HubSetupError;

/// Default hub resources endpoint.
pub const DEFAULT_BASE_URL: &str = "https://plugins.qgis.org/api/v1/resources/";

/// Configuration for the hub client.
///
/// # Example
///
/// ```
/// use geohub_hub::HubClientConfig;
/// use std::time::Duration;
///
/// let config = HubClientConfig::new()
///     .with_timeout(Duration::from_secs(60))
///     .with_page_size(200);
/// ```
#[derive(Debug, Clone)]
pub struct HubClientConfig {
    /// Resources endpoint
    pub(crate) base_url: String,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// Per-request timeout
    pub(crate) timeout: Duration,
    /// Records requested per listing page
    pub(crate) page_size: u32,
    /// Largest JSON body accepted
    pub(crate) max_body_bytes: usize,
}

impl Default for HubClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("geohub/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            page_size: 1000,
            max_body_bytes: 64 * 1024 * 1024,
        }
    }
}

impl HubClientConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the resources endpoint.
    ///
    /// Defaults to [`DEFAULT_BASE_URL`].
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 30 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set how many records each listing page requests.
    ///
    /// Defaults to 1000. Zero is raised to 1.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Set the largest JSON response accepted.
    #[must_use]
    pub const fn with_max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = bytes;
        self
    }

    /// The configured user agent.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// The configured request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Parse and validate the base URL.
    ///
    /// The path always ends with `/` so relative joins stay under it.
    pub fn parsed_base_url(&self) -> Result<Url, HubSetupError> {
        let mut url = Url::parse(self.base_url.trim()).map_err(|source| {
            HubSetupError::InvalidBaseUrl {
                url: self.base_url.clone(),
                source,
            }
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(HubSetupError::UnsupportedScheme {
                url: self.base_url.clone(),
            });
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = HubClientConfig::new();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.page_size, 1000);
        assert!(config.user_agent.starts_with("geohub/"));
    }

    #[test]
    fn builder_overrides() {
        let config = HubClientConfig::new()
            .with_base_url("http://localhost:8000/api/v1/resources")
            .with_page_size(0)
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.page_size, 1);
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(
            config.parsed_base_url().unwrap().as_str(),
            "http://localhost:8000/api/v1/resources/"
        );
    }

    #[test]
    fn rejects_bad_base_urls() {
        let err = HubClientConfig::new()
            .with_base_url("not a url")
            .parsed_base_url()
            .unwrap_err();
        assert!(matches!(err, HubSetupError::InvalidBaseUrl { .. }));

        let err = HubClientConfig::new()
            .with_base_url("ftp://hub.example/resources/")
            .parsed_base_url()
            .unwrap_err();
        assert!(matches!(err, HubSetupError::UnsupportedScheme { .. }));
    }
}
