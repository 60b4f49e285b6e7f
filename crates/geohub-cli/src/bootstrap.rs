//! CLI bootstrap - the composition root.
//!
//! The only place concrete adapters are built:
//! - `ReqwestTransport` and `HubClient` (via geohub-hub)
//! - `ResourceCache`, `CatalogStore` and `SyncOrchestrator` (via geohub-core)
//! - `FileDownloader` and `ThumbnailCache` (via geohub-download)

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use geohub_core::{
    CatalogClientPort, CatalogStore, DataPaths, ResourceCache, RetryPolicy, SyncOrchestrator,
    ensure_directory,
};
use geohub_download::{DownloadConfig, FileDownloader, ThumbnailCache};
use geohub_hub::{HubClient, HubClientConfig, ReqwestTransport};
use tokio_util::sync::CancellationToken;

use crate::error::CliError;

/// Settings gathered from flags and the environment.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Data directory override.
    pub data_dir: Option<PathBuf>,
    /// Hub API base URL override.
    pub base_url: Option<String>,
    /// Retries for transient failures.
    pub retries: u32,
}

impl CliConfig {
    /// Resolve the data layout.
    pub fn paths(&self) -> Result<DataPaths, CliError> {
        match &self.data_dir {
            Some(dir) => Ok(DataPaths::from_root(dir)),
            None => Ok(DataPaths::resolve()?),
        }
    }

    pub fn hub_config(&self) -> HubClientConfig {
        let config = HubClientConfig::new();
        match &self.base_url {
            Some(url) => config.with_base_url(url),
            None => config,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default().with_max_retries(self.retries)
    }
}

type SharedTransport = Arc<ReqwestTransport>;

/// Fully composed context for command handlers.
pub struct CliContext {
    pub paths: DataPaths,
    pub client: Arc<dyn CatalogClientPort>,
    pub cache: ResourceCache,
    pub sync: SyncOrchestrator,
    pub downloader: FileDownloader<SharedTransport>,
    pub thumbnails: ThumbnailCache<SharedTransport>,
    pub retry: RetryPolicy,
    /// Cancelled on Ctrl+C.
    pub cancel: CancellationToken,
}

/// Build the context.
///
/// # Errors
///
/// Fails when the data directory cannot be created or the hub URL is invalid.
pub fn bootstrap(config: CliConfig) -> Result<CliContext> {
    let paths = config.paths()?;
    ensure_directory(paths.root())
        .map_err(CliError::from)
        .with_context(|| format!("preparing data directory {}", paths.root().display()))?;

    let hub_config = config.hub_config();
    let transport = Arc::new(
        ReqwestTransport::new(hub_config.user_agent(), hub_config.timeout())
            .map_err(|e| CliError::Config(e.to_string()))?,
    );
    let client: Arc<dyn CatalogClientPort> = Arc::new(
        HubClient::with_transport(&hub_config, Arc::clone(&transport))
            .map_err(|e| CliError::Config(e.to_string()))?,
    );

    let cache = ResourceCache::new();
    let sync = SyncOrchestrator::new(Arc::clone(&client), cache.clone())
        .with_store(CatalogStore::new(&paths.catalog_file));

    let downloader = FileDownloader::new(Arc::clone(&transport), DownloadConfig::new());
    let thumbnails = ThumbnailCache::new(
        FileDownloader::new(transport, DownloadConfig::new()),
        &paths.thumbnails_dir,
    );

    tracing::debug!(
        data_dir = %paths.root().display(),
        "Bootstrapped CLI context"
    );

    Ok(CliContext {
        paths,
        client,
        cache,
        sync,
        downloader,
        thumbnails,
        retry: config.retry_policy(),
        cancel: CancellationToken::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn bootstrap_creates_data_dir() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("geohub");
        let ctx = bootstrap(CliConfig {
            data_dir: Some(root.clone()),
            ..CliConfig::default()
        })
        .unwrap();

        assert!(root.is_dir());
        assert_eq!(ctx.paths.catalog_file, root.join("catalog.json"));
        assert_eq!(ctx.thumbnails.directory(), root.join("thumbnails"));
        assert!(ctx.cache.is_empty());
    }

    #[test]
    fn bad_base_url_is_config_error() {
        let dir = TempDir::new().unwrap();
        let err = bootstrap(CliConfig {
            data_dir: Some(dir.path().to_path_buf()),
            base_url: Some("ftp://hub.example/".into()),
            retries: 0,
        })
        .err()
        .unwrap();
        assert_eq!(err.downcast_ref::<CliError>().map(CliError::exit_code), Some(78));
    }
}
