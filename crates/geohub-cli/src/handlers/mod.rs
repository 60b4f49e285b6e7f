//! Command handlers.
//!
//! Each handler takes the composed [`CliContext`](crate::CliContext) and
//! returns `anyhow::Result`; failures from the libraries are converted to
//! [`CliError`](crate::CliError) so `main` can choose an exit code.

pub mod download;
pub mod list;
pub mod paths;
pub mod show;
pub mod sync;
pub mod thumbnail;

use geohub_core::{ErrorKind, LoadOutcome, ResourceRecord};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::SyncSpinner;

/// Make sure the cache holds a catalog, restoring or syncing as needed.
pub(crate) async fn load_catalog(ctx: &CliContext, force: bool) -> Result<LoadOutcome, CliError> {
    let spinner = SyncSpinner::start(ctx.sync.subscribe());
    let outcome = ctx
        .retry
        .run(&ctx.cancel, move |attempt| {
            if attempt > 0 {
                tracing::info!(attempt, "Retrying catalog sync");
            }
            ctx.sync.load_or_sync(force, &ctx.cancel)
        })
        .await;
    spinner.finish();
    outcome.map_err(CliError::from)
}

/// Look a record up in the cache, falling back to the hub's detail endpoint.
pub(crate) async fn find_record(ctx: &CliContext, id: &str) -> Result<ResourceRecord, CliError> {
    load_catalog(ctx, false).await?;
    if let Some(record) = ctx.cache.get(id) {
        return Ok(record);
    }

    tracing::debug!(id, "Record not cached, asking the hub");
    let fetched = ctx
        .retry
        .run(&ctx.cancel, move |_| ctx.client.fetch_resource(id, &ctx.cancel))
        .await;
    match fetched {
        Ok(record) => {
            ctx.cache.upsert([record.clone()]);
            Ok(record)
        }
        Err(err) if err.kind() == ErrorKind::ResourceNotFound => {
            Err(CliError::UnknownResource(id.to_string()))
        }
        Err(err) => Err(err.into()),
    }
}
