//! Download command handler.

use std::path::Path;

use anyhow::Result;
use geohub_core::format_bytes;
use geohub_download::ProgressFn;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::DownloadBar;

/// Download a resource's file into `dest` (or the default downloads
/// directory), retrying transient failures.
pub async fn execute(ctx: &CliContext, id: &str, dest: Option<&Path>) -> Result<()> {
    let record = super::find_record(ctx, id).await?;
    let directory = dest.map_or_else(|| ctx.paths.downloads_dir.clone(), Path::to_path_buf);

    let bar = DownloadBar::new(&record.name, record.file_size_hint);
    let callback = bar.callback();
    let progress: &ProgressFn<'_> = &callback;
    let (record_ref, directory_ref) = (&record, directory.as_path());

    let outcome = ctx
        .retry
        .run(&ctx.cancel, move |attempt| async move {
            if attempt > 0 {
                tracing::info!(attempt, id = %record_ref.id, "Retrying download");
            }
            ctx.downloader
                .download_record(record_ref, directory_ref, progress, &ctx.cancel)
                .await
                .into_result()
        })
        .await;
    bar.finish();

    let path = outcome.map_err(CliError::from)?;
    let size = tokio::fs::metadata(&path).await.map_or(0, |m| m.len());
    println!(
        "Downloaded '{}' ({}) to {}",
        record.name,
        format_bytes(size),
        path.display()
    );
    Ok(())
}
