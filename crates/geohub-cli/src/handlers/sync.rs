//! Sync command handler.

use anyhow::Result;
use geohub_core::LoadOutcome;

use crate::bootstrap::CliContext;
use crate::presentation::format_date;

/// Load the catalog, syncing from the hub when there is no usable copy or
/// `force` is set.
pub async fn execute(ctx: &CliContext, force: bool) -> Result<()> {
    match super::load_catalog(ctx, force).await? {
        LoadOutcome::Synced(report) => {
            println!(
                "Synced {} resources from {} pages in {:.1}s (catalog version {})",
                report.records,
                report.pages,
                report.duration.as_secs_f64(),
                report.sync_version
            );
            if report.dropped > 0 {
                println!("Skipped {} malformed records", report.dropped);
            }
            if !report.persisted {
                println!("Warning: the catalog could not be saved for offline use");
            }
        }
        LoadOutcome::Restored {
            records,
            sync_version,
            last_synced_at,
        } => {
            println!(
                "Using cached catalog: {records} resources (version {sync_version}, synced {})",
                format_date(last_synced_at.as_ref())
            );
            println!("Run `geohub sync --force` to refresh it from the hub");
        }
        LoadOutcome::InMemory { records } => {
            println!("Catalog already loaded: {records} resources");
        }
    }
    Ok(())
}
