//! Thumbnail command handler.

use anyhow::Result;
use geohub_core::ErrorKind;

use crate::bootstrap::CliContext;
use crate::error::CliError;

pub async fn execute(ctx: &CliContext, id: &str) -> Result<()> {
    let record = super::find_record(ctx, id).await?;
    match ctx.thumbnails.fetch(&record, &ctx.cancel).await {
        Some(path) => println!("{}", path.display()),
        None if ctx.cancel.is_cancelled() => {
            return Err(CliError::operation(ErrorKind::Cancelled, "thumbnail fetch cancelled").into());
        }
        None => println!("No thumbnail available for '{}'; using the default icon", record.name),
    }
    Ok(())
}
