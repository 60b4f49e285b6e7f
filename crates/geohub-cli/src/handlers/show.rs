//! Show command handler.

use anyhow::{Context, Result};

use crate::bootstrap::CliContext;
use crate::presentation::print_record_details;

pub async fn execute(ctx: &CliContext, id: &str, json: bool) -> Result<()> {
    let record = super::find_record(ctx, id).await?;
    if json {
        let text = serde_json::to_string_pretty(&record).context("serializing record")?;
        println!("{text}");
    } else {
        print_record_details(&record);
    }
    Ok(())
}
