//! List command handler.

use anyhow::Result;
use geohub_core::{CatalogFilter, ResourceType};

use crate::bootstrap::CliContext;
use crate::commands::ListArgs;
use crate::presentation::print_record_table;

pub async fn execute(ctx: &CliContext, args: &ListArgs) -> Result<()> {
    super::load_catalog(ctx, false).await?;

    let results = ctx.cache.query(build_filter(args));
    let mut records = results.sorted(args.sort.into());
    let matched = records.len();
    if let Some(limit) = args.limit {
        records.truncate(limit);
    }

    if records.is_empty() {
        println!("No resources match.");
        return Ok(());
    }

    print_record_table(&records);
    println!(
        "\nShowing {} of {matched} matching resources (catalog version {})",
        records.len(),
        results.sync_version()
    );
    Ok(())
}

/// Translate list flags into a catalog filter.
pub fn build_filter(args: &ListArgs) -> CatalogFilter {
    let mut filter = CatalogFilter::new();
    if let Some(text) = &args.search {
        filter = filter.with_text(text);
    }
    if let Some(name) = &args.name {
        filter = filter.with_name_contains(name);
    }
    for raw in &args.types {
        filter = filter.with_type(ResourceType::parse(raw));
    }
    if let Some(subtype) = &args.subtype {
        filter = filter.with_subtype(subtype);
    }
    filter
}
