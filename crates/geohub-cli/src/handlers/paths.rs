//! Paths command handler.
//!
//! Prints the resolved data layout in `key = value` form for diagnostics.

use std::fmt::Write;

use anyhow::Result;
use geohub_core::{DATA_DIR_ENV, DataPaths};

use crate::bootstrap::CliConfig;

pub fn execute(config: &CliConfig) -> Result<()> {
    let paths = config.paths()?;
    print!("{}", render(&paths, &config.hub_config().parsed_base_url()?.to_string()));
    Ok(())
}

fn render(paths: &DataPaths, base_url: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "data_dir = {}", paths.root().display());
    let _ = writeln!(out, "catalog_file = {}", paths.catalog_file.display());
    let _ = writeln!(out, "thumbnails_dir = {}", paths.thumbnails_dir.display());
    let _ = writeln!(out, "downloads_dir = {}", paths.downloads_dir.display());
    let _ = writeln!(out, "hub_url = {base_url}");
    let _ = writeln!(
        out,
        "# override with --data-dir or {DATA_DIR_ENV}, and --base-url"
    );
    out
}
