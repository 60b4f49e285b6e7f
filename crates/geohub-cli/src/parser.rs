//! Root CLI parser and global options.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Browse, sync and download resources from a QGIS-style resource hub.
#[derive(Parser, Debug)]
#[command(name = "geohub")]
#[command(about = "Sync, search and download geospatial resources from the hub")]
#[command(version)]
pub struct Cli {
    /// Override the data directory (catalog cache, thumbnails, downloads)
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Hub resource API base URL
    #[arg(long = "base-url", global = true, env = "GEOHUB_BASE_URL")]
    pub base_url: Option<String>,

    /// Retries for transient network failures
    #[arg(long, global = true, default_value_t = 3)]
    pub retries: u32,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::SortArg;
    use clap::CommandFactory;

    #[test]
    fn cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_args() {
        let cli = Cli::parse_from([
            "geohub",
            "sync",
            "--force",
            "-v",
            "--data-dir",
            "/tmp/geohub",
            "--retries",
            "0",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/geohub")));
        assert_eq!(cli.retries, 0);
        assert!(matches!(cli.command, Some(Commands::Sync { force: true })));
    }

    #[test]
    fn list_filters() {
        let cli = Cli::parse_from([
            "geohub", "list", "roads", "--type", "style", "--type", "model", "--sort", "downloads",
            "--limit", "5",
        ]);
        let Some(Commands::List(args)) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(args.search.as_deref(), Some("roads"));
        assert_eq!(args.types, ["style", "model"]);
        assert_eq!(args.sort, SortArg::Downloads);
        assert_eq!(args.limit, Some(5));
    }
}
