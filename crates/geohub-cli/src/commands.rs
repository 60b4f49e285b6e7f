//! Subcommand definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use geohub_core::SortOrder;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the catalog from the hub (reuses the cached copy unless --force)
    Sync {
        /// Discard the cached catalog and run a full sync
        #[arg(long)]
        force: bool,
    },

    /// List catalog resources
    List(ListArgs),

    /// Show one resource in detail
    Show {
        /// Resource id (uuid)
        id: String,
        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download a resource's file
    Download {
        /// Resource id (uuid)
        id: String,
        /// Target directory (defaults to the data directory's downloads/)
        #[arg(long)]
        dest: Option<PathBuf>,
    },

    /// Fetch a resource's thumbnail into the local cache
    Thumbnail {
        /// Resource id (uuid)
        id: String,
    },

    /// Show the resolved data paths
    Paths,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Match against name or creator
    pub search: Option<String>,

    /// Match against the name only
    #[arg(long)]
    pub name: Option<String>,

    /// Restrict to a resource type (repeatable), e.g. style, model, geopackage
    #[arg(long = "type")]
    pub types: Vec<String>,

    /// Restrict to a subtype
    #[arg(long)]
    pub subtype: Option<String>,

    /// Sort order
    #[arg(long, value_enum, default_value_t = SortArg::Catalog)]
    pub sort: SortArg,

    /// Show at most this many rows
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortArg {
    #[default]
    Catalog,
    Name,
    Downloads,
    Newest,
}

impl From<SortArg> for SortOrder {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Catalog => Self::Catalog,
            SortArg::Name => Self::Name,
            SortArg::Downloads => Self::MostDownloaded,
            SortArg::Newest => Self::Newest,
        }
    }
}
