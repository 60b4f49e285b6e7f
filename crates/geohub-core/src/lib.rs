#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod cache;
pub mod domain;
pub mod errors;
pub mod paths;
pub mod ports;
pub mod retry;
pub mod services;
pub mod utils;

pub use cache::{CatalogFilter, CatalogStore, QueryResults, ResourceCache, SortOrder, StoreError};
pub use domain::{Catalog, CatalogPage, PageCursor, ResourceRecord, ResourceType};
pub use errors::{
    CatalogError, CatalogResult, Classify, DownloadError, ErrorKind, TransportError,
    classify_status,
};
pub use paths::{DATA_DIR_ENV, DataPaths, PathError, data_root, data_root_from, ensure_directory};
pub use ports::{
    CatalogClientPort, ResponseBody, ResponseHeaders, Transport, TransportRequest,
    TransportResponse,
};
pub use retry::RetryPolicy;
pub use services::{
    LoadOutcome, PageWalker, SyncError, SyncOrchestrator, SyncReport, SyncState, SyncStatus,
};
pub use utils::format_bytes;
