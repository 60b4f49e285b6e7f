#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

mod config;
mod downloader;
mod request;
mod task;
mod thumbnail;

pub use config::{DEFAULT_CHUNK_SIZE, DownloadConfig};
pub use downloader::{FileDownloader, ProgressFn, no_progress};
pub use request::DownloadRequest;
pub use task::{DownloadResult, DownloadState, DownloadTask};
pub use thumbnail::{PLACEHOLDER_ICON, ThumbnailCache};
