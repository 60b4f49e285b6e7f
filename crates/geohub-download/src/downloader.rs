//! Streaming file downloader.

use std::path::{Path, PathBuf};

use bytes::BytesMut;
use geohub_core::{
    DownloadError, ErrorKind, ResourceRecord, Transport, TransportRequest, TransportResponse,
};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;

use crate::config::DownloadConfig;
use crate::request::{DownloadRequest, create_temp_file, parent_dir};
use crate::task::{DownloadResult, DownloadTask};

/// Progress callback: `(bytes_transferred, bytes_total)`.
///
/// Called synchronously on the downloading task, so it may borrow caller state.
pub type ProgressFn<'a> = dyn Fn(u64, Option<u64>) + Send + Sync + 'a;

/// A progress callback that ignores updates.
pub fn no_progress(_transferred: u64, _total: Option<u64>) {}

/// Downloads files through a core `Transport`.
///
/// Never retries; wrap calls in a `RetryPolicy` for that.
#[derive(Debug, Clone)]
pub struct FileDownloader<T: Transport> {
    transport: T,
    config: DownloadConfig,
}

impl<T: Transport> FileDownloader<T> {
    pub const fn new(transport: T, config: DownloadConfig) -> Self {
        Self { transport, config }
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub const fn config(&self) -> &DownloadConfig {
        &self.config
    }

    /// Stream `url` into `destination`.
    ///
    /// `on_progress` runs after every chunk written to disk. The destination
    /// is only created (or replaced) when the whole body arrived; on any
    /// failure or cancellation the partial file is removed and an existing
    /// destination is left untouched.
    pub async fn download(
        &self,
        url: &str,
        destination: &Path,
        on_progress: &ProgressFn<'_>,
        cancel: &CancellationToken,
    ) -> DownloadResult {
        let mut task = DownloadTask::new(url, destination);
        tracing::info!(
            task_id = %task.id(),
            url,
            destination = %destination.display(),
            "Starting download"
        );

        let outcome = self.run(&mut task, on_progress, cancel).await;
        match &outcome {
            Ok(path) => tracing::info!(
                task_id = %task.id(),
                bytes = task.bytes_transferred(),
                path = %path.display(),
                "Download complete"
            ),
            Err(err) if err.is_cancelled() => {
                tracing::info!(task_id = %task.id(), "Download cancelled");
            }
            Err(err) => tracing::warn!(
                task_id = %task.id(),
                url,
                kind = %err.kind(),
                error = %err.message,
                "Download failed"
            ),
        }
        task.finish(outcome)
    }

    /// Run a planned request.
    pub async fn fetch(
        &self,
        request: &DownloadRequest,
        on_progress: &ProgressFn<'_>,
        cancel: &CancellationToken,
    ) -> DownloadResult {
        self.download(&request.url, &request.destination, on_progress, cancel)
            .await
    }

    /// Download a catalog record's file into `directory`.
    pub async fn download_record(
        &self,
        record: &ResourceRecord,
        directory: &Path,
        on_progress: &ProgressFn<'_>,
        cancel: &CancellationToken,
    ) -> DownloadResult {
        self.fetch(&DownloadRequest::for_record(record, directory), on_progress, cancel)
            .await
    }

    async fn run(
        &self,
        task: &mut DownloadTask,
        on_progress: &ProgressFn<'_>,
        cancel: &CancellationToken,
    ) -> Result<PathBuf, DownloadError> {
        if cancel.is_cancelled() {
            return Err(DownloadError::cancelled());
        }

        let request =
            TransportRequest::get(task.url()).with_timeout(self.config.request_timeout);
        let mut response = self.transport.execute(request, cancel).await?;
        if !response.is_success() {
            return Err(DownloadError::from_status(response.status, task.url()));
        }

        let total = response.content_length();
        task.start(total);

        let destination = task.destination().to_path_buf();
        tokio::fs::create_dir_all(parent_dir(&destination))
            .await
            .map_err(|e| DownloadError::storage("create destination directory", &e))?;
        let (mut file, temp_path) = create_temp_file(&destination)?;

        self.stream_body(&mut response, &mut file, task, on_progress, cancel)
            .await?;

        if let Some(expected) = total
            && task.bytes_transferred() != expected
        {
            return Err(DownloadError::truncated(expected, task.bytes_transferred()));
        }

        file.flush()
            .await
            .map_err(|e| DownloadError::storage("flush temp file", &e))?;
        file.sync_all()
            .await
            .map_err(|e| DownloadError::storage("sync temp file", &e))?;
        drop(file);

        if cancel.is_cancelled() {
            return Err(DownloadError::cancelled());
        }

        temp_path
            .persist(&destination)
            .map_err(|e| DownloadError::storage("move download into place", &e.error))?;
        Ok(destination)
    }

    /// Copy the body to `file` in `chunk_size` blocks.
    async fn stream_body(
        &self,
        response: &mut TransportResponse,
        file: &mut tokio::fs::File,
        task: &mut DownloadTask,
        on_progress: &ProgressFn<'_>,
        cancel: &CancellationToken,
    ) -> Result<(), DownloadError> {
        let chunk_size = self.config.chunk_size;
        let total = task.bytes_total();
        let mut pending = BytesMut::with_capacity(chunk_size.min(4 * 1024 * 1024));

        loop {
            let read = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(DownloadError::cancelled()),
                read = tokio::time::timeout(self.config.read_timeout, response.body.next_chunk()) => read,
            };
            let Ok(next) = read else {
                return Err(DownloadError::new(
                    ErrorKind::ServerUnreachable,
                    format!(
                        "no data for {}s after {} bytes",
                        self.config.read_timeout.as_secs(),
                        task.bytes_transferred()
                    ),
                ));
            };
            let Some(chunk) = next? else {
                break;
            };

            let received = task.bytes_transferred() + (pending.len() + chunk.len()) as u64;
            if let Some(expected) = total
                && received > expected
            {
                return Err(DownloadError::truncated(expected, received));
            }

            pending.extend_from_slice(&chunk);
            while pending.len() >= chunk_size {
                let block = pending.split_to(chunk_size);
                write_block(file, &block, task).await?;
                on_progress(task.bytes_transferred(), total);
            }
        }

        if !pending.is_empty() {
            write_block(file, &pending, task).await?;
            on_progress(task.bytes_transferred(), total);
        }
        Ok(())
    }
}

async fn write_block(
    file: &mut tokio::fs::File,
    block: &[u8],
    task: &mut DownloadTask,
) -> Result<(), DownloadError> {
    file.write_all(block)
        .await
        .map_err(|e| DownloadError::storage("write temp file", &e))?;
    task.advance(block.len() as u64);
    Ok(())
}
