//! Progress display for syncs and downloads.
//!
//! Bars draw to stderr and stay hidden when it is not a terminal.

use std::time::Duration;

use geohub_core::{SyncState, SyncStatus};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::tables::truncate_string;

const BAR_TEMPLATE: &str =
    "{msg} {bar:28.cyan/blue} {bytes:>9} / {total_bytes:>9} ({percent:>3}%) @ {bytes_per_sec} ETA {eta}";
const SPINNER_TEMPLATE: &str = "{spinner} {msg} {bytes} @ {bytes_per_sec}";

/// Spinner that follows a sync's status channel.
pub struct SyncSpinner {
    bar: ProgressBar,
    watcher: JoinHandle<()>,
}

impl SyncSpinner {
    pub fn start(mut status: watch::Receiver<SyncStatus>) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(Duration::from_millis(120));

        let display = bar.clone();
        let watcher = tokio::spawn(async move {
            while status.changed().await.is_ok() {
                let status = status.borrow_and_update().clone();
                if status.state == SyncState::Syncing {
                    display.set_message(sync_message(&status));
                }
            }
        });
        Self { bar, watcher }
    }

    pub fn finish(self) {
        self.watcher.abort();
        self.bar.finish_and_clear();
    }
}

fn sync_message(status: &SyncStatus) -> String {
    match status.total_hint {
        Some(total) => format!(
            "Syncing catalog: page {}, {}/{total} resources",
            status.pages_fetched, status.records_fetched
        ),
        None => format!(
            "Syncing catalog: page {}, {} resources",
            status.pages_fetched, status.records_fetched
        ),
    }
}

/// Byte progress bar for one download.
pub struct DownloadBar {
    bar: ProgressBar,
}

impl DownloadBar {
    /// `size_hint` seeds the bar length until the server reports one.
    pub fn new(label: &str, size_hint: Option<u64>) -> Self {
        let bar = ProgressBar::new(size_hint.unwrap_or(0));
        match size_hint {
            Some(_) => bar.set_style(bar_style()),
            None => bar.set_style(spinner_style()),
        }
        bar.set_message(truncate_string(label, 32));
        Self { bar }
    }

    /// Callback for the downloader's progress reports.
    pub fn callback(&self) -> impl Fn(u64, Option<u64>) + Send + Sync + 'static {
        let bar = self.bar.clone();
        move |done, total| {
            if let Some(total) = total
                && bar.length() != Some(total)
            {
                bar.set_style(bar_style());
                bar.set_length(total);
            }
            bar.set_position(done);
        }
    }

    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(BAR_TEMPLATE).unwrap_or_else(|_| ProgressStyle::default_bar())
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template(SPINNER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_message_with_and_without_total() {
        let mut status = SyncStatus {
            state: SyncState::Syncing,
            pages_fetched: 2,
            records_fetched: 1500,
            ..SyncStatus::default()
        };
        assert_eq!(sync_message(&status), "Syncing catalog: page 2, 1500 resources");
        status.total_hint = Some(2400);
        assert_eq!(
            sync_message(&status),
            "Syncing catalog: page 2, 1500/2400 resources"
        );
    }

    #[test]
    fn callback_tracks_position_and_length() {
        let bar = DownloadBar::new("Roads", None);
        let callback = bar.callback();
        callback(10, Some(100));
        callback(60, Some(100));
        assert_eq!(bar.bar.length(), Some(100));
        assert_eq!(bar.bar.position(), 60);
        bar.finish();
    }
}
