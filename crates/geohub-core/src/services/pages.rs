//! Lazy page iteration over a catalog listing.

use std::collections::HashSet;

use tokio_util::sync::CancellationToken;

use crate::domain::{CatalogPage, PageCursor};
use crate::errors::{CatalogError, CatalogResult};
use crate::ports::CatalogClientPort;

/// Walks a listing one page at a time, following opaque cursors.
///
/// Yields each page as it arrives, then `None` once the hub returns no next
/// cursor. After the first error the walker is exhausted. A cursor seen twice
/// in one walk is reported as a malformed response rather than looping.
pub struct PageWalker<'a> {
    client: &'a dyn CatalogClientPort,
    cancel: &'a CancellationToken,
    next: Option<PageCursor>,
    seen: HashSet<PageCursor>,
    pages: usize,
    done: bool,
}

impl<'a> PageWalker<'a> {
    /// Start a walk at the first page.
    pub fn new(client: &'a dyn CatalogClientPort, cancel: &'a CancellationToken) -> Self {
        Self {
            client,
            cancel,
            next: None,
            seen: HashSet::new(),
            pages: 0,
            done: false,
        }
    }

    /// Pages yielded so far.
    #[must_use]
    pub const fn pages_fetched(&self) -> usize {
        self.pages
    }

    /// Fetch the next page.
    pub async fn next_page(&mut self) -> Option<CatalogResult<CatalogPage>> {
        if self.done {
            return None;
        }
        if self.cancel.is_cancelled() {
            self.done = true;
            return Some(Err(CatalogError::Cancelled));
        }

        let page = match self.client.fetch_page(self.next.as_ref(), self.cancel).await {
            Ok(page) => page,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };

        match &page.next_cursor {
            Some(cursor) if !self.seen.insert(cursor.clone()) => {
                tracing::warn!(cursor = %cursor, "Hub returned a cursor already visited");
                self.done = true;
                return Some(Err(CatalogError::malformed(format!(
                    "pagination cursor repeated: {cursor}"
                ))));
            }
            Some(cursor) => self.next = Some(cursor.clone()),
            None => self.done = true,
        }

        self.pages += 1;
        Some(Ok(page))
    }

    /// Drain the walk, collecting every page.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered.
    pub async fn collect_all(mut self) -> CatalogResult<Vec<CatalogPage>> {
        let mut pages = Vec::new();
        while let Some(page) = self.next_page().await {
            pages.push(page?);
        }
        Ok(pages)
    }
}
