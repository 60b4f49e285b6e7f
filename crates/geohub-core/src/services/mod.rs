//! Core services.
//!
//! - `pages` - lazy cursor-following page iteration
//! - `sync` - the sync orchestrator and its state machine

mod pages;
mod sync;

pub use pages::PageWalker;
pub use sync::{LoadOutcome, SyncError, SyncOrchestrator, SyncReport, SyncState, SyncStatus};
