//! Terminal output helpers.

mod progress;
mod records;
mod tables;

pub use progress::{DownloadBar, SyncSpinner};
pub use records::{print_record_details, print_record_table};
pub use tables::{format_date, print_separator, truncate_string};
