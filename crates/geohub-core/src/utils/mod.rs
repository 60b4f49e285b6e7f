//! Small shared helpers.

mod size;

pub use size::format_bytes;
