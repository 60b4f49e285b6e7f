//! Domain types for the hub catalog.
//!
//! Pure data with no infrastructure dependencies.

mod catalog;
mod resource;

pub use catalog::{Catalog, CatalogPage, PageCursor};
pub use resource::{ResourceRecord, ResourceType};
