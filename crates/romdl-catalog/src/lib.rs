//! Platform catalogs for romdl.
//!
//! Each configured platform points at a directory-listing page. This crate
//! fetches that page, extracts the downloadable entries and filters them by
//! name. It implements the `CatalogSource` port from `romdl-core`.

mod client;
mod filter;
mod listing;

pub use client::HttpCatalogSource;
pub use filter::filter_entries;
pub use listing::{ListingContext, ListingParser};

