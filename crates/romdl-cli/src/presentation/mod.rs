//! Shared CLI presentation utilities.
//!
//! Format-only: no domain transforms live here.

pub mod progress;
pub mod tables;

pub use progress::{ProgressBoard, format_percent};
pub use tables::{
    catalog_header, catalog_row, print_separator, queue_header, queue_row, truncate_string,
};
