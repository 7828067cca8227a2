//! Core domain types and ports for romdl.
//!
//! This crate holds everything the download engine and its adapters agree on:
//! the item model and status lifecycle, download events, errors, the ports
//! (destination resolution, event emission, queue persistence, catalog
//! source), catalog settings and path resolution.
//!
//! It performs no network I/O. Concrete adapters live in `romdl-download`,
//! `romdl-catalog` and `romdl-cli`.

pub mod download;
pub mod paths;
pub mod ports;
pub mod settings;

pub use download::{
    CatalogEntry, DownloadError, DownloadEvent, DownloadHandle, DownloadItem, DownloadStatus,
    PersistedQueueRecord, extract_filename,
};
pub use settings::{CatalogSettings, PlatformSettings, SettingsError};
