//! Download domain types, events and errors.

mod errors;
mod events;
mod types;

pub use errors::DownloadError;
pub use events::DownloadEvent;
pub use types::{
    CatalogEntry, DownloadHandle, DownloadItem, DownloadStatus, PersistedQueueRecord,
    extract_filename,
};
