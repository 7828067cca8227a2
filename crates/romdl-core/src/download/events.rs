//! Download events - discriminated union for item state changes.

use serde::{Deserialize, Serialize};

use super::types::{DownloadHandle, DownloadStatus};

/// Events published to the presentation surface.
///
/// Serialized as an internally tagged union:
///
/// ```text
/// { "type": "queued", "handle": 1, "name": "game.zip", "size": "1 MiB" }
/// { "type": "status_changed", "handle": 1, "status": "downloading" }
/// { "type": "progress", "handle": 1, "percent": 12.5, "downloaded": 131072, "total": 1048576 }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DownloadEvent {
    /// A new item was registered.
    Queued {
        /// Handle of the new item.
        handle: DownloadHandle,
        /// Local file name.
        name: String,
        /// Catalog size label.
        size: String,
    },

    /// An item changed lifecycle state.
    StatusChanged {
        /// Handle of the item.
        handle: DownloadHandle,
        /// The new status.
        status: DownloadStatus,
    },

    /// Byte progress for an item.
    Progress {
        /// Handle of the item.
        handle: DownloadHandle,
        /// Progress percentage (0.0 - 100.0).
        percent: f64,
        /// Bytes present on disk, including any resumed prefix.
        downloaded: u64,
        /// Expected final file length.
        total: u64,
    },
}

impl DownloadEvent {
    /// Handle of the item this event refers to.
    #[must_use]
    pub const fn handle(&self) -> DownloadHandle {
        match self {
            Self::Queued { handle, .. }
            | Self::StatusChanged { handle, .. }
            | Self::Progress { handle, .. } => *handle,
        }
    }

    /// Create a status change event.
    #[must_use]
    pub const fn status(handle: DownloadHandle, status: DownloadStatus) -> Self {
        Self::StatusChanged { handle, status }
    }

    /// Create a progress event.
    #[must_use]
    pub const fn progress(handle: DownloadHandle, percent: f64, downloaded: u64, total: u64) -> Self {
        Self::Progress {
            handle,
            percent,
            downloaded,
            total,
        }
    }
}
