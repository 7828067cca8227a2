//! Download item model and status lifecycle.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

/// Opaque handle identifying one tracked download for the lifetime of the process.
///
/// Handles are issued by the tracker in registration order and are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DownloadHandle(u64);

impl DownloadHandle {
    /// Wrap a raw handle value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw handle value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DownloadHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle state of a download item.
///
/// Transitions only move forward:
/// `Pending -> {Resuming | Downloading} -> Downloading -> {Complete | Error}`.
/// `Resuming` is only assigned to items reloaded from a previous run that were
/// mid-transfer when the process exited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadStatus {
    /// Waiting for admission.
    Pending,
    /// Reloaded from a previous run; a ranged request will continue the file.
    Resuming,
    /// Bytes are being received.
    Downloading,
    /// All expected bytes were written.
    Complete,
    /// The transfer failed. See logs for the cause.
    Error,
}

impl DownloadStatus {
    const fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Resuming => 1,
            Self::Downloading => 2,
            Self::Complete | Self::Error => 3,
        }
    }

    /// Whether the item has reached a final state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Error)
    }

    /// Whether moving from `self` to `next` respects the forward-only lifecycle.
    ///
    /// Re-asserting the current status is always allowed.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        if self as u8 == next as u8 {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        next.rank() > self.rank()
    }

    /// Status an item takes when it is reloaded from the persisted queue.
    ///
    /// An item that was `Downloading` when the queue was written is resumed.
    #[must_use]
    pub const fn after_reload(self) -> Self {
        match self {
            Self::Downloading => Self::Resuming,
            other => other,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Resuming => "Resuming",
            Self::Downloading => "Downloading",
            Self::Complete => "Complete",
            Self::Error => "Error",
        }
    }
}

impl fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One entry of a platform catalog, as scraped from a directory listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Display name (file name without the platform extension).
    pub name: String,
    /// Fully-qualified URL of the file.
    pub url: String,
    /// Human-readable size as shown by the listing.
    pub size: String,
    /// Platform the entry belongs to.
    pub platform: String,
}

/// Durable form of a download item, written to the queue file at shutdown.
///
/// No byte offset is stored: a resumed transfer re-derives it from the
/// partial file on disk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedQueueRecord {
    pub name: String,
    pub size: String,
    pub url: String,
    pub platform: String,
    pub status: DownloadStatus,
}

/// A requested transfer and its live state.
#[derive(Clone, Debug, PartialEq)]
pub struct DownloadItem {
    /// Handle under which the tracker records this item.
    pub handle: DownloadHandle,
    /// Local file name, derived from the last path segment of `url`.
    pub name: String,
    /// Remote locator.
    pub url: Url,
    /// Size as advertised by the catalog. Informational only.
    pub size: String,
    /// Destination grouping key.
    pub platform: String,
    /// Absolute directory the file is written to.
    pub target_directory: PathBuf,
    /// Current lifecycle state.
    pub status: DownloadStatus,
    /// Progress in percent (0.0 - 100.0).
    pub progress_percent: f64,
}

impl DownloadItem {
    /// Create a pending item.
    pub fn new(
        handle: DownloadHandle,
        url: Url,
        size: impl Into<String>,
        platform: impl Into<String>,
        target_directory: PathBuf,
    ) -> Self {
        Self {
            handle,
            name: extract_filename(&url),
            url,
            size: size.into(),
            platform: platform.into(),
            target_directory,
            status: DownloadStatus::Pending,
            progress_percent: 0.0,
        }
    }

    /// Progress formatted with two decimals, e.g. `42.17%`.
    pub fn progress_label(&self) -> String {
        format!("{:.2}%", self.progress_percent)
    }

    /// Durable record for the queue file.
    pub fn to_record(&self) -> PersistedQueueRecord {
        PersistedQueueRecord {
            name: self.name.clone(),
            size: self.size.clone(),
            url: self.url.to_string(),
            platform: self.platform.clone(),
            status: self.status,
        }
    }
}

/// Derive the local file name from a remote locator.
///
/// Takes the last `/`-separated segment of the URL path and percent-decodes it.
/// Returns an empty string when the path ends with `/` or the decoded name
/// would leave the target directory.
pub fn extract_filename(url: &Url) -> String {
    let segment = url.path().rsplit('/').next().unwrap_or_default();
    let name = urlencoding::decode(segment).map_or_else(|_| segment.to_string(), |s| s.into_owned());
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return String::new();
    }
    name
}
