//! Download manager port and configuration.

use std::time::Duration;

use async_trait::async_trait;

use crate::download::{
    CatalogEntry, DownloadError, DownloadHandle, DownloadItem, DownloadStatus,
    PersistedQueueRecord,
};

/// A request to download one remote file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Remote locator.
    pub url: String,
    /// Catalog size label.
    pub size: String,
    /// Platform used to resolve the target directory.
    pub platform: String,
    /// Initial status: `Pending` for new work, `Resuming` for reloaded work.
    pub status: DownloadStatus,
}

impl DownloadRequest {
    /// Create a pending request.
    pub fn new(url: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            size: String::new(),
            platform: platform.into(),
            status: DownloadStatus::Pending,
        }
    }

    /// Set the catalog size label.
    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    /// Set the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: DownloadStatus) -> Self {
        self.status = status;
        self
    }
}

impl From<&CatalogEntry> for DownloadRequest {
    fn from(entry: &CatalogEntry) -> Self {
        Self::new(&entry.url, &entry.platform).with_size(&entry.size)
    }
}

impl From<&PersistedQueueRecord> for DownloadRequest {
    /// Reloaded records keep `Resuming`; everything else starts over as `Pending`.
    fn from(record: &PersistedQueueRecord) -> Self {
        let status = match record.status.after_reload() {
            DownloadStatus::Resuming => DownloadStatus::Resuming,
            _ => DownloadStatus::Pending,
        };
        Self::new(&record.url, &record.platform)
            .with_size(&record.size)
            .with_status(status)
    }
}

/// Configuration for creating a download manager.
#[derive(Debug, Clone)]
pub struct DownloadManagerConfig {
    /// Maximum concurrent transfers.
    pub max_concurrent: usize,
    /// Largest slice of the body written and reported at once.
    pub chunk_size: usize,
    /// Pause between two admissions of the drain loop.
    pub admission_yield: Duration,
    /// Minimum interval between two progress events for the same item.
    pub progress_interval: Duration,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
}

impl Default for DownloadManagerConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 1,
            chunk_size: 1024,
            admission_yield: Duration::from_millis(100),
            progress_interval: Duration::from_millis(100),
            user_agent: concat!("romdl/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout: Duration::from_secs(30),
        }
    }
}

impl DownloadManagerConfig {
    /// Set the maximum concurrent transfers (at least 1).
    #[must_use]
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max.max(1);
        self
    }

    /// Set the chunk size (at least 1 byte).
    #[must_use]
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    /// Set the pause between admissions.
    #[must_use]
    pub const fn with_admission_yield(mut self, pause: Duration) -> Self {
        self.admission_yield = pause;
        self
    }

    /// Set the progress event interval.
    #[must_use]
    pub const fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }
}

/// Port for managing downloads.
///
/// ```ignore
/// let manager: Arc<dyn DownloadManagerPort> = /* ... */;
/// manager.restore().await?;
/// let handle = manager.enqueue(DownloadRequest::new(url, "snes")).await?;
/// manager.wait_idle().await;
/// manager.shutdown().await?;
/// ```
#[async_trait]
pub trait DownloadManagerPort: Send + Sync {
    /// Resolve, register and submit a request, then start draining.
    ///
    /// Fails without enqueuing anything if the platform does not resolve or
    /// the locator is already in flight.
    async fn enqueue(&self, request: DownloadRequest) -> Result<DownloadHandle, DownloadError>;

    /// Reload the persisted queue and enqueue every record.
    ///
    /// Records that fail to resolve are skipped and logged.
    async fn restore(&self) -> Result<Vec<DownloadHandle>, DownloadError>;

    /// Current state of every tracked item, in registration order.
    async fn snapshot(&self) -> Vec<DownloadItem>;

    /// Number of transfers currently holding a concurrency slot.
    fn active_count(&self) -> usize;

    /// Wait until nothing is queued and no transfer is running.
    async fn wait_idle(&self);

    /// Cancel in-flight work, wait for it to stop, and persist unfinished items.
    ///
    /// Persists at most once per manager; later calls are no-ops.
    async fn shutdown(&self) -> Result<(), DownloadError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: DownloadStatus) -> PersistedQueueRecord {
        PersistedQueueRecord {
            name: "a.zip".into(),
            size: "1 KiB".into(),
            url: "https://host/a.zip".into(),
            platform: "snes".into(),
            status,
        }
    }

    #[test]
    fn test_request_from_record_status_mapping() {
        assert_eq!(
            DownloadRequest::from(&record(DownloadStatus::Downloading)).status,
            DownloadStatus::Resuming
        );
        assert_eq!(
            DownloadRequest::from(&record(DownloadStatus::Resuming)).status,
            DownloadStatus::Resuming
        );
        assert_eq!(
            DownloadRequest::from(&record(DownloadStatus::Error)).status,
            DownloadStatus::Pending
        );
        assert_eq!(
            DownloadRequest::from(&record(DownloadStatus::Pending)).status,
            DownloadStatus::Pending
        );
    }

    #[test]
    fn test_request_from_catalog_entry() {
        let entry = CatalogEntry {
            name: "Game".into(),
            url: "https://host/Game.zip".into(),
            size: "2 MiB".into(),
            platform: "gba".into(),
        };
        let request = DownloadRequest::from(&entry);
        assert_eq!(request.url, entry.url);
        assert_eq!(request.size, "2 MiB");
        assert_eq!(request.status, DownloadStatus::Pending);
    }

    #[test]
    fn test_config_builder_clamps() {
        let config = DownloadManagerConfig::default()
            .with_max_concurrent(0)
            .with_chunk_size(0);
        assert_eq!(config.max_concurrent, 1);
        assert_eq!(config.chunk_size, 1);
    }

    #[test]
    fn test_config_defaults() {
        let config = DownloadManagerConfig::default();
        assert_eq!(config.max_concurrent, 1);
        assert_eq!(config.chunk_size, 1024);
        assert_eq!(config.admission_yield, Duration::from_millis(100));
    }
}
