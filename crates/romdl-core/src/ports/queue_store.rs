//! Queue persistence port.

use async_trait::async_trait;
use thiserror::Error;

use crate::download::{DownloadError, PersistedQueueRecord};

/// Errors raised by queue persistence adapters.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Reading, writing or removing the queue file failed.
    #[error("Queue file I/O failed at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The queue file exists but is not a valid record array.
    #[error("Queue file {path} is malformed: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<PersistenceError> for DownloadError {
    fn from(err: PersistenceError) -> Self {
        Self::persistence(err.to_string())
    }
}

/// Durable storage for the unfinished-work queue.
///
/// `save` receives the full tracker snapshot; filtering out finished items is
/// the store's job so every adapter applies the same rule.
#[async_trait]
pub trait QueueStateStore: Send + Sync {
    /// Persist every record whose status is not `Complete`.
    ///
    /// When nothing remains the backing artifact is removed.
    async fn save(&self, records: &[PersistedQueueRecord]) -> Result<(), PersistenceError>;

    /// Load persisted records, remapping `Downloading` to `Resuming`.
    ///
    /// A missing artifact yields an empty list.
    async fn load(&self) -> Result<Vec<PersistedQueueRecord>, PersistenceError>;
}
