//! JSON file implementation of `QueueStateStore`.
//!
//! The queue file is an ordered JSON array of `PersistedQueueRecord`.
//! Writes go to a sibling temp file that is synced and renamed over the real
//! one, so a crash mid-save never leaves a half-written queue behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use romdl_core::ports::{PersistenceError, QueueStateStore};
use romdl_core::{DownloadStatus, PersistedQueueRecord};

/// Queue store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonQueueStore {
    path: PathBuf,
}

impl JsonQueueStore {
    /// Create a store for `path`. Nothing is touched until `save` or `load`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the queue file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    async fn remove_if_present(&self) -> Result<(), PersistenceError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    async fn write_atomically(&self, content: &[u8]) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        {
            let mut temp_file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .await
                .map_err(|e| self.io_error(e))?;
            temp_file
                .write_all(content)
                .await
                .map_err(|e| self.io_error(e))?;
            temp_file.sync_all().await.map_err(|e| self.io_error(e))?;
        }

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| self.io_error(e))
    }
}

#[async_trait]
impl QueueStateStore for JsonQueueStore {
    async fn save(&self, records: &[PersistedQueueRecord]) -> Result<(), PersistenceError> {
        let remaining: Vec<&PersistedQueueRecord> = records
            .iter()
            .filter(|record| record.status != DownloadStatus::Complete)
            .collect();

        if remaining.is_empty() {
            tracing::debug!(target: "romdl.store", path = %self.path.display(), "Queue empty, removing file");
            return self.remove_if_present().await;
        }

        let content =
            serde_json::to_vec_pretty(&remaining).map_err(|e| PersistenceError::Malformed {
                path: self.path.display().to_string(),
                source: e,
            })?;
        self.write_atomically(&content).await?;

        tracing::info!(
            target: "romdl.store",
            path = %self.path.display(),
            count = remaining.len(),
            "Saved download queue"
        );
        Ok(())
    }

    async fn load(&self) -> Result<Vec<PersistedQueueRecord>, PersistenceError> {
        let content = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        let mut records: Vec<PersistedQueueRecord> =
            serde_json::from_slice(&content).map_err(|e| PersistenceError::Malformed {
                path: self.path.display().to_string(),
                source: e,
            })?;
        for record in &mut records {
            record.status = record.status.after_reload();
        }

        tracing::info!(
            target: "romdl.store",
            path = %self.path.display(),
            count = records.len(),
            "Loaded download queue"
        );
        Ok(records)
    }
}
