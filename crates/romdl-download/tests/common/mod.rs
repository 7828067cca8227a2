//! Shared fixtures for download integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use romdl_core::ports::{DownloadEventEmitterPort, DownloadManagerConfig};
use romdl_core::{DownloadEvent, DownloadHandle, DownloadStatus};
use romdl_download::{DownloadManager, DownloadManagerDeps, JsonQueueStore, build_download_manager};

pub const PLATFORM: &str = "snes";

/// Deterministic body of `len` bytes.
pub fn body(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// Emitter that records every event.
#[derive(Clone, Default)]
pub struct RecordingEmitter {
    events: Arc<Mutex<Vec<DownloadEvent>>>,
}

impl RecordingEmitter {
    pub fn events(&self) -> Vec<DownloadEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Status changes of one handle, in emission order.
    pub fn statuses(&self, handle: DownloadHandle) -> Vec<DownloadStatus> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                DownloadEvent::StatusChanged { handle: h, status } if h == handle => Some(status),
                _ => None,
            })
            .collect()
    }

    /// Handles in the order they reached `status`.
    pub fn reached(&self, status: DownloadStatus) -> Vec<DownloadHandle> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                DownloadEvent::StatusChanged { handle, status: s } if s == status => Some(handle),
                _ => None,
            })
            .collect()
    }

    /// Highest number of items simultaneously in `Downloading`.
    pub fn max_concurrent_downloading(&self) -> usize {
        let mut active = std::collections::HashSet::new();
        let mut max = 0;
        for event in self.events() {
            if let DownloadEvent::StatusChanged { handle, status } = event {
                if status == DownloadStatus::Downloading {
                    active.insert(handle);
                } else {
                    active.remove(&handle);
                }
                max = max.max(active.len());
            }
        }
        max
    }
}

impl DownloadEventEmitterPort for RecordingEmitter {
    fn emit(&self, event: DownloadEvent) {
        self.events.lock().unwrap().push(event);
    }

    fn clone_box(&self) -> Box<dyn DownloadEventEmitterPort> {
        Box::new(self.clone())
    }
}

pub fn target_dir(root: &Path) -> PathBuf {
    root.join("out").join(PLATFORM)
}

pub fn queue_file(root: &Path) -> PathBuf {
    root.join("data").join("queue.json")
}

pub fn test_config(capacity: usize) -> DownloadManagerConfig {
    DownloadManagerConfig::default()
        .with_max_concurrent(capacity)
        .with_admission_yield(Duration::from_millis(5))
        .with_progress_interval(Duration::ZERO)
        .with_chunk_size(512)
}

/// Manager writing into `<root>/out/snes` and persisting to `<root>/data/queue.json`.
pub fn manager(root: &Path, emitter: &RecordingEmitter, capacity: usize) -> DownloadManager {
    let mut resolver = HashMap::new();
    resolver.insert(PLATFORM.to_string(), target_dir(root));

    build_download_manager(DownloadManagerDeps {
        resolver: Arc::new(resolver),
        store: Arc::new(JsonQueueStore::new(queue_file(root))),
        event_emitter: Arc::new(emitter.clone()),
        config: test_config(capacity),
    })
    .unwrap()
}

/// Wait for the manager to settle, failing the test after ten seconds.
pub async fn settle(manager: &DownloadManager) {
    use romdl_core::ports::DownloadManagerPort;

    tokio::time::timeout(Duration::from_secs(10), manager.wait_idle())
        .await
        .expect("manager did not become idle");
}
