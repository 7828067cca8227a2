//! Authoritative in-memory record of every item's status and progress.
//!
//! The tracker is the single source of truth for both the presentation surface
//! (snapshots and emitted events) and the persistence store (snapshot at
//! shutdown). `record_status` and `record_progress` are its only mutators.
//!
//! Events are emitted after the state lock is released.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use tokio::sync::RwLock;
use url::Url;

use romdl_core::ports::DownloadEventEmitterPort;
use romdl_core::{DownloadEvent, DownloadHandle, DownloadItem, DownloadStatus, PersistedQueueRecord};

use crate::progress::ProgressThrottle;

/// Items stay for the whole run so the shutdown snapshot sees them; throttles
/// exist only while an item is unfinished.
#[derive(Default)]
struct TrackerState {
    items: IndexMap<DownloadHandle, DownloadItem>,
    throttles: HashMap<DownloadHandle, ProgressThrottle>,
    next_handle: u64,
}

/// Status and progress record keyed by [`DownloadHandle`].
pub struct StatusTracker {
    state: RwLock<TrackerState>,
    emitter: Arc<dyn DownloadEventEmitterPort>,
    progress_interval: Duration,
}

impl StatusTracker {
    /// Create an empty tracker publishing to `emitter`.
    pub fn new(emitter: Arc<dyn DownloadEventEmitterPort>, progress_interval: Duration) -> Self {
        Self {
            state: RwLock::new(TrackerState::default()),
            emitter,
            progress_interval,
        }
    }

    /// Register a new item and return its handle.
    ///
    /// Emits `Queued` followed by `StatusChanged` with the initial status.
    pub async fn register(
        &self,
        url: Url,
        size: &str,
        platform: &str,
        target_directory: PathBuf,
        status: DownloadStatus,
    ) -> DownloadHandle {
        let (handle, name) = {
            let mut state = self.state.write().await;
            state.next_handle += 1;
            let handle = DownloadHandle::new(state.next_handle);

            let mut item = DownloadItem::new(handle, url, size, platform, target_directory);
            item.status = status;
            let name = item.name.clone();

            state.items.insert(handle, item);
            state
                .throttles
                .insert(handle, ProgressThrottle::new(self.progress_interval));
            (handle, name)
        };

        self.emitter.emit(DownloadEvent::Queued {
            handle,
            name,
            size: size.to_string(),
        });
        self.emitter.emit(DownloadEvent::status(handle, status));
        handle
    }

    /// Record a status change.
    ///
    /// Re-recording the current status is a no-op. Backward transitions are
    /// refused. Returns whether the item now has `status`.
    pub async fn record_status(&self, handle: DownloadHandle, status: DownloadStatus) -> bool {
        {
            let mut state = self.state.write().await;
            let Some(item) = state.items.get_mut(&handle) else {
                tracing::warn!(target: "romdl.download", %handle, "Status for unknown handle");
                return false;
            };

            if item.status == status {
                return true;
            }
            if !item.status.can_transition_to(status) {
                tracing::warn!(
                    target: "romdl.download",
                    %handle,
                    from = %item.status,
                    to = %status,
                    "Refusing backward status transition"
                );
                return false;
            }
            item.status = status;

            if status.is_terminal() {
                state.throttles.remove(&handle);
            }
        }

        self.emitter.emit(DownloadEvent::status(handle, status));
        true
    }

    /// Record byte progress.
    ///
    /// `percent` is clamped to 0-100. Events are rate-limited per item,
    /// except that reaching 100% is always published. Finished items keep
    /// their last progress.
    pub async fn record_progress(
        &self,
        handle: DownloadHandle,
        percent: f64,
        downloaded: u64,
        total: u64,
    ) {
        let percent = percent.clamp(0.0, 100.0);
        let emit = {
            let mut state = self.state.write().await;
            let Some(item) = state.items.get_mut(&handle) else {
                return;
            };
            if item.status.is_terminal() {
                return;
            }
            item.progress_percent = percent;

            state
                .throttles
                .get_mut(&handle)
                .is_none_or(|throttle| throttle.admit(percent))
        };

        if emit {
            self.emitter
                .emit(DownloadEvent::progress(handle, percent, downloaded, total));
        }
    }

    /// Current state of one item.
    pub async fn get(&self, handle: DownloadHandle) -> Option<DownloadItem> {
        self.state.read().await.items.get(&handle).cloned()
    }

    /// Every item in registration order.
    pub async fn snapshot(&self) -> Vec<DownloadItem> {
        self.state.read().await.items.values().cloned().collect()
    }

    /// Durable records for every item in registration order.
    pub async fn records(&self) -> Vec<PersistedQueueRecord> {
        self.state
            .read()
            .await
            .items
            .values()
            .map(DownloadItem::to_record)
            .collect()
    }

    /// Handle of a non-terminal item with the same locator, if any.
    pub async fn find_in_flight(&self, url: &Url) -> Option<DownloadHandle> {
        self.state
            .read()
            .await
            .items
            .values()
            .find(|item| &item.url == url && !item.status.is_terminal())
            .map(|item| item.handle)
    }
}

#[cfg(test)]
mod tests {
    use romdl_core::ports::{ChannelDownloadEmitter, NoopDownloadEmitter};
    use tokio::sync::mpsc::UnboundedReceiver;

    use super::*;

    fn url(name: &str) -> Url {
        Url::parse(&format!("https://host/{name}")).unwrap()
    }

    fn tracker_with_channel() -> (StatusTracker, UnboundedReceiver<DownloadEvent>) {
        let (emitter, rx) = ChannelDownloadEmitter::new();
        (StatusTracker::new(Arc::new(emitter), Duration::from_secs(60)), rx)
    }

    fn drain(rx: &mut UnboundedReceiver<DownloadEvent>) -> Vec<DownloadEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    async fn register(tracker: &StatusTracker, name: &str) -> DownloadHandle {
        tracker
            .register(url(name), "1 KiB", "snes", PathBuf::from("/out"), DownloadStatus::Pending)
            .await
    }

    #[tokio::test]
    async fn test_register_assigns_sequential_handles() {
        let (tracker, mut rx) = tracker_with_channel();
        let a = register(&tracker, "a.zip").await;
        let b = register(&tracker, "b.zip").await;

        assert_eq!(a, DownloadHandle::new(1));
        assert_eq!(b, DownloadHandle::new(2));

        let events = drain(&mut rx);
        assert_eq!(events.len(), 4);
        assert!(matches!(&events[0], DownloadEvent::Queued { name, .. } if name == "a.zip"));
        assert_eq!(events[1], DownloadEvent::status(a, DownloadStatus::Pending));
    }

    #[tokio::test]
    async fn test_status_forward_only() {
        let (tracker, mut rx) = tracker_with_channel();
        let handle = register(&tracker, "a.zip").await;
        drain(&mut rx);

        assert!(tracker.record_status(handle, DownloadStatus::Downloading).await);
        assert!(tracker.record_status(handle, DownloadStatus::Complete).await);
        assert!(!tracker.record_status(handle, DownloadStatus::Downloading).await);
        assert_eq!(tracker.get(handle).await.unwrap().status, DownloadStatus::Complete);

        let events = drain(&mut rx);
        assert_eq!(events, vec![
            DownloadEvent::status(handle, DownloadStatus::Downloading),
            DownloadEvent::status(handle, DownloadStatus::Complete),
        ]);
    }

    #[tokio::test]
    async fn test_status_idempotent() {
        let (tracker, mut rx) = tracker_with_channel();
        let handle = register(&tracker, "a.zip").await;
        drain(&mut rx);

        assert!(tracker.record_status(handle, DownloadStatus::Downloading).await);
        assert!(tracker.record_status(handle, DownloadStatus::Downloading).await);
        assert_eq!(drain(&mut rx).len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_handle_ignored() {
        let (tracker, _rx) = tracker_with_channel();
        assert!(
            !tracker
                .record_status(DownloadHandle::new(99), DownloadStatus::Error)
                .await
        );
        tracker
            .record_progress(DownloadHandle::new(99), 50.0, 1, 2)
            .await;
        assert!(tracker.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_progress_throttled_but_final_always_emitted() {
        let (tracker, mut rx) = tracker_with_channel();
        let handle = register(&tracker, "a.zip").await;
        drain(&mut rx);

        tracker.record_progress(handle, 10.0, 10, 100).await;
        tracker.record_progress(handle, 20.0, 20, 100).await;
        tracker.record_progress(handle, 100.0, 100, 100).await;

        let events = drain(&mut rx);
        assert_eq!(events, vec![
            DownloadEvent::progress(handle, 10.0, 10, 100),
            DownloadEvent::progress(handle, 100.0, 100, 100),
        ]);

        // Last write wins even when the event was throttled.
        let item = tracker.get(handle).await.unwrap();
        assert!((item.progress_percent - 100.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_progress_clamped() {
        let tracker = StatusTracker::new(Arc::new(NoopDownloadEmitter::new()), Duration::ZERO);
        let handle = register(&tracker, "a.zip").await;

        tracker.record_progress(handle, 140.0, 14, 10).await;
        let item = tracker.get(handle).await.unwrap();
        assert!((item.progress_percent - 100.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_find_in_flight_skips_terminal() {
        let tracker = StatusTracker::new(Arc::new(NoopDownloadEmitter::new()), Duration::ZERO);
        let handle = register(&tracker, "a.zip").await;

        assert_eq!(tracker.find_in_flight(&url("a.zip")).await, Some(handle));
        assert_eq!(tracker.find_in_flight(&url("b.zip")).await, None);

        tracker.record_status(handle, DownloadStatus::Error).await;
        assert_eq!(tracker.find_in_flight(&url("a.zip")).await, None);
    }

    #[tokio::test]
    async fn test_records_keep_registration_order() {
        let tracker = StatusTracker::new(Arc::new(NoopDownloadEmitter::new()), Duration::ZERO);
        let a = register(&tracker, "a.zip").await;
        register(&tracker, "b.zip").await;
        tracker.record_status(a, DownloadStatus::Downloading).await;

        let records = tracker.records().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "a.zip");
        assert_eq!(records[0].status, DownloadStatus::Downloading);
        assert_eq!(records[1].name, "b.zip");
        assert_eq!(records[1].status, DownloadStatus::Pending);
    }

    #[tokio::test]
    async fn test_finished_items_drop_their_throttle() {
        let (tracker, mut rx) = tracker_with_channel();
        let done = register(&tracker, "a.zip").await;
        let failed = register(&tracker, "b.zip").await;
        register(&tracker, "c.zip").await;
        assert_eq!(tracker.state.read().await.throttles.len(), 3);

        tracker.record_progress(done, 100.0, 10, 10).await;
        tracker.record_status(done, DownloadStatus::Complete).await;
        tracker.record_progress(failed, 40.0, 4, 10).await;
        tracker.record_status(failed, DownloadStatus::Error).await;
        assert_eq!(tracker.state.read().await.throttles.len(), 1);
        drain(&mut rx);

        // Late progress for a finished item changes nothing.
        tracker.record_progress(failed, 60.0, 6, 10).await;
        assert!(drain(&mut rx).is_empty());
        let item = tracker.get(failed).await.unwrap();
        assert!((item.progress_percent - 40.0).abs() < f64::EPSILON);
        assert_eq!(tracker.snapshot().await.len(), 3);
    }
}
