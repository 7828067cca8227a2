//! Download manager implementation.
//!
//! # Architecture
//!
//! - **Queue**: FIFO of submitted entries, guarded by an async mutex
//! - **Drain loop**: pops the front entry, waits for a limiter slot, spawns the
//!   transfer, pauses for `admission_yield`, repeats until the queue is empty
//! - **Transfers**: run on the manager's `TaskTracker` holding their
//!   [`TransferPermit`](crate::TransferPermit) until they end
//! - **Tracker**: receives every status and progress update
//!
//! # Concurrency Model
//!
//! - At most one drain loop runs at a time (`draining` flag); a submission
//!   while a loop is running is picked up by that loop
//! - Lock order: queue → tracker (consistent everywhere)
//! - Shutdown cancels the root token, closes the limiter, waits for every
//!   task, then persists the tracker snapshot once

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use url::Url;

use romdl_core::ports::{
    DestinationResolver, DownloadEventEmitterPort, DownloadManagerConfig, DownloadManagerPort,
    DownloadRequest, QueueStateStore,
};
use romdl_core::{DownloadError, DownloadHandle, DownloadItem, extract_filename};

use crate::fetcher::{FetchJob, Fetcher};
use crate::limiter::ConcurrencyLimiter;
use crate::queue::{DownloadQueue, QueueEntry};
use crate::tracker::StatusTracker;

/// Dependencies for building a download manager.
pub struct DownloadManagerDeps<R, S, E>
where
    R: DestinationResolver + 'static,
    S: QueueStateStore + 'static,
    E: DownloadEventEmitterPort + 'static,
{
    /// Maps platforms to target directories.
    pub resolver: Arc<R>,
    /// Persists unfinished work at shutdown.
    pub store: Arc<S>,
    /// Receives status and progress events.
    pub event_emitter: Arc<E>,
    /// Limits and timings.
    pub config: DownloadManagerConfig,
}

/// Build a download manager from its dependencies.
pub fn build_download_manager<R, S, E>(
    deps: DownloadManagerDeps<R, S, E>,
) -> Result<DownloadManager, DownloadError>
where
    R: DestinationResolver + 'static,
    S: QueueStateStore + 'static,
    E: DownloadEventEmitterPort + 'static,
{
    DownloadManager::new(deps)
}

struct ManagerInner {
    resolver: Arc<dyn DestinationResolver>,
    store: Arc<dyn QueueStateStore>,
    tracker: Arc<StatusTracker>,
    limiter: ConcurrencyLimiter,
    fetcher: Fetcher,
    queue: Mutex<DownloadQueue>,
    config: DownloadManagerConfig,
    shutdown: CancellationToken,
    tasks: TaskTracker,
    draining: AtomicBool,
    persisted: AtomicBool,
    idle: Notify,
}

/// Queue manager and composition of limiter, tracker, fetcher and store.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct DownloadManager {
    inner: Arc<ManagerInner>,
}

impl DownloadManager {
    /// Create a manager. Fails only if the HTTP client cannot be built.
    pub fn new<R, S, E>(deps: DownloadManagerDeps<R, S, E>) -> Result<Self, DownloadError>
    where
        R: DestinationResolver + 'static,
        S: QueueStateStore + 'static,
        E: DownloadEventEmitterPort + 'static,
    {
        let client = Fetcher::build_client(&deps.config)?;
        let emitter: Arc<dyn DownloadEventEmitterPort> = deps.event_emitter;
        let tracker = Arc::new(StatusTracker::new(emitter, deps.config.progress_interval));
        let fetcher = Fetcher::new(client, Arc::clone(&tracker), deps.config.chunk_size);

        tracing::debug!(
            target: "romdl.download",
            max_concurrent = deps.config.max_concurrent,
            chunk_size = deps.config.chunk_size,
            "Creating download manager"
        );

        Ok(Self {
            inner: Arc::new(ManagerInner {
                resolver: deps.resolver,
                store: deps.store,
                tracker,
                limiter: ConcurrencyLimiter::new(deps.config.max_concurrent),
                fetcher,
                queue: Mutex::new(DownloadQueue::new()),
                config: deps.config,
                shutdown: CancellationToken::new(),
                tasks: TaskTracker::new(),
                draining: AtomicBool::new(false),
                persisted: AtomicBool::new(false),
                idle: Notify::new(),
            }),
        })
    }

    /// Append an already-registered entry to the queue and start draining.
    ///
    /// The entry will eventually be admitted unless the manager shuts down first.
    pub async fn submit(&self, entry: QueueEntry) {
        self.inner.queue.lock().await.submit(entry);
        self.spawn_drain();
    }

    /// Admit queued entries in FIFO order until the queue is empty.
    ///
    /// Returns immediately if another drain cycle is already running; that
    /// cycle picks up anything submitted meanwhile.
    pub async fn drain(&self) {
        if self.inner.draining.swap(true, Ordering::SeqCst) {
            return;
        }
        self.drain_loop().await;
    }

    /// Current state of one item.
    pub async fn item(&self, handle: DownloadHandle) -> Option<DownloadItem> {
        self.inner.tracker.get(handle).await
    }

    fn spawn_drain(&self) {
        if self.inner.draining.swap(true, Ordering::SeqCst) {
            return;
        }
        let manager = self.clone();
        self.inner.tasks.spawn(async move {
            manager.drain_loop().await;
        });
    }

    /// Caller must have set `draining`.
    async fn drain_loop(&self) {
        loop {
            self.admit_all().await;
            self.inner.draining.store(false, Ordering::SeqCst);

            // A submission may have landed between the last pop and clearing
            // the flag; its own spawn_drain saw `draining == true` and bailed.
            let has_more = !self.inner.queue.lock().await.is_empty();
            if !has_more
                || self.inner.shutdown.is_cancelled()
                || self.inner.draining.swap(true, Ordering::SeqCst)
            {
                break;
            }
        }
        self.inner.idle.notify_waiters();
    }

    async fn admit_all(&self) {
        let inner = &self.inner;
        loop {
            if inner.shutdown.is_cancelled() {
                return;
            }
            let Some(entry) = inner.queue.lock().await.pop_front() else {
                return;
            };

            let permit = tokio::select! {
                biased;
                () = inner.shutdown.cancelled() => return,
                permit = inner.limiter.acquire() => permit,
            };
            let Ok(permit) = permit else {
                return;
            };

            tracing::info!(
                target: "romdl.download",
                handle = %entry.handle,
                url = %entry.url,
                active = inner.limiter.active(),
                "Admitting transfer"
            );

            let job = FetchJob {
                entry,
                cancel: inner.shutdown.child_token(),
            };
            let fetcher = inner.fetcher.clone();
            let manager = Arc::clone(inner);
            inner.tasks.spawn(async move {
                {
                    let _permit = permit;
                    fetcher.run(job).await;
                }
                manager.idle.notify_waiters();
            });

            tokio::select! {
                biased;
                () = inner.shutdown.cancelled() => return,
                () = tokio::time::sleep(inner.config.admission_yield) => {}
            }
        }
    }

    async fn is_idle(&self) -> bool {
        !self.inner.draining.load(Ordering::SeqCst)
            && self.inner.limiter.active() == 0
            && self.inner.queue.lock().await.is_empty()
    }
}

#[async_trait]
impl DownloadManagerPort for DownloadManager {
    async fn enqueue(&self, request: DownloadRequest) -> Result<DownloadHandle, DownloadError> {
        if self.inner.shutdown.is_cancelled() {
            return Err(DownloadError::Cancelled);
        }

        let url =
            Url::parse(&request.url).map_err(|_| DownloadError::invalid_locator(&request.url))?;
        if extract_filename(&url).is_empty() {
            return Err(DownloadError::invalid_locator(&request.url));
        }
        let target_directory = self
            .inner
            .resolver
            .resolve_destination(&request.platform)
            .ok_or_else(|| DownloadError::unknown_platform(&request.platform))?;

        let handle = {
            let mut queue = self.inner.queue.lock().await;
            if self.inner.tracker.find_in_flight(&url).await.is_some() {
                return Err(DownloadError::already_queued(url.as_str()));
            }
            let handle = self
                .inner
                .tracker
                .register(
                    url.clone(),
                    &request.size,
                    &request.platform,
                    target_directory.clone(),
                    request.status,
                )
                .await;
            queue.submit(QueueEntry::new(url, handle, target_directory));
            handle
        };

        tracing::info!(
            target: "romdl.download",
            %handle,
            url = %request.url,
            platform = %request.platform,
            status = %request.status,
            "Queued download"
        );
        self.spawn_drain();
        Ok(handle)
    }

    async fn restore(&self) -> Result<Vec<DownloadHandle>, DownloadError> {
        let records = self.inner.store.load().await?;
        let mut handles = Vec::with_capacity(records.len());

        for record in &records {
            match self.enqueue(DownloadRequest::from(record)).await {
                Ok(handle) => handles.push(handle),
                Err(e) => tracing::warn!(
                    target: "romdl.download",
                    url = %record.url,
                    platform = %record.platform,
                    error = %e,
                    "Skipping persisted item"
                ),
            }
        }
        Ok(handles)
    }

    async fn snapshot(&self) -> Vec<DownloadItem> {
        self.inner.tracker.snapshot().await
    }

    fn active_count(&self) -> usize {
        self.inner.limiter.active()
    }

    async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            if self.is_idle().await {
                return;
            }
            notified.await;
        }
    }

    async fn shutdown(&self) -> Result<(), DownloadError> {
        if self.inner.persisted.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        tracing::info!(target: "romdl.download", "Shutting down download manager");
        self.inner.shutdown.cancel();
        self.inner.limiter.close();
        self.inner.tasks.close();
        self.inner.tasks.wait().await;

        let records = self.inner.tracker.records().await;
        self.inner.store.save(&records).await?;
        Ok(())
    }
}
