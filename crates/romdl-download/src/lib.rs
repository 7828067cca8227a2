//! Download queue and resumable transfer manager.
//!
//! - [`ConcurrencyLimiter`] bounds how many transfers run at once
//! - [`DownloadQueue`] holds submitted entries in FIFO order
//! - [`StatusTracker`] is the authoritative per-item status/progress record
//! - [`fetcher`] performs one byte-range-aware resumable HTTP transfer
//! - [`JsonQueueStore`] persists unfinished work across restarts
//! - [`DownloadManager`] wires them together and implements `DownloadManagerPort`

pub mod fetcher;
mod limiter;
mod manager;
mod progress;
mod queue;
mod store;
mod tracker;

pub use fetcher::{FetchJob, FetchOutcome, Fetcher};
pub use limiter::{ConcurrencyLimiter, TransferPermit};
pub use manager::{DownloadManager, DownloadManagerDeps, build_download_manager};
pub use progress::ProgressThrottle;
pub use queue::{DownloadQueue, QueueEntry};
pub use store::JsonQueueStore;
pub use tracker::StatusTracker;
