//! Pending download queue.
//!
//! A pure synchronous FIFO. No I/O, no async, no tracing; the manager owns
//! the lock around it and decides when to drain.

use std::collections::VecDeque;
use std::path::PathBuf;

use url::Url;

use romdl_core::DownloadHandle;

/// A submitted transfer awaiting admission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    /// Remote locator.
    pub url: Url,
    /// Tracker handle the transfer reports under.
    pub handle: DownloadHandle,
    /// Directory the file is written to.
    pub target_directory: PathBuf,
}

impl QueueEntry {
    /// Create a new entry.
    pub const fn new(url: Url, handle: DownloadHandle, target_directory: PathBuf) -> Self {
        Self {
            url,
            handle,
            target_directory,
        }
    }
}

/// FIFO of entries not yet admitted to the limiter.
#[derive(Debug, Default)]
pub struct DownloadQueue {
    pending: VecDeque<QueueEntry>,
}

impl DownloadQueue {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }

    /// Append an entry at the back.
    pub fn submit(&mut self, entry: QueueEntry) {
        self.pending.push_back(entry);
    }

    /// Take the oldest entry.
    pub fn pop_front(&mut self) -> Option<QueueEntry> {
        self.pending.pop_front()
    }

    /// Whether nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: u64) -> QueueEntry {
        QueueEntry::new(
            Url::parse(&format!("https://host/file{n}.zip")).unwrap(),
            DownloadHandle::new(n),
            PathBuf::from("/out"),
        )
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = DownloadQueue::new();
        queue.submit(entry(1));
        queue.submit(entry(2));
        queue.submit(entry(3));

        assert_eq!(queue.pop_front().unwrap().handle, DownloadHandle::new(1));
        assert_eq!(queue.pop_front().unwrap().handle, DownloadHandle::new(2));
        assert_eq!(queue.pop_front().unwrap().handle, DownloadHandle::new(3));
        assert!(queue.pop_front().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_submit_after_drain_starts_fresh() {
        let mut queue = DownloadQueue::new();
        queue.submit(entry(1));
        assert_eq!(queue.pop_front().unwrap().handle, DownloadHandle::new(1));
        assert!(queue.is_empty());

        queue.submit(entry(4));
        assert!(!queue.is_empty());
        assert_eq!(queue.pop_front().unwrap().target_directory, PathBuf::from("/out"));
    }
}
