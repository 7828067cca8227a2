//! Counting admission gate for transfers.
//!
//! Wraps a tokio [`Semaphore`], which hands out permits in request order.
//! A slot is held by a [`TransferPermit`] and returned when the permit is
//! dropped, so it is released exactly once however the transfer ends.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use romdl_core::DownloadError;

/// Bounds the number of concurrently active transfers.
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// A held concurrency slot. Dropping it frees the slot.
#[derive(Debug)]
pub struct TransferPermit {
    _permit: OwnedSemaphorePermit,
}

impl ConcurrencyLimiter {
    /// Create a limiter with `capacity` slots (at least 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Wait for a free slot.
    ///
    /// Returns `Cancelled` once the limiter has been closed.
    pub async fn acquire(&self) -> Result<TransferPermit, DownloadError> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| DownloadError::Cancelled)?;
        Ok(TransferPermit { _permit: permit })
    }

    /// Refuse all further acquisitions. Waiters are woken with `Cancelled`.
    pub fn close(&self) {
        self.semaphore.close();
    }

    /// Configured number of slots.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots currently held.
    pub fn active(&self) -> usize {
        self.capacity
            .saturating_sub(self.semaphore.available_permits())
    }
}

impl Default for ConcurrencyLimiter {
    fn default() -> Self {
        Self::new(1)
    }
}
