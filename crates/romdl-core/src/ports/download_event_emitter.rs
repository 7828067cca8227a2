//! Download event emitter port.
//!
//! This port lets the tracker publish events without knowing how the
//! presentation surface consumes them (terminal bars, channels, logs).

use tokio::sync::mpsc;

use crate::download::DownloadEvent;

/// Port for emitting download events.
pub trait DownloadEventEmitterPort: Send + Sync {
    /// Emit a download event.
    ///
    /// Called while the tracker holds no locks. Must not block.
    fn emit(&self, event: DownloadEvent);

    /// Clone this emitter into a boxed trait object.
    fn clone_box(&self) -> Box<dyn DownloadEventEmitterPort>;
}

/// A no-op download event emitter for tests and headless runs.
#[derive(Debug, Clone, Default)]
pub struct NoopDownloadEmitter;

impl NoopDownloadEmitter {
    /// Create a new no-op download emitter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DownloadEventEmitterPort for NoopDownloadEmitter {
    fn emit(&self, _event: DownloadEvent) {}

    fn clone_box(&self) -> Box<dyn DownloadEventEmitterPort> {
        Box::new(self.clone())
    }
}

/// Forwards events into an unbounded tokio channel.
///
/// Events emitted after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelDownloadEmitter {
    tx: mpsc::UnboundedSender<DownloadEvent>,
}

impl ChannelDownloadEmitter {
    /// Create an emitter and the receiving end of its channel.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DownloadEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl DownloadEventEmitterPort for ChannelDownloadEmitter {
    fn emit(&self, event: DownloadEvent) {
        let _ = self.tx.send(event);
    }

    fn clone_box(&self) -> Box<dyn DownloadEventEmitterPort> {
        Box::new(self.clone())
    }
}
