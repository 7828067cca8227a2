//! Port definitions (trait abstractions) for external adapters.
//!
//! The download engine depends only on these traits. Concrete implementations
//! (configuration file, JSON queue file, HTTP catalog, terminal renderer) are
//! injected at the composition root.

mod catalog;
mod destination;
mod download_event_emitter;
mod download_manager;
mod queue_store;

pub use catalog::{CatalogError, CatalogSource};
pub use destination::DestinationResolver;
pub use download_event_emitter::{
    ChannelDownloadEmitter, DownloadEventEmitterPort, NoopDownloadEmitter,
};
pub use download_manager::{DownloadManagerConfig, DownloadManagerPort, DownloadRequest};
pub use queue_store::{PersistenceError, QueueStateStore};
