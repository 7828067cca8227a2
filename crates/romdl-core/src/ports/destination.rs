//! Destination resolution port.

use std::collections::HashMap;
use std::path::PathBuf;

/// Maps a platform key to the absolute directory its files are written to.
///
/// Returning `None` means the platform is unknown; the caller must not enqueue
/// anything for it.
pub trait DestinationResolver: Send + Sync {
    /// Resolve the target directory for `platform`.
    fn resolve_destination(&self, platform: &str) -> Option<PathBuf>;
}

/// Fixed table resolver, mostly useful in tests and one-off tooling.
impl DestinationResolver for HashMap<String, PathBuf> {
    fn resolve_destination(&self, platform: &str) -> Option<PathBuf> {
        self.get(platform).cloned()
    }
}
