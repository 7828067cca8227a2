//! Errors raised while locating romdl's files.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to resolve the queue file, the data root or a configured path.
#[derive(Debug, Error)]
pub enum PathError {
    /// `~` was used but the home directory is unknown.
    #[error("Cannot expand '{0}': home directory unknown")]
    NoHomeDir(String),

    /// No OS data directory and no `ROMDL_DATA_DIR` override.
    #[error("Cannot determine a data directory; set ROMDL_DATA_DIR")]
    NoDataDir,

    /// An override variable is set to an empty value.
    #[error("{0} is set but empty")]
    EmptyOverride(&'static str),

    #[error("Path cannot be empty")]
    EmptyPath,

    /// A relative path could not be anchored to the working directory.
    #[error("Cannot resolve relative path {path}: {source}")]
    Relative {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
