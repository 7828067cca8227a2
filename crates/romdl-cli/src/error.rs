//! CLI-specific error types and exit codes.

use romdl_core::paths::PathError;
use romdl_core::ports::{CatalogError, PersistenceError};
use romdl_core::{DownloadError, SettingsError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid command-line input.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// Configuration file or path problem.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog listing could not be fetched.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Download manager failure.
    #[error("Download error: {0}")]
    Download(String),

    /// Queue file could not be read or written.
    #[error("IO error: {0}")]
    Io(String),
}

impl CliError {
    /// Map error to a process exit code.
    ///
    /// Follows sysexits.h where a category fits.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Arguments(_) => 64, // EX_USAGE
            Self::Config(_) => 78,    // EX_CONFIG
            Self::Catalog(_) => 69,   // EX_UNAVAILABLE
            Self::Download(_) => 1,
            Self::Io(_) => 74, // EX_IOERR
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::UnknownPlatform(_) => Self::Arguments(err.to_string()),
            other => Self::Config(other.to_string()),
        }
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<CatalogError> for CliError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::UnknownPlatform(_) => Self::Arguments(err.to_string()),
            other => Self::Catalog(other.to_string()),
        }
    }
}

impl From<DownloadError> for CliError {
    fn from(err: DownloadError) -> Self {
        match err {
            DownloadError::Persistence { .. } | DownloadError::Io { .. } => {
                Self::Io(err.user_message())
            }
            other => Self::Download(other.user_message()),
        }
    }
}

impl From<PersistenceError> for CliError {
    fn from(err: PersistenceError) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_platform_is_usage_error() {
        let err = CliError::from(CatalogError::UnknownPlatform("n64".to_string()));
        assert_eq!(err.exit_code(), 64);
        assert!(err.to_string().contains("Platform n64 not found"));

        let err = CliError::from(SettingsError::UnknownPlatform("n64".to_string()));
        assert_eq!(err.exit_code(), 64);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Config(String::new()).exit_code(), 78);
        assert_eq!(CliError::Io(String::new()).exit_code(), 74);
        assert_eq!(
            CliError::from(DownloadError::persistence("disk full")).exit_code(),
            74
        );
        assert_eq!(CliError::from(DownloadError::Cancelled).exit_code(), 1);
    }
}
