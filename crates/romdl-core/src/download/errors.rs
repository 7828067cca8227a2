//! Download error types.
//!
//! These errors are serializable and do not hold external error types like
//! `std::io::Error`. For I/O errors, the kind and message are captured as strings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for download operations.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum DownloadError {
    /// I/O error during file operations.
    #[error("I/O error ({kind}): {message}")]
    Io {
        /// The kind of I/O error (e.g., "`NotFound`", "`PermissionDenied`").
        kind: String,
        /// Detailed error message.
        message: String,
    },

    /// Network/HTTP error during download.
    #[error("Network error: {message}")]
    Network {
        /// Detailed error message.
        message: String,
        /// HTTP status code if available.
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
    },

    /// The response did not carry a usable `Content-Length`.
    #[error("Response for {url} has no usable Content-Length")]
    MissingContentLength {
        /// The requested URL.
        url: String,
    },

    /// The body ended before the announced length was received.
    #[error("Transfer truncated: expected {expected} bytes, have {received}")]
    Truncated {
        /// Expected final length.
        expected: u64,
        /// Length actually on disk.
        received: u64,
    },

    /// The server rejected the resume offset.
    #[error("Range not satisfiable at offset {offset}")]
    RangeNotSatisfiable {
        /// Offset that was requested.
        offset: u64,
        /// Remote length reported in `Content-Range`, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        remote_length: Option<u64>,
    },

    /// The locator cannot be turned into a local file name.
    #[error("Invalid locator: {url}")]
    InvalidLocator {
        /// The offending locator.
        url: String,
    },

    /// No destination is configured for the platform.
    #[error("Unknown platform: {platform}")]
    UnknownPlatform {
        /// The platform that failed to resolve.
        platform: String,
    },

    /// An item with the same locator is already in flight.
    #[error("Already queued: {url}")]
    AlreadyQueued {
        /// The duplicate locator.
        url: String,
    },

    /// The persisted queue could not be read or written.
    #[error("Persistence error: {message}")]
    Persistence {
        /// Detailed error message.
        message: String,
    },

    /// Download was cancelled by shutdown.
    #[error("Download cancelled")]
    Cancelled,
}

impl DownloadError {
    /// Create an I/O error from a `std::io::Error`.
    #[must_use]
    pub fn from_io_error(err: &std::io::Error) -> Self {
        let kind = err.kind();
        Self::Io {
            kind: format!("{kind:?}"),
            message: err.to_string(),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            status_code: None,
        }
    }

    /// Create a network error with HTTP status code.
    pub fn network_with_status(message: impl Into<String>, status_code: u16) -> Self {
        Self::Network {
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Create a missing content length error.
    pub fn missing_content_length(url: impl Into<String>) -> Self {
        Self::MissingContentLength { url: url.into() }
    }

    /// Create an invalid locator error.
    pub fn invalid_locator(url: impl Into<String>) -> Self {
        Self::InvalidLocator { url: url.into() }
    }

    /// Create an unknown platform error.
    pub fn unknown_platform(platform: impl Into<String>) -> Self {
        Self::UnknownPlatform {
            platform: platform.into(),
        }
    }

    /// Create an already queued error.
    pub fn already_queued(url: impl Into<String>) -> Self {
        Self::AlreadyQueued { url: url.into() }
    }

    /// Create a persistence error.
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    /// Check if this is a cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Whether `enqueue` refused the request without tracking anything.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::UnknownPlatform { .. } | Self::AlreadyQueued { .. } | Self::InvalidLocator { .. }
        )
    }

    /// Convert to a user-friendly message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Io { message, .. } => format!("File operation failed: {message}"),
            Self::Network {
                message,
                status_code: Some(code),
            } => format!("Network error (HTTP {code}): {message}"),
            Self::Network { message, .. } => format!("Network error: {message}"),
            Self::MissingContentLength { .. } => {
                "Server did not report the file size.".to_string()
            }
            Self::Truncated { expected, received } => {
                format!("Transfer ended early ({received} of {expected} bytes). Run resume to continue.")
            }
            Self::RangeNotSatisfiable { offset, .. } => {
                format!("Server refused to resume at byte {offset}. Delete the partial file to restart.")
            }
            Self::InvalidLocator { url } => format!("Cannot derive a file name from '{url}'."),
            Self::UnknownPlatform { platform } => {
                format!("Platform '{platform}' is not configured.")
            }
            Self::AlreadyQueued { url } => format!("'{url}' is already in the queue."),
            Self::Persistence { message } => format!("Could not access the saved queue: {message}"),
            Self::Cancelled => "Download was cancelled.".to_string(),
        }
    }
}

impl From<std::io::Error> for DownloadError {
    fn from(err: std::io::Error) -> Self {
        Self::from_io_error(&err)
    }
}
