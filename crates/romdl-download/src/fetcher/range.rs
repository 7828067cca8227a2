//! Range-request bookkeeping.

use reqwest::StatusCode;

/// How the local file is opened for a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Keep the existing prefix and append the body.
    Append,
    /// Truncate and write the body from byte 0.
    Restart,
}

impl WriteMode {
    /// Byte offset the body starts at.
    pub const fn offset(self, already: u64) -> u64 {
        match self {
            Self::Append => already,
            Self::Restart => 0,
        }
    }
}

/// Decide how to write a successful response.
///
/// Only a `206 Partial Content` answer to a ranged request continues the file.
/// Anything else is a full body.
pub fn plan_write(already: u64, status: StatusCode) -> WriteMode {
    if already > 0 && status == StatusCode::PARTIAL_CONTENT {
        WriteMode::Append
    } else {
        WriteMode::Restart
    }
}

/// Parse the complete length out of a `416` `Content-Range` header
/// (`bytes */<length>`).
pub fn parse_unsatisfied_length(header: &str) -> Option<u64> {
    header
        .trim()
        .strip_prefix("bytes")?
        .trim_start()
        .strip_prefix("*/")?
        .trim()
        .parse()
        .ok()
}
