//! Resumable single-file HTTP transfer.
//!
//! A fetch continues whatever prefix of the file is already on disk:
//!
//! 1. The existing file length becomes the resume offset
//! 2. A non-zero offset is requested with `Range: bytes=<offset>-`
//! 3. `206` appends; `200` means the server ignored the range and the file is
//!    rewritten from scratch; `416` with `Content-Range: bytes */<offset>`
//!    means the file is already whole
//! 4. The body is written in slices of at most `chunk_size` bytes, each one
//!    reported to the tracker
//!
//! Every failure is contained here: the item is marked `Error`, the cause is
//! logged, and the caller only sees a [`FetchOutcome`]. Cancellation leaves
//! the status untouched so an interrupted transfer is persisted for resume.

mod range;

use std::path::Path;
use std::sync::Arc;

use futures_util::StreamExt;
use reqwest::StatusCode;
use reqwest::header::RANGE;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;

use romdl_core::ports::DownloadManagerConfig;
use romdl_core::{DownloadError, DownloadStatus, extract_filename};

use crate::queue::QueueEntry;
use crate::tracker::StatusTracker;

pub use range::{WriteMode, parse_unsatisfied_length, plan_write};

/// One admitted transfer.
#[derive(Debug, Clone)]
pub struct FetchJob {
    /// What to fetch and where to put it.
    pub entry: QueueEntry,
    /// Cancelled on shutdown.
    pub cancel: CancellationToken,
}

/// How a transfer ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The file on disk has its full length.
    Complete {
        /// Bytes written by this run.
        written: u64,
        /// Final file length.
        total: u64,
    },
    /// Shutdown interrupted the transfer.
    Cancelled,
    /// The transfer failed; the item is marked `Error`.
    Failed(DownloadError),
}

/// Performs transfers and reports into the tracker.
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    tracker: Arc<StatusTracker>,
    chunk_size: usize,
}

impl Fetcher {
    /// Create a fetcher using an existing client.
    pub fn new(client: reqwest::Client, tracker: Arc<StatusTracker>, chunk_size: usize) -> Self {
        Self {
            client,
            tracker,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Build the HTTP client used for transfers.
    ///
    /// Redirects are followed with reqwest's default policy.
    pub fn build_client(config: &DownloadManagerConfig) -> Result<reqwest::Client, DownloadError> {
        reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| DownloadError::network(format!("Failed to build HTTP client: {e}")))
    }

    /// Run a transfer to its end and record the final status.
    pub async fn run(&self, job: FetchJob) -> FetchOutcome {
        let handle = job.entry.handle;

        match self.transfer(&job).await {
            Ok((written, total)) => {
                self.tracker
                    .record_status(handle, DownloadStatus::Complete)
                    .await;
                tracing::info!(
                    target: "romdl.download",
                    %handle,
                    url = %job.entry.url,
                    written,
                    total,
                    "Transfer complete"
                );
                FetchOutcome::Complete { written, total }
            }
            Err(e) if e.is_cancelled() => {
                tracing::info!(target: "romdl.download", %handle, "Transfer cancelled");
                FetchOutcome::Cancelled
            }
            Err(e) => {
                tracing::warn!(
                    target: "romdl.download",
                    %handle,
                    url = %job.entry.url,
                    error = %e,
                    "Transfer failed"
                );
                self.tracker.record_status(handle, DownloadStatus::Error).await;
                FetchOutcome::Failed(e)
            }
        }
    }

    /// Returns `(bytes written, final length)` on success.
    async fn transfer(&self, job: &FetchJob) -> Result<(u64, u64), DownloadError> {
        let entry = &job.entry;
        let cancel = &job.cancel;
        let handle = entry.handle;

        let file_name = extract_filename(&entry.url);
        if file_name.is_empty() {
            return Err(DownloadError::invalid_locator(entry.url.as_str()));
        }
        tokio::fs::create_dir_all(&entry.target_directory).await?;
        let full_path = entry.target_directory.join(&file_name);

        let already = existing_length(&full_path).await?;

        let mut request = self.client.get(entry.url.clone());
        if already > 0 {
            tracing::debug!(target: "romdl.download", %handle, offset = already, "Requesting range");
            request = request.header(RANGE, format!("bytes={already}-"));
        }

        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(DownloadError::Cancelled),
            result = request.send() => result.map_err(|e| request_error(&e))?,
        };

        let status = response.status();
        if status == StatusCode::RANGE_NOT_SATISFIABLE && already > 0 {
            let remote_length = response
                .headers()
                .get(reqwest::header::CONTENT_RANGE)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_unsatisfied_length);
            if remote_length == Some(already) {
                tracing::info!(target: "romdl.download", %handle, "File already complete on disk");
                self.tracker
                    .record_progress(handle, 100.0, already, already)
                    .await;
                return Ok((0, already));
            }
            return Err(DownloadError::RangeNotSatisfiable {
                offset: already,
                remote_length,
            });
        }
        if !status.is_success() {
            return Err(DownloadError::network_with_status(
                format!("GET {} returned {status}", entry.url),
                status.as_u16(),
            ));
        }

        let content_length = response
            .content_length()
            .ok_or_else(|| DownloadError::missing_content_length(entry.url.as_str()))?;

        let mode = plan_write(already, status);
        if matches!(mode, WriteMode::Restart) && already > 0 {
            tracing::warn!(
                target: "romdl.download",
                %handle,
                discarded = already,
                "Server ignored range request, restarting from byte 0"
            );
        }
        let offset = mode.offset(already);
        let total = offset + content_length;

        let mut file = open_for(&full_path, mode).await?;
        let mut stream = response.bytes_stream();
        let mut downloaded = offset;
        let mut written = 0u64;
        let mut started = false;

        loop {
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    file.flush().await?;
                    return Err(DownloadError::Cancelled);
                }
                next = stream.next() => next,
            };
            let mut chunk = match next {
                Some(Ok(chunk)) => chunk,
                Some(Err(e)) => {
                    // Keep what arrived so the next run resumes after it.
                    file.flush().await?;
                    return Err(request_error(&e));
                }
                None => break,
            };

            while !chunk.is_empty() {
                let piece = chunk.split_to(chunk.len().min(self.chunk_size));
                file.write_all(&piece).await?;
                downloaded += piece.len() as u64;
                written += piece.len() as u64;

                if !started {
                    self.tracker
                        .record_status(handle, DownloadStatus::Downloading)
                        .await;
                    started = true;
                }
                self.tracker
                    .record_progress(handle, percent(downloaded, total), downloaded, total)
                    .await;
            }
        }
        file.flush().await?;

        if downloaded != total {
            return Err(DownloadError::Truncated {
                expected: total,
                received: downloaded,
            });
        }
        if total == 0 {
            self.tracker.record_progress(handle, 100.0, 0, 0).await;
        }
        Ok((written, total))
    }
}

async fn existing_length(path: &Path) -> Result<u64, DownloadError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) => Ok(meta.len()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
        Err(e) => Err(DownloadError::from_io_error(&e)),
    }
}

async fn open_for(path: &Path, mode: WriteMode) -> Result<tokio::fs::File, DownloadError> {
    let mut options = OpenOptions::new();
    match mode {
        WriteMode::Append => options.create(true).append(true),
        WriteMode::Restart => options.create(true).write(true).truncate(true),
    };
    Ok(options.open(path).await?)
}

fn request_error(err: &reqwest::Error) -> DownloadError {
    match err.status() {
        Some(status) => DownloadError::network_with_status(err.to_string(), status.as_u16()),
        None => DownloadError::network(err.to_string()),
    }
}

#[allow(clippy::cast_precision_loss)]
fn percent(downloaded: u64, total: u64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    downloaded as f64 / total as f64 * 100.0
}
