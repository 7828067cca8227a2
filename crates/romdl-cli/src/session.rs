//! One run of the download manager from the terminal.
//!
//! A session restores the saved queue, accepts new catalog entries, renders
//! events until the manager is idle or the user interrupts, and then shuts the
//! manager down so unfinished items are saved for the next run.

use std::future::Future;

use romdl_core::ports::{DownloadManagerPort, DownloadRequest};
use romdl_core::{CatalogEntry, DownloadError, DownloadEvent, DownloadHandle, DownloadStatus};
use romdl_download::DownloadManager;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::error::CliError;
use crate::presentation::ProgressBoard;

/// Final counts of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub complete: usize,
    pub failed: usize,
    /// Items saved for a later `resume`.
    pub unfinished: usize,
    /// The user pressed Ctrl-C.
    pub interrupted: bool,
}

/// Download manager plus the event stream rendered on the terminal.
pub struct DownloadSession {
    manager: DownloadManager,
    events: UnboundedReceiver<DownloadEvent>,
    board: ProgressBoard,
}

impl DownloadSession {
    pub fn new(manager: DownloadManager, events: UnboundedReceiver<DownloadEvent>) -> Self {
        Self {
            manager,
            events,
            board: ProgressBoard::new(),
        }
    }

    /// Replace the progress board (tests use a hidden one).
    #[must_use]
    pub fn with_board(mut self, board: ProgressBoard) -> Self {
        self.board = board;
        self
    }

    /// Re-queue the items saved by a previous run. Returns how many were queued.
    pub async fn restore(&self) -> Result<usize, CliError> {
        let handles = self.manager.restore().await?;
        if !handles.is_empty() {
            self.board
                .println(&format!("Resuming {} saved download(s)", handles.len()));
        }
        Ok(handles.len())
    }

    /// Queue one catalog entry.
    pub async fn enqueue(&self, entry: &CatalogEntry) -> Result<DownloadHandle, DownloadError> {
        self.manager.enqueue(DownloadRequest::from(entry)).await
    }

    /// Run until every item settles or Ctrl-C is pressed, then save.
    pub async fn run(self) -> Result<SessionSummary, CliError> {
        self.run_until(async {
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run until every item settles or `interrupt` resolves, then save.
    pub async fn run_until<F>(mut self, interrupt: F) -> Result<SessionSummary, CliError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(interrupt);
        let mut interrupted = false;

        loop {
            tokio::select! {
                biased;
                () = &mut interrupt => {
                    interrupted = true;
                    break;
                }
                Some(event) = self.events.recv() => self.board.apply(&event),
                () = self.manager.wait_idle() => break,
            }
        }

        if interrupted {
            self.board.println("Interrupted, saving unfinished downloads...");
        }
        self.manager.shutdown().await?;
        while let Ok(event) = self.events.try_recv() {
            self.board.apply(&event);
        }
        self.board.finish();

        let mut summary = SessionSummary {
            interrupted,
            ..SessionSummary::default()
        };
        for item in self.manager.snapshot().await {
            match item.status {
                DownloadStatus::Complete => summary.complete += 1,
                DownloadStatus::Error => summary.failed += 1,
                _ => summary.unfinished += 1,
            }
        }
        tracing::info!(
            complete = summary.complete,
            failed = summary.failed,
            unfinished = summary.unfinished,
            interrupted,
            "Download session finished"
        );
        Ok(summary)
    }
}

/// Print the closing line of a session.
pub fn print_summary(summary: &SessionSummary) {
    println!(
        "{} complete, {} failed, {} saved for resume",
        summary.complete, summary.failed, summary.unfinished
    );
    if summary.failed > 0 {
        println!("Failed items are kept in the queue; run `romdl resume` to retry them.");
    }
}
