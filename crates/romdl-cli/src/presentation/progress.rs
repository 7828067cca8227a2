//! Terminal progress board driven by download events.
//!
//! One indicatif bar per item, grouped under a `MultiProgress`. Bars are
//! positioned in hundredths of a percent so the rendered label matches the
//! tracker's two-decimal progress.

use std::collections::HashMap;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use romdl_core::{DownloadEvent, DownloadHandle, DownloadStatus};

const BAR_SCALE: u64 = 10_000;

struct Row {
    bar: ProgressBar,
    status: DownloadStatus,
    percent: f64,
}

impl Row {
    fn message(&self) -> String {
        format!("{:<11} {:>7}", self.status.label(), format_percent(self.percent))
    }
}

/// Format a percentage the way the download table shows it.
pub fn format_percent(percent: f64) -> String {
    format!("{percent:.2}%")
}

/// Renders queued items and their progress.
pub struct ProgressBoard {
    multi: MultiProgress,
    rows: HashMap<DownloadHandle, Row>,
    style: ProgressStyle,
}

impl ProgressBoard {
    /// Board drawing to stderr (hidden automatically when not a terminal).
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// Board that never draws.
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let style = ProgressStyle::with_template("{prefix:40!} {bar:30.cyan/blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        Self {
            multi: MultiProgress::with_draw_target(target),
            rows: HashMap::new(),
            style,
        }
    }

    /// Apply one event. Events for unknown handles are ignored.
    pub fn apply(&mut self, event: &DownloadEvent) {
        match event {
            DownloadEvent::Queued { handle, name, size } => {
                let bar = self.multi.add(ProgressBar::new(BAR_SCALE));
                bar.set_style(self.style.clone());
                bar.set_prefix(format!("{name} ({size})"));
                let row = Row {
                    bar,
                    status: DownloadStatus::Pending,
                    percent: 0.0,
                };
                row.bar.set_message(row.message());
                self.rows.insert(*handle, row);
            }
            DownloadEvent::StatusChanged { handle, status } => {
                let Some(row) = self.rows.get_mut(handle) else {
                    return;
                };
                row.status = *status;
                let message = row.message();
                match status {
                    DownloadStatus::Complete => row.bar.finish_with_message(message),
                    DownloadStatus::Error => row.bar.abandon_with_message(message),
                    _ => row.bar.set_message(message),
                }
            }
            DownloadEvent::Progress {
                handle, percent, ..
            } => {
                let Some(row) = self.rows.get_mut(handle) else {
                    return;
                };
                row.percent = *percent;
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let position = (percent * 100.0).round() as u64;
                row.bar.set_position(position.min(BAR_SCALE));
                if !row.bar.is_finished() {
                    row.bar.set_message(row.message());
                }
            }
        }
    }

    /// Last status seen for `handle`.
    pub fn status(&self, handle: DownloadHandle) -> Option<DownloadStatus> {
        self.rows.get(&handle).map(|row| row.status)
    }

    /// Last progress label seen for `handle`.
    pub fn progress_label(&self, handle: DownloadHandle) -> Option<String> {
        self.rows.get(&handle).map(|row| format_percent(row.percent))
    }

    /// Print a line above the bars.
    pub fn println(&self, line: &str) {
        if self.multi.is_hidden() {
            eprintln!("{line}");
        } else {
            let _ = self.multi.println(line);
        }
    }

    /// Leave finished bars on screen and drop any still running.
    pub fn finish(&self) {
        for row in self.rows.values() {
            if !row.bar.is_finished() {
                row.bar.abandon();
            }
        }
    }
}

impl Default for ProgressBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queued(board: &mut ProgressBoard, raw: u64) -> DownloadHandle {
        let handle = DownloadHandle::new(raw);
        board.apply(&DownloadEvent::Queued {
            handle,
            name: format!("file{raw}.zip"),
            size: "1 MiB".to_string(),
        });
        handle
    }

    #[test]
    fn test_queued_row_starts_pending() {
        let mut board = ProgressBoard::hidden();
        let handle = queued(&mut board, 1);
        assert_eq!(board.status(handle), Some(DownloadStatus::Pending));
        assert_eq!(board.progress_label(handle).as_deref(), Some("0.00%"));
    }

    #[test]
    fn test_progress_and_completion() {
        let mut board = ProgressBoard::hidden();
        let handle = queued(&mut board, 1);

        board.apply(&DownloadEvent::status(handle, DownloadStatus::Downloading));
        board.apply(&DownloadEvent::progress(handle, 48.828_125, 512_000, 1_048_576));
        assert_eq!(board.progress_label(handle).as_deref(), Some("48.83%"));

        board.apply(&DownloadEvent::progress(handle, 100.0, 1_048_576, 1_048_576));
        board.apply(&DownloadEvent::status(handle, DownloadStatus::Complete));
        assert_eq!(board.status(handle), Some(DownloadStatus::Complete));
        assert_eq!(board.progress_label(handle).as_deref(), Some("100.00%"));
    }

    #[test]
    fn test_unknown_handle_ignored() {
        let mut board = ProgressBoard::hidden();
        let stray = DownloadHandle::new(9);
        board.apply(&DownloadEvent::status(stray, DownloadStatus::Error));
        assert_eq!(board.status(stray), None);
        board.finish();
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.0), "0.00%");
        assert_eq!(format_percent(12.346), "12.35%");
    }
}
