//! Per-item gate for progress events.
//!
//! A transfer reports every written slice; the presentation only needs a few
//! updates per second. Reaching 100% always passes so a finished bar never
//! stops short.

use std::time::{Duration, Instant};

/// Decides which progress updates of one item are published.
#[derive(Debug, Clone)]
pub struct ProgressThrottle {
    interval: Duration,
    last_published: Option<Instant>,
}

impl ProgressThrottle {
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_published: None,
        }
    }

    /// Whether an update at `percent` should be published now.
    pub fn admit(&mut self, percent: f64) -> bool {
        self.admit_at(percent, Instant::now())
    }

    fn admit_at(&mut self, percent: f64, now: Instant) -> bool {
        let due = self
            .last_published
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval);
        let publish = due || percent >= 100.0;
        if publish {
            self.last_published = Some(now);
        }
        publish
    }
}
