//! Wall-clock and monotonic timing of a pipeline run.

use chrono::{DateTime, Utc};
use std::time::Instant;

/// Records when a run started and how long it has taken.
#[derive(Debug, Clone, Copy)]
pub struct RunTimer {
    started_at: DateTime<Utc>,
    start: Instant,
}

impl RunTimer {
    /// Starts timing now.
    #[must_use]
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            start: Instant::now(),
        }
    }

    /// Wall-clock start time.
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Milliseconds since the timer started.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}
