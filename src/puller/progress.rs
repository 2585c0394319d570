//! Progress accounting for a pull run.
//!
//! The executor updates a [`ProgressState`] after every pair and logs
//! [`ProgressState::format_progress`] at a fixed cadence; the CLI mirrors the
//! same counters on an `indicatif` bar.

use std::time::{Duration, Instant};

/// Emit a progress line every this many completed pairs.
const DEFAULT_REPORT_EVERY: usize = 10;

/// Counters for one run.
#[derive(Debug, Clone)]
pub struct ProgressState {
    /// Pairs planned
    pub total: usize,
    /// Pairs finished
    pub completed: usize,
    /// Pairs that returned a job id
    pub succeeded: usize,
    /// When the run started
    pub start_time: Instant,
    report_every: usize,
}

impl ProgressState {
    /// Fresh counters for `total` pairs.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            succeeded: 0,
            start_time: Instant::now(),
            report_every: DEFAULT_REPORT_EVERY,
        }
    }

    /// Override how often [`should_report`](Self::should_report) fires.
    #[cfg(test)]
    pub fn with_report_every(mut self, every: usize) -> Self {
        self.report_every = every.max(1);
        self
    }

    /// Count one finished pair.
    pub fn record(&mut self, success: bool) {
        self.completed = self.completed.saturating_add(1);
        if success {
            self.succeeded += 1;
        }
    }

    /// Pairs that failed so far.
    pub fn failed(&self) -> usize {
        self.completed - self.succeeded
    }

    /// Completion percentage, 100 for an empty run.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.completed as f64 / self.total as f64 * 100.0
    }

    /// Whether a progress line is due: every N pairs and at the end.
    pub fn should_report(&self) -> bool {
        self.completed > 0 && (self.completed % self.report_every == 0 || self.completed == self.total)
    }

    /// Remaining time extrapolated from the average pace so far.
    pub fn estimate_remaining(&self) -> Option<Duration> {
        self.estimate_remaining_after(self.start_time.elapsed())
    }

    fn estimate_remaining_after(&self, elapsed: Duration) -> Option<Duration> {
        if self.completed == 0 || elapsed.is_zero() {
            return None;
        }
        let per_pair = elapsed.as_secs_f64() / self.completed as f64;
        let remaining = self.total.saturating_sub(self.completed) as f64;
        Some(Duration::from_secs_f64(per_pair * remaining))
    }

    /// Human-readable progress line.
    pub fn format_progress(&self) -> String {
        let mut line = format!(
            "[PROGRESS] {}/{} pulls - {:.1}% complete ({} ok, {} failed)",
            self.completed,
            self.total,
            self.percentage(),
            self.succeeded,
            self.failed()
        );
        if self.completed < self.total {
            let eta = self
                .estimate_remaining()
                .map(format_remaining)
                .unwrap_or_else(|| "calculating...".to_string());
            line.push_str(&format!(" - ~{eta} remaining"));
        }
        line
    }
}

/// `45s`, `3m 20s`, or `2h 5m`.
pub fn format_remaining(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
