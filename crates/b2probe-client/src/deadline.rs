//! Shared time budget for one probe run.
//!
//! The probe computes one absolute deadline up front. Each request is then
//! given whatever is left of it, floored at [`MIN_REQUEST_TIMEOUT`], as its
//! own timeout. Nothing interrupts a request that is already running.

use std::time::{Duration, Instant};

/// Smallest timeout handed to a single request.
pub const MIN_REQUEST_TIMEOUT: Duration = Duration::from_millis(500);

/// Budgets the clock cannot represent are cut to this.
pub const MAX_BUDGET: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Absolute point in time shared by every request of a run.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Deadline `budget` from now, saturating at [`MAX_BUDGET`].
    pub fn after(budget: Duration) -> Self {
        let now = Instant::now();
        let at = now
            .checked_add(budget)
            .or_else(|| now.checked_add(MAX_BUDGET))
            .unwrap_or(now);
        Self { at }
    }

    /// Timeout for the next request.
    pub fn remaining(&self) -> Duration {
        self.at
            .saturating_duration_since(Instant::now())
            .max(MIN_REQUEST_TIMEOUT)
    }
}
