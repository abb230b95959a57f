//! Fixed-step clock for driving the engine from simulated time.
//!
//! The ticker accumulates elapsed time and hands out one tick per full
//! period. It is the scheduling boundary between wall-clock (or replayed)
//! time and [`GridEngine::advance`](super::GridEngine::advance).

use std::time::Duration;

/// Largest slice of time accepted by a single [`Ticker::feed`] call
pub const MAX_FEED: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticker {
    period: Duration,
    accumulated: Duration,
    active: bool,
}

impl Ticker {
    /// Create a stopped ticker
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            accumulated: Duration::ZERO,
            active: false,
        }
    }

    /// Start ticking with `period`, discarding any leftover time
    pub fn start(&mut self, period: Duration) {
        self.period = period;
        self.accumulated = Duration::ZERO;
        self.active = true;
    }

    /// Stop immediately; nothing becomes due until the next `start`
    pub fn stop(&mut self) {
        self.active = false;
        self.accumulated = Duration::ZERO;
    }

    /// Change the period used for the next tick.
    ///
    /// Time already accumulated is kept, so a tick that is partway through
    /// its wait is measured against the new period from here on.
    pub fn set_period(&mut self, period: Duration) {
        self.period = period;
    }

    /// Add elapsed time, clamped to [`MAX_FEED`]
    pub fn feed(&mut self, dt: Duration) {
        if !self.active {
            return;
        }
        self.accumulated += dt.min(MAX_FEED);
    }

    /// Consume one period if a tick is due
    pub fn take_due(&mut self) -> bool {
        if !self.active || self.period.is_zero() || self.accumulated < self.period {
            return false;
        }
        self.accumulated -= self.period;
        true
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}
