//! Periodic gate on top of the embassy clock
//!
//! Every rate-limited activity in the control loop asks its own gate whether
//! at least one period went by since it last ran.

use embassy_time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct Every {
    period: Duration,
    last: Instant,
}

impl Every {
    pub const fn new(period: Duration) -> Self {
        Self {
            period,
            last: Instant::from_ticks(0),
        }
    }

    /// True once per period. A late call fires once and restarts the period
    /// from `now`, missed periods are not made up for.
    pub fn ready(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last) >= self.period {
            self.last = now;
            true
        } else {
            false
        }
    }
}
