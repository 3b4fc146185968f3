//! Real-Time Clock and Timer.
//!
//! 1. **Clock:** A monotonic tick counter derived from wall time at a configurable rate,
//!    plus a manual offset so tests can move time deterministically.
//! 2. **Timer:** A one-shot compare register that fires once when the clock passes it.

use std::time::Instant;

/// Monotonic real-time clock.
#[derive(Clone, Debug)]
pub struct RtClock {
    start: Instant,
    tick_rate_hz: u64,
    offset: u64,
}

impl RtClock {
    /// Starts a clock ticking at `tick_rate_hz`.
    pub fn new(tick_rate_hz: u64) -> Self {
        Self {
            start: Instant::now(),
            tick_rate_hz,
            offset: 0,
        }
    }

    /// Configured tick rate.
    pub const fn tick_rate_hz(&self) -> u64 {
        self.tick_rate_hz
    }

    /// Current tick count.
    pub fn now(&self) -> u64 {
        let nanos = self.start.elapsed().as_nanos();
        let ticks = nanos * u128::from(self.tick_rate_hz) / 1_000_000_000;
        u64::try_from(ticks)
            .unwrap_or(u64::MAX)
            .saturating_add(self.offset)
    }

    /// Moves the clock forward by `ticks` without waiting.
    pub fn advance(&mut self, ticks: u64) {
        self.offset = self.offset.saturating_add(ticks);
    }
}

/// One-shot timer compare.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timer {
    compare: u64,
    armed: bool,
}

impl Timer {
    /// Arms the timer at `compare`.
    pub fn arm(&mut self, compare: u64) {
        self.compare = compare;
        self.armed = true;
    }

    /// Whether the timer is waiting to fire.
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    /// Current compare value.
    pub const fn compare(&self) -> u64 {
        self.compare
    }

    /// Returns `true` exactly once when `now` exceeds the compare value, then disarms.
    pub fn poll(&mut self, now: u64) -> bool {
        if self.armed && now > self.compare {
            self.armed = false;
            return true;
        }
        false
    }
}
