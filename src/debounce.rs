//! Time-based boolean debouncer
//!
//! The stable output follows the raw input only after the raw input has
//! held its new value continuously for the hold duration. Any flip resets
//! the hold timer, so chatter shorter than the hold never reaches the output.

use embassy_time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Debouncer {
    raw: bool,
    stable: bool,
    last_change: Instant,
    /// Hold required before the output may become `true`
    rise_hold: Duration,
    /// Hold required before the output may become `false`
    fall_hold: Duration,
}

impl Debouncer {
    /// Create a debouncer with the same hold in both directions
    pub const fn new(hold: Duration) -> Self {
        Self::with_holds(hold, hold)
    }

    /// Create a debouncer with separate rising and falling holds
    pub const fn with_holds(rise_hold: Duration, fall_hold: Duration) -> Self {
        Self {
            raw: false,
            stable: false,
            last_change: Instant::from_ticks(0),
            rise_hold,
            fall_hold,
        }
    }

    /// Feed the raw condition observed at `now`, returns the stable value
    pub fn evaluate(&mut self, raw: bool, now: Instant) -> bool {
        if raw != self.raw {
            self.raw = raw;
            self.last_change = now;
        }

        let held = now.saturating_duration_since(self.last_change);
        if raw != self.stable && held >= self.hold_for(raw) {
            self.stable = raw;
        }

        self.stable
    }

    /// Current stable value
    pub const fn stable(&self) -> bool {
        self.stable
    }

    /// Last raw value seen
    pub const fn raw(&self) -> bool {
        self.raw
    }

    /// Force both raw and stable values, restarting the hold timer
    pub fn reset(&mut self, value: bool, now: Instant) {
        self.raw = value;
        self.stable = value;
        self.last_change = now;
    }

    const fn hold_for(&self, value: bool) -> Duration {
        if value { self.rise_hold } else { self.fall_hold }
    }
}
