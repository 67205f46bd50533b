//! Wall-clock adapter.
//!
//! Provides the local time injected into every engine tick.
//!
//! - [`SystemClock`] reads the host clock in its local timezone.
//! - [`FixedClock`] returns a settable instant, for replaying recorded
//!   bus traffic and for tests.

use core::cell::Cell;

use chrono::{DateTime, Duration, FixedOffset, Local};

use crate::app::ports::ClockPort;

/// Host wall clock in the local timezone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Manually advanced clock.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<DateTime<FixedOffset>>,
}

impl FixedClock {
    pub fn new(start: DateTime<FixedOffset>) -> Self {
        Self { now: Cell::new(start) }
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now.get()
    }
}
