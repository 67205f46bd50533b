//! Daylight operating window.
//!
//! The window is given as two local times of day (`"HH:MM"`).  Both ends
//! are inclusive and both refer to the same day, so a window whose end is
//! earlier than its start (e.g. `22:00`..`05:00`) is never open.

use chrono::{DateTime, FixedOffset, NaiveTime, TimeZone};

use crate::config::HeaterConfig;
use crate::error::{Result, ScheduleError};

/// Parsed operating window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleGate {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl ScheduleGate {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Build the gate from the configured `scheduleStart` / `scheduleEnd`.
    pub fn from_config(config: &HeaterConfig) -> core::result::Result<Self, ScheduleError> {
        Ok(Self::new(
            parse_time_of_day(&config.schedule_start)?,
            parse_time_of_day(&config.schedule_end)?,
        ))
    }

    /// True iff `now` (local wall clock) falls inside the window.
    pub fn is_within_window<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        self.contains(now.time())
    }

    /// Same-day check; an inverted window contains nothing.
    pub fn contains(&self, t: NaiveTime) -> bool {
        t >= self.start && t <= self.end
    }
}

/// Parse `"H:MM"` / `"HH:MM"`.  Anything after the minute field is ignored.
pub fn parse_time_of_day(raw: &str) -> core::result::Result<NaiveTime, ScheduleError> {
    let invalid = || ScheduleError::InvalidTimeOfDay(raw.to_string());

    let mut parts = raw.split(':');
    let hour: u32 = parts
        .next()
        .and_then(|h| h.trim().parse().ok())
        .ok_or_else(invalid)?;
    let minute: u32 = parts
        .next()
        .and_then(|m| m.trim().parse().ok())
        .ok_or_else(invalid)?;

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

/// Evaluate the configured window at `now`.  Returns `Error::Schedule`
/// when either end does not parse; the caller decides how to fail.
pub fn window_open(config: &HeaterConfig, now: &DateTime<FixedOffset>) -> Result<bool> {
    let gate = ScheduleGate::from_config(config)?;
    Ok(gate.is_within_window(now))
}
