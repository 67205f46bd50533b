//! Failsafe timer bank.
//!
//! Pure timestamp arithmetic over the stored stage clocks: per-stage dwell
//! times and the global anti-chatter cooldown.  Nothing here mutates state.

use crate::state::EngineState;

/// Read-only view of the timers at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FailsafeTimers<'a> {
    state: &'a EngineState,
    now: f64,
}

impl<'a> FailsafeTimers<'a> {
    pub fn new(state: &'a EngineState, now: f64) -> Self {
        Self { state, now }
    }

    fn since_change(&self, i: usize) -> f64 {
        self.now - self.state.stages[i].last_change
    }

    /// Stage `i` has been OFF for at least `minOffSeconds`.
    pub fn can_turn_on(&self, i: usize) -> bool {
        self.since_change(i) >= self.state.config.min_off_seconds
    }

    /// Stage `i` has been ON for at least `minOnSeconds`.
    pub fn can_turn_off(&self, i: usize) -> bool {
        self.since_change(i) >= self.state.config.min_on_seconds
    }

    /// Any stage toggled less than `minAnyChangeSeconds` ago.
    pub fn global_cooldown_active(&self) -> bool {
        self.now - self.state.last_any_change < self.state.config.min_any_change_seconds
    }

    /// Seconds until the cooldown lifts (`0` when inactive).
    pub fn cooldown_remaining(&self) -> f64 {
        (self.state.config.min_any_change_seconds - (self.now - self.state.last_any_change)).max(0.0)
    }
}
