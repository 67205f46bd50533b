//! Three-stage relay bank driver.
//!
//! Each stage drives one relay coil through an `embedded-hal` output pin
//! (high = energised).  The bank is a dumb actuator: it follows the
//! stage-change events the engine emits and never decides on its own.
//!
//! ## Failure contract
//!
//! A pin write error is logged and remembered; the engine state stays the
//! source of truth.  [`RelayBank::resync`] rewrites every pin from a known
//! stage vector, e.g. after a restore or after a write failure.

use embedded_hal::digital::OutputPin;
use log::{error, info};

use crate::app::events::HeaterEvent;
use crate::app::ports::EventSink;
use crate::state::STAGE_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Off,
    On,
    /// Last write to this coil failed; actual position unknown.
    Faulted,
}

pub struct RelayBank<P: OutputPin> {
    pins: [P; STAGE_COUNT],
    states: [RelayState; STAGE_COUNT],
}

impl<P: OutputPin> RelayBank<P> {
    /// Take ownership of the pins and de-energise every coil.
    pub fn new(pins: [P; STAGE_COUNT]) -> Self {
        let mut bank = Self {
            pins,
            states: [RelayState::Off; STAGE_COUNT],
        };
        bank.resync([false; STAGE_COUNT]);
        bank
    }

    /// Drive stage `i`.  Returns `false` if the pin write failed.
    pub fn set(&mut self, i: usize, on: bool) -> bool {
        let result = if on {
            self.pins[i].set_high()
        } else {
            self.pins[i].set_low()
        };
        match result {
            Ok(()) => {
                self.states[i] = if on { RelayState::On } else { RelayState::Off };
                true
            }
            Err(e) => {
                error!("Relay {i} write failed: {e:?}");
                self.states[i] = RelayState::Faulted;
                false
            }
        }
    }

    /// Rewrite every coil from `stages`.
    pub fn resync(&mut self, stages: [bool; STAGE_COUNT]) {
        for (i, on) in stages.into_iter().enumerate() {
            self.set(i, on);
        }
        info!("Relay bank synced to {:?}", self.states);
    }

    pub fn state(&self, i: usize) -> RelayState {
        self.states[i]
    }

    pub fn states(&self) -> [RelayState; STAGE_COUNT] {
        self.states
    }

    pub fn has_fault(&self) -> bool {
        self.states.contains(&RelayState::Faulted)
    }

    /// Release the pins.
    pub fn release(self) -> [P; STAGE_COUNT] {
        self.pins
    }
}

impl<P: OutputPin> EventSink for RelayBank<P> {
    fn emit(&mut self, event: &HeaterEvent) {
        if let HeaterEvent::StageChanged(change) = event {
            self.set(change.stage_index, change.new_state != 0);
        }
    }
}
