//! Outbound application events.
//!
//! The [`HeaterService`](super::service::HeaterService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: drive relay pins, publish on a broker
//! topic, or write a log line.

use serde::{Deserialize, Serialize};

use crate::override_fsm::Mode;
use crate::state::STAGE_COUNT;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaterEvent {
    /// One stage toggled.  Emitted before the status of the same tick.
    StageChanged(StageChange),

    /// Full status snapshot (throttled unless a stage changed).
    Status(StatusSnapshot),

    /// Informational notice about a mode or configuration change.
    Notice(Notice),
}

/// A single relay stage transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageChange {
    pub stage_index: usize,
    /// `0` = OFF, `1` = ON.
    pub new_state: u8,
}

/// A point-in-time snapshot suitable for publishing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub stages: [u8; STAGE_COUNT],
    pub soc: f64,
    pub battery_power: f64,
    pub tank_temp: f64,
    pub inverter_load: f64,
    pub manual_override: bool,
    pub mode: Mode,
    /// ISO-8601, UTC.
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// A config update was merged (`rejected` keys kept their old value).
    ConfigUpdated { applied: usize, rejected: usize },
    /// Operator forced full-on.
    ManualForced,
    /// Operator returned control to automatic mode.
    AutoRestored,
    /// Manual override expired after `manualTimeoutSeconds`.
    ManualTimedOut,
}
