//! Persistent engine state.
//!
//! `EngineState` is the single struct the engine reads from and writes to
//! each tick: per-stage records, the latest telemetry, the override mode,
//! the active configuration and the global clocks.  The host owns it and
//! may persist it between runs; it is restored verbatim.

use serde::{Deserialize, Serialize};

use crate::config::HeaterConfig;
use crate::override_fsm::OverrideMode;
use crate::telemetry::{Channel, Telemetry};

/// Number of relay stages.
pub const STAGE_COUNT: usize = 3;

// ---------------------------------------------------------------------------
// Stage record
// ---------------------------------------------------------------------------

/// Everything known about one relay stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageRecord {
    /// Relay energised.
    pub on: bool,
    /// Epoch seconds of the last toggle in either direction; `0` = never.
    pub last_change: f64,
    /// Last reported phase load (W).  Only a selection tie-break hint.
    pub load: f64,
}

// ---------------------------------------------------------------------------
// EngineState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineState {
    pub stages: [StageRecord; STAGE_COUNT],
    pub telemetry: Telemetry,
    pub override_mode: OverrideMode,
    pub config: HeaterConfig,
    /// Epoch seconds of the last toggle of any stage (anti-chatter clock).
    pub last_any_change: f64,
    /// Epoch seconds of the last status snapshot.
    pub last_status_emit: f64,
}

impl EngineState {
    pub fn new(config: HeaterConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Store a sensor reading on the telemetry block or the stage it feeds.
    pub fn apply_reading(&mut self, channel: Channel, value: f64) {
        match channel.stage_index() {
            Some(i) => self.stages[i].load = value,
            None => {
                self.telemetry.apply(channel, value);
            }
        }
    }

    /// Current ON/OFF vector.
    pub fn stage_vector(&self) -> [bool; STAGE_COUNT] {
        self.stages.map(|s| s.on)
    }

    /// Stage vector as `0|1` for the wire.
    pub fn stage_bits(&self) -> [u8; STAGE_COUNT] {
        self.stages.map(|s| u8::from(s.on))
    }

    pub fn all_on(&self) -> bool {
        self.stages.iter().all(|s| s.on)
    }

    /// Toggle stage `i` and stamp both clocks.
    pub fn set_stage(&mut self, i: usize, on: bool, now: f64) {
        let stage = &mut self.stages[i];
        stage.on = on;
        stage.last_change = now;
        self.last_any_change = now;
    }
}
