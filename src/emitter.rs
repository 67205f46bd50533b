//! Output and status emitter.
//!
//! Diffs the stage vector from before and after the decision, producing one
//! stage-change notification per changed stage in ascending index order,
//! and decides whether a status snapshot goes out: always when a stage
//! changed, otherwise at most once per `statusMinIntervalSeconds`.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use heapless::Vec;

use crate::app::events::{StageChange, StatusSnapshot};
use crate::state::{EngineState, STAGE_COUNT};

/// Everything a non-suppressed tick emits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Emission {
    pub changes: Vec<StageChange, STAGE_COUNT>,
    pub status: Option<StatusSnapshot>,
}

impl Emission {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.status.is_none()
    }
}

/// Build the emission for a tick and stamp `last_status_emit` if a
/// snapshot is produced.
pub fn emit(before: [bool; STAGE_COUNT], state: &mut EngineState, now: &DateTime<FixedOffset>) -> Emission {
    let now_secs = crate::epoch_secs(now);
    let mut emission = Emission::default();

    for (i, (was, stage)) in before.iter().zip(state.stages.iter()).enumerate() {
        if *was != stage.on {
            // Capacity equals the stage count, so this cannot overflow.
            let _ = emission.changes.push(StageChange {
                stage_index: i,
                new_state: u8::from(stage.on),
            });
        }
    }

    let due = now_secs - state.last_status_emit >= state.config.status_min_interval_seconds;
    if !emission.changes.is_empty() || due {
        emission.status = Some(snapshot(state, now));
        state.last_status_emit = now_secs;
    }

    emission
}

/// Full status snapshot of the current state.
pub fn snapshot(state: &EngineState, now: &DateTime<FixedOffset>) -> StatusSnapshot {
    let t = &state.telemetry;
    StatusSnapshot {
        stages: state.stage_bits(),
        soc: t.soc,
        battery_power: t.battery_power,
        tank_temp: t.tank_temp,
        inverter_load: t.inverter_load,
        manual_override: state.override_mode.is_manual(),
        mode: state.override_mode.mode(),
        timestamp: iso8601(now),
    }
}

/// ISO-8601 UTC with millisecond precision, e.g. `2025-10-06T10:00:00.000Z`.
pub fn iso8601(now: &DateTime<FixedOffset>) -> String {
    now.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true)
}
