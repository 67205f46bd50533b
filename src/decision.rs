//! Relay decision engine.
//!
//! Computes at most one stage transition per tick from the committed
//! state.  Deciding is pure; [`apply`] is the only place stage records and
//! the global change clock are written.
//!
//! ```text
//!  manual ──────────────────────────────▶ ForceAllOn (unless already all ON)
//!  auto, inhibited ─────────────────────▶ shed highest-load ON stage
//!  auto, eligible, P > onThreshold ─────▶ add lowest-load OFF stage
//!  auto, eligible, P < offThreshold ────▶ shed highest-load ON stage
//!  auto, eligible, inside band ─────────▶ Hold
//! ```
//!
//! Only the selected candidate's dwell timer is checked.  If it is still
//! dwelling the tick holds; the next candidate is not tried.

use log::{debug, info};

use crate::failsafe::FailsafeTimers;
use crate::state::{EngineState, STAGE_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldReason {
    /// Battery power inside the hysteresis band.
    InBand,
    /// Manual mode and every stage is already ON.
    AlreadyAllOn,
    /// No stage in the required state.
    NoCandidate,
    /// The selected stage has not finished its dwell time.
    Dwelling(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Hold(HoldReason),
    StageOn(usize),
    StageOff(usize),
    /// Manual override: every stage ON in one atomic update.
    ForceAllOn,
}

/// Pick this tick's transition.  `eligible` is the outcome of the safety
/// gate and is ignored in manual mode.
pub fn decide(state: &EngineState, eligible: bool, now: f64) -> Decision {
    if state.override_mode.is_manual() {
        return if state.all_on() {
            Decision::Hold(HoldReason::AlreadyAllOn)
        } else {
            Decision::ForceAllOn
        };
    }

    let timers = FailsafeTimers::new(state, now);
    let power = state.telemetry.battery_power;

    let shed = || match highest_load_on(state) {
        None => Decision::Hold(HoldReason::NoCandidate),
        Some(i) if timers.can_turn_off(i) => Decision::StageOff(i),
        Some(i) => Decision::Hold(HoldReason::Dwelling(i)),
    };

    if !eligible {
        return shed();
    }
    if power > state.config.on_threshold {
        return match lowest_load_off(state) {
            None => Decision::Hold(HoldReason::NoCandidate),
            Some(i) if timers.can_turn_on(i) => Decision::StageOn(i),
            Some(i) => Decision::Hold(HoldReason::Dwelling(i)),
        };
    }
    if power < state.config.off_threshold {
        return shed();
    }

    Decision::Hold(HoldReason::InBand)
}

/// Commit a decision.  Returns `true` if any stage changed.
pub fn apply(state: &mut EngineState, decision: Decision, now: f64) -> bool {
    match decision {
        Decision::Hold(reason) => {
            debug!("Hold: {reason:?}");
            false
        }
        Decision::StageOn(i) => {
            state.set_stage(i, true, now);
            info!("Stage {i} ON (load {:.0} W)", state.stages[i].load);
            true
        }
        Decision::StageOff(i) => {
            state.set_stage(i, false, now);
            info!("Stage {i} OFF (load {:.0} W)", state.stages[i].load);
            true
        }
        Decision::ForceAllOn => {
            for i in 0..STAGE_COUNT {
                state.set_stage(i, true, now);
            }
            info!("Manual override: all stages ON");
            true
        }
    }
}

/// ON stage with the highest load; ties go to the lowest index.
fn highest_load_on(state: &EngineState) -> Option<usize> {
    select(state, true, |candidate, best| candidate > best)
}

/// OFF stage with the lowest load; ties go to the lowest index.
fn lowest_load_off(state: &EngineState) -> Option<usize> {
    select(state, false, |candidate, best| candidate < best)
}

fn select(state: &EngineState, on: bool, better: impl Fn(f64, f64) -> bool) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, stage) in state.stages.iter().enumerate() {
        if stage.on != on {
            continue;
        }
        match best {
            Some(b) if !better(stage.load, state.stages[b].load) => {}
            _ => best = Some(i),
        }
    }
    best
}
