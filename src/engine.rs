//! Per-tick pipeline.
//!
//! ```text
//!  override expiry ─▶ global cooldown? ──yes──▶ (nothing emitted)
//!                            │ no
//!                            ▼
//!                 safety gate (auto only)
//!                            ▼
//!                   decide ─▶ apply ─▶ emit
//! ```
//!
//! Runs to completion against an exclusively borrowed [`EngineState`];
//! the caller serialises ticks.

use chrono::{DateTime, FixedOffset};
use log::debug;

use crate::decision::{self, Decision};
use crate::emitter::{self, Emission};
use crate::failsafe::FailsafeTimers;
use crate::override_fsm::OverrideEvent;
use crate::safety;
use crate::state::EngineState;

/// What one tick did.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// Manual override expired at the start of this tick.
    pub override_expired: bool,
    /// The global cooldown suppressed the tick; nothing else ran.
    pub suppressed: bool,
    /// Inhibit mask from the safety gate (`0` in manual mode or when
    /// suppressed).
    pub inhibits: u8,
    pub decision: Option<Decision>,
    pub emission: Emission,
}

/// Run one tick at `now`.
pub fn tick(state: &mut EngineState, now: &DateTime<FixedOffset>) -> TickOutcome {
    let now_secs = crate::epoch_secs(now);

    let was_manual = state.override_mode.is_manual();
    state.override_mode = state.override_mode.transition(
        OverrideEvent::Expire {
            timeout_secs: state.config.manual_timeout_seconds,
        },
        now_secs,
    );
    let override_expired = was_manual && !state.override_mode.is_manual();

    let timers = FailsafeTimers::new(state, now_secs);
    if timers.global_cooldown_active() {
        debug!("Tick suppressed: cooldown {:.1}s remaining", timers.cooldown_remaining());
        return TickOutcome {
            override_expired,
            suppressed: true,
            inhibits: 0,
            decision: None,
            emission: Emission::default(),
        };
    }

    let inhibits = if state.override_mode.is_manual() {
        0
    } else {
        safety::evaluate(state, now)
    };

    let before = state.stage_vector();
    let decision = decision::decide(state, inhibits == 0, now_secs);
    decision::apply(state, decision, now_secs);
    let emission = emitter::emit(before, state, now);

    TickOutcome {
        override_expired,
        suppressed: false,
        inhibits,
        decision: Some(decision),
        emission,
    }
}
