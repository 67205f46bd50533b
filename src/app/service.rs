//! Application service — the hexagonal core.
//!
//! [`HeaterService`] owns the engine state and the safety supervisor.  It
//! exposes one entry point, [`HeaterService::handle`]: fold the inbound
//! command into the state, run exactly one engine tick, forward the result
//! to the event sink.  Time is injected by the caller.
//!
//! ```text
//!  HeaterCommand ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                    │     HeaterService      │
//!  StoragePort  ◀──▶ │  state · safety · tick │
//!                    └────────────────────────┘
//! ```

use chrono::{DateTime, FixedOffset};
use log::{info, warn};

use crate::config::HeaterConfig;
use crate::emitter;
use crate::engine::{self, TickOutcome};
use crate::error::{Error, Result, StorageError};
use crate::override_fsm::OverrideEvent;
use crate::safety::SafetySupervisor;
use crate::state::EngineState;

use super::commands::HeaterCommand;
use super::events::{HeaterEvent, Notice, StatusSnapshot};
use super::ports::{EventSink, StoragePort};

const STATE_NAMESPACE: &str = "heater";
const STATE_KEY: &str = "state";

// ───────────────────────────────────────────────────────────────
// HeaterService
// ───────────────────────────────────────────────────────────────

pub struct HeaterService {
    state: EngineState,
    safety: SafetySupervisor,
    tick_count: u64,
}

impl HeaterService {
    pub fn new(config: HeaterConfig) -> Self {
        Self::from_state(EngineState::new(config))
    }

    pub fn from_state(state: EngineState) -> Self {
        Self {
            state,
            safety: SafetySupervisor::new(),
            tick_count: 0,
        }
    }

    // ── Persistence ───────────────────────────────────────────

    /// Restore the persisted state, or start from defaults when there is
    /// none or it cannot be decoded.
    pub fn restore(storage: &impl StoragePort) -> Self {
        match load_state(storage) {
            Ok(state) => {
                info!("Engine state restored, stages={:?}", state.stage_bits());
                Self::from_state(state)
            }
            Err(Error::Storage(StorageError::NotFound)) => {
                info!("No persisted engine state, starting from defaults");
                Self::new(HeaterConfig::default())
            }
            Err(e) => {
                warn!("Persisted engine state unusable ({e}), starting from defaults");
                Self::new(HeaterConfig::default())
            }
        }
    }

    /// Save the full engine state.
    pub fn persist(&self, storage: &mut impl StoragePort) -> Result<()> {
        let bytes = postcard::to_allocvec(&self.state).map_err(|_| Error::Codec("engine state encode"))?;
        storage.write(STATE_NAMESPACE, STATE_KEY, &bytes)?;
        Ok(())
    }

    // ── Per-command orchestration ─────────────────────────────

    /// Apply `cmd`, then run one engine tick at `now`.
    pub fn handle(
        &mut self,
        cmd: HeaterCommand,
        now: &DateTime<FixedOffset>,
        sink: &mut impl EventSink,
    ) -> TickOutcome {
        self.tick_count += 1;
        let now_secs = crate::epoch_secs(now);

        match cmd {
            HeaterCommand::UpdateConfig(partial) => {
                let report = self.state.config.merge(&partial);
                sink.emit(&HeaterEvent::Notice(Notice::ConfigUpdated {
                    applied: report.applied.len(),
                    rejected: report.rejected.len(),
                }));
            }
            HeaterCommand::Manual(force) => {
                self.state.override_mode = self
                    .state
                    .override_mode
                    .transition(OverrideEvent::Command(force), now_secs);
                let notice = if force {
                    info!("Manual override: FORCE ON");
                    Notice::ManualForced
                } else {
                    info!("Manual override released: AUTO");
                    Notice::AutoRestored
                };
                sink.emit(&HeaterEvent::Notice(notice));
            }
            HeaterCommand::Reading(channel, value) => {
                self.state.apply_reading(channel, value);
            }
            HeaterCommand::Tick => {}
        }

        let outcome = engine::tick(&mut self.state, now);

        if outcome.override_expired {
            info!("Manual override timed out: AUTO");
            sink.emit(&HeaterEvent::Notice(Notice::ManualTimedOut));
        }
        if !outcome.suppressed && !self.state.override_mode.is_manual() {
            self.safety.update(outcome.inhibits);
        }

        for change in &outcome.emission.changes {
            sink.emit(&HeaterEvent::StageChanged(*change));
        }
        if let Some(status) = &outcome.emission.status {
            sink.emit(&HeaterEvent::Status(status.clone()));
        }

        outcome
    }

    // ── Queries ───────────────────────────────────────────────

    /// Unthrottled status snapshot (does not touch the throttle clock).
    pub fn status(&self, now: &DateTime<FixedOffset>) -> StatusSnapshot {
        emitter::snapshot(&self.state, now)
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn config(&self) -> &HeaterConfig {
        &self.state.config
    }

    /// Inhibit mask from the last automatic tick.
    pub fn inhibits(&self) -> u8 {
        self.safety.inhibits()
    }

    /// Commands handled since construction.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

fn load_state(storage: &impl StoragePort) -> Result<EngineState> {
    let bytes = storage.read(STATE_NAMESPACE, STATE_KEY)?;
    postcard::from_bytes(&bytes).map_err(|_| Error::Storage(StorageError::Corrupted))
}
