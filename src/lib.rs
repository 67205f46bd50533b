//! Heatstage controller library.
//!
//! Decides, once per inbound message, whether to add a heating stage,
//! shed one, hold, or force all three ON under manual override.  The
//! engine is pure and clock-free: the host injects the wall-clock time
//! and owns the [`state::EngineState`].

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod decision;
pub mod emitter;
pub mod engine;
pub mod failsafe;
pub mod override_fsm;
pub mod safety;
pub mod schedule;
pub mod state;
pub mod telemetry;

pub mod adapters;
pub mod drivers;

mod error;

pub use error::{ConfigError, Error, Result, ScheduleError, StorageError};

use chrono::{DateTime, TimeZone};

/// Epoch seconds (millisecond resolution) used by every stored clock.
pub fn epoch_secs<Tz: TimeZone>(now: &DateTime<Tz>) -> f64 {
    now.timestamp_millis() as f64 / 1000.0
}
