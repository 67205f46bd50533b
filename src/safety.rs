//! Heating eligibility gate and safety supervisor.
//!
//! Each tick in automatic mode the supervisor evaluates every heating
//! precondition and accumulates the failing ones in an inhibit bitmask.
//! Heating is allowed only when the mask is zero; any set bit makes the
//! decision engine shed load one stage at a time.
//!
//! ## Inhibit lifecycle
//!
//! 1. A condition fails (e.g. tank at max temperature).
//! 2. The supervisor sets the bit and logs the edge once.
//! 3. Every following tick re-evaluates; when the condition clears the bit
//!    is unset and the clearing edge is logged.
//!
//! Multiple inhibits are tracked at once; heating resumes only when all of
//! them have cleared.  A schedule that cannot be parsed counts as
//! `OutsideWindow`.

use core::fmt;

use chrono::{DateTime, FixedOffset};
use log::{info, warn};

use crate::schedule;
use crate::state::EngineState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Inhibit {
    /// Outside the daylight window, or the window is unparsable.
    OutsideWindow = 0b0000_0001,
    /// Battery state of charge below `minSoc`.
    SocLow = 0b0000_0010,
    /// Tank temperature at or above `tankTempMax`.
    TankOverTemp = 0b0000_0100,
    /// Inverter load at or above `inverterLoadMax`.
    InverterOverload = 0b0000_1000,
}

impl Inhibit {
    pub const ALL: [Inhibit; 4] = [
        Self::OutsideWindow,
        Self::SocLow,
        Self::TankOverTemp,
        Self::InverterOverload,
    ];

    pub const fn mask(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Inhibit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutsideWindow => write!(f, "outside operating window"),
            Self::SocLow => write!(f, "battery SOC low"),
            Self::TankOverTemp => write!(f, "tank over temperature"),
            Self::InverterOverload => write!(f, "inverter overload"),
        }
    }
}

/// Evaluate the gate once, without latching or logging edges.
#[allow(clippy::neg_cmp_op_on_partial_ord)]
pub fn evaluate(state: &EngineState, now: &DateTime<FixedOffset>) -> u8 {
    let cfg = &state.config;
    let t = &state.telemetry;
    let mut flags = 0;

    let in_window = match schedule::window_open(cfg, now) {
        Ok(open) => open,
        Err(e) => {
            warn!("Operating window unusable ({e}), treating as closed");
            false
        }
    };
    if !in_window {
        flags |= Inhibit::OutsideWindow.mask();
    }
    // Negated comparisons so a NaN reading inhibits rather than heats.
    if !(t.soc >= cfg.min_soc) {
        flags |= Inhibit::SocLow.mask();
    }
    if !(t.tank_temp < cfg.tank_temp_max) {
        flags |= Inhibit::TankOverTemp.mask();
    }
    if !(t.inverter_load < cfg.inverter_load_max) {
        flags |= Inhibit::InverterOverload.mask();
    }
    flags
}

/// Latches the inhibit mask across ticks to log transitions.
#[derive(Debug, Default)]
pub struct SafetySupervisor {
    inhibits: u8,
}

impl SafetySupervisor {
    pub fn new() -> Self {
        Self { inhibits: 0 }
    }

    /// Record this tick's mask; logs bits that changed.
    pub fn update(&mut self, flags: u8) -> u8 {
        for inhibit in Inhibit::ALL {
            let was = self.inhibits & inhibit.mask() != 0;
            let is = flags & inhibit.mask() != 0;
            match (was, is) {
                (false, true) => info!("INHIBIT SET: {inhibit}"),
                (true, false) => info!("INHIBIT CLEARED: {inhibit}"),
                _ => {}
            }
        }
        self.inhibits = flags;
        flags
    }

    pub fn inhibits(&self) -> u8 {
        self.inhibits
    }
}
