//! Latest known sensor readings.
//!
//! Readings are stored as-is; the controller does not sanity-check sensors
//! (an SOC of 130 % is simply a high SOC).  A channel that never reports
//! keeps its last value.

use serde::{Deserialize, Serialize};

/// Inbound telemetry channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Battery charge (+) / discharge (−) power, W.
    BatteryPower,
    /// Battery state of charge, %.
    Soc,
    /// Per-phase AC load attributed to stage 0, W.
    LoadL1,
    /// Per-phase AC load attributed to stage 1, W.
    LoadL2,
    /// Per-phase AC load attributed to stage 2, W.
    LoadL3,
    /// Hot-water tank temperature.
    TankTemp,
    /// Inverter output load, W.
    InverterLoad,
}

impl Channel {
    /// Stage index for the per-phase load channels.
    pub fn stage_index(self) -> Option<usize> {
        match self {
            Self::LoadL1 => Some(0),
            Self::LoadL2 => Some(1),
            Self::LoadL3 => Some(2),
            _ => None,
        }
    }
}

/// Scalar readings that feed the safety gate and hysteresis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Telemetry {
    pub battery_power: f64,
    pub soc: f64,
    pub tank_temp: f64,
    pub inverter_load: f64,
}

impl Telemetry {
    /// Store a scalar reading.  Returns `false` for the per-stage load
    /// channels, which live on the stage records instead.
    pub fn apply(&mut self, channel: Channel, value: f64) -> bool {
        match channel {
            Channel::BatteryPower => self.battery_power = value,
            Channel::Soc => self.soc = value,
            Channel::TankTemp => self.tank_temp = value,
            Channel::InverterLoad => self.inverter_load = value,
            Channel::LoadL1 | Channel::LoadL2 | Channel::LoadL3 => return false,
        }
        true
    }
}
