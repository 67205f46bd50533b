//! Controller configuration parameters
//!
//! All tunable thresholds and timers for the staged heater.  The live
//! config is replaced only by [`HeaterConfig::merge`], a shallow per-key
//! override: unknown keys are ignored, mistyped values are rejected one key
//! at a time and the rest of the update still applies.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaterConfig {
    // --- Hysteresis band (battery power, W) ---
    /// Battery power above which a stage is added.
    pub on_threshold: f64,
    /// Battery power below which a stage is shed.
    pub off_threshold: f64,

    // --- Safety gate ---
    /// Minimum battery state of charge (%) to heat at all.
    pub min_soc: f64,
    /// Tank temperature at or above which heating stops.
    pub tank_temp_max: f64,
    /// Inverter load (W) at or above which heating stops.
    pub inverter_load_max: f64,

    // --- Failsafe timers (seconds) ---
    /// Minimum time a stage stays ON before it may turn OFF.
    pub min_on_seconds: f64,
    /// Minimum time a stage stays OFF before it may turn ON.
    pub min_off_seconds: f64,
    /// Global spacing between any two stage transitions.
    pub min_any_change_seconds: f64,
    /// Minimum spacing of unchanged status snapshots.
    pub status_min_interval_seconds: f64,
    /// Manual override auto-expiry; `0` disables expiry.
    pub manual_timeout_seconds: f64,

    // --- Operating window (local time of day, "HH:MM") ---
    pub schedule_start: String,
    pub schedule_end: String,
}

impl Default for HeaterConfig {
    fn default() -> Self {
        Self {
            on_threshold: 1000.0,
            off_threshold: -1000.0,

            min_soc: 70.0,
            tank_temp_max: 40.0,
            inverter_load_max: 5000.0,

            min_on_seconds: 60.0,
            min_off_seconds: 60.0,
            min_any_change_seconds: 10.0,
            status_min_interval_seconds: 5.0,
            manual_timeout_seconds: 600.0,

            schedule_start: "06:00".into(),
            schedule_end: "20:00".into(),
        }
    }
}

/// Outcome of a [`HeaterConfig::merge`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MergeReport {
    /// Keys whose value was taken.
    pub applied: Vec<&'static str>,
    /// Keys whose value was refused; the prior value was kept.
    pub rejected: Vec<ConfigError>,
    /// Keys that name no config field.
    pub ignored: Vec<String>,
}

impl MergeReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

enum Slot<'a> {
    Number(&'a mut f64),
    Text(&'a mut String),
}

impl HeaterConfig {
    /// Shallow-merge a partial update over the current values.
    pub fn merge(&mut self, partial: &Map<String, Value>) -> MergeReport {
        let mut report = MergeReport::default();

        for (key, value) in partial {
            let Some((field, slot)) = self.slot(key) else {
                report.ignored.push(key.clone());
                continue;
            };

            let accepted = match (slot, value) {
                (Slot::Number(target), Value::Number(n)) => match n.as_f64() {
                    Some(v) => {
                        *target = v;
                        true
                    }
                    None => false,
                },
                (Slot::Text(target), Value::String(s)) => {
                    target.clone_from(s);
                    true
                }
                _ => false,
            };

            if accepted {
                report.applied.push(field);
            } else {
                let err = ConfigError::TypeMismatch {
                    key: key.clone(),
                    expected: expected_type(field),
                };
                warn!("Config key rejected: {err}");
                report.rejected.push(err);
            }
        }

        info!(
            "Config merged: {} applied, {} rejected, {} ignored",
            report.applied.len(),
            report.rejected.len(),
            report.ignored.len()
        );
        report
    }

    /// Map a wire key (current name or legacy alias) to its field.
    fn slot(&mut self, key: &str) -> Option<(&'static str, Slot<'_>)> {
        let slot = match key {
            "onThreshold" => ("onThreshold", Slot::Number(&mut self.on_threshold)),
            "offThreshold" => ("offThreshold", Slot::Number(&mut self.off_threshold)),
            "minSoc" => ("minSoc", Slot::Number(&mut self.min_soc)),
            "tankTempMax" | "boilerTempMax" => {
                ("tankTempMax", Slot::Number(&mut self.tank_temp_max))
            }
            "inverterLoadMax" => ("inverterLoadMax", Slot::Number(&mut self.inverter_load_max)),
            "minOnSeconds" | "minOnSec" => ("minOnSeconds", Slot::Number(&mut self.min_on_seconds)),
            "minOffSeconds" | "minOffSec" => {
                ("minOffSeconds", Slot::Number(&mut self.min_off_seconds))
            }
            "minAnyChangeSeconds" | "minAnyChangeSec" => (
                "minAnyChangeSeconds",
                Slot::Number(&mut self.min_any_change_seconds),
            ),
            "statusMinIntervalSeconds" | "statusMinIntervalSec" => (
                "statusMinIntervalSeconds",
                Slot::Number(&mut self.status_min_interval_seconds),
            ),
            "manualTimeoutSeconds" | "manualTimeoutSec" => (
                "manualTimeoutSeconds",
                Slot::Number(&mut self.manual_timeout_seconds),
            ),
            "scheduleStart" | "sunriseTime" => ("scheduleStart", Slot::Text(&mut self.schedule_start)),
            "scheduleEnd" | "sunsetTime" => ("scheduleEnd", Slot::Text(&mut self.schedule_end)),
            _ => return None,
        };
        Some(slot)
    }
}

fn expected_type(field: &str) -> &'static str {
    match field {
        "scheduleStart" | "scheduleEnd" => "string",
        _ => "number",
    }
}
