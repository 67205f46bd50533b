//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade.  The broker publisher and the relay bank implement
//! the same trait; the host runner fans out to all of them.

use log::info;

use crate::app::events::{HeaterEvent, Notice};
use crate::app::ports::EventSink;

/// Adapter that logs every [`HeaterEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &HeaterEvent) {
        match event {
            HeaterEvent::StageChanged(c) => {
                info!("STAGE | {} -> {}", c.stage_index, if c.new_state == 1 { "ON" } else { "OFF" });
            }
            HeaterEvent::Status(s) => {
                info!(
                    "STATUS | mode={:?} | stages={:?} | P={:.0}W SOC={:.1}% | \
                     tank={:.1}\u{00b0} inverter={:.0}W | at {}",
                    s.mode, s.stages, s.battery_power, s.soc, s.tank_temp, s.inverter_load, s.timestamp,
                );
            }
            HeaterEvent::Notice(n) => match n {
                Notice::ConfigUpdated { applied, rejected } => {
                    info!("NOTICE | config updated ({applied} applied, {rejected} rejected)");
                }
                Notice::ManualForced => info!("NOTICE | MANUAL: FORCE ON"),
                Notice::AutoRestored => info!("NOTICE | AUTO"),
                Notice::ManualTimedOut => info!("NOTICE | AUTO (manual timeout)"),
            },
        }
    }
}
