//! Fuzz target: inbound bus messages
//!
//! Splits the input into JSON lines, routes every line that parses as a
//! bus message into the service and runs a tick.  Nothing may panic, and
//! automatic ticks never toggle more than one stage.
//!
//! cargo fuzz run fuzz_bus_message

#![no_main]

use chrono::{Duration, FixedOffset, TimeZone};
use heatstage::adapters::topics::{self, Message};
use heatstage::app::commands::HeaterCommand;
use heatstage::app::service::HeaterService;
use heatstage::config::HeaterConfig;
use libfuzzer_sys::fuzz_target;

struct Discard;

impl heatstage::app::ports::EventSink for Discard {
    fn emit(&mut self, event: &heatstage::app::events::HeaterEvent) {
        let _ = topics::encode(event);
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let mut app = HeaterService::new(HeaterConfig::default());
    let mut now = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2025, 6, 21, 12, 0, 0)
        .unwrap();

    for line in text.lines() {
        now += Duration::seconds(7);
        let Ok(message) = serde_json::from_str::<Message>(line) else {
            continue;
        };
        let cmd = topics::route(&message);
        let manual = matches!(cmd, HeaterCommand::Manual(_)) || app.state().override_mode.is_manual();
        let outcome = app.handle(cmd, &now, &mut Discard);
        if !manual {
            assert!(outcome.emission.changes.len() <= 1, "auto tick changed several stages");
        }
    }
    let _ = app.status(&now);
});
