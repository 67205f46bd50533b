//! Integration tests for the HeaterService → engine → events pipeline.
//!
//! Drives the service through realistic message sequences with an
//! injected clock and checks the emitted events and persisted state.

use super::mock_hw::{MockStore, RecordingSink, at, noon};

use heatstage::Error;
use heatstage::StorageError;
use heatstage::app::commands::HeaterCommand;
use heatstage::app::events::{HeaterEvent, Notice};
use heatstage::app::ports::StoragePort;
use heatstage::app::service::HeaterService;
use heatstage::config::HeaterConfig;
use heatstage::override_fsm::Mode;
use heatstage::telemetry::Channel;

fn sunny_service(sink: &mut RecordingSink) -> HeaterService {
    let mut app = HeaterService::new(HeaterConfig::default());
    let t = noon();
    for (ch, v) in [
        (Channel::Soc, 95.0),
        (Channel::TankTemp, 25.0),
        (Channel::InverterLoad, 900.0),
        (Channel::LoadL1, 600.0),
        (Channel::LoadL2, 100.0),
        (Channel::LoadL3, 350.0),
    ] {
        app.handle(HeaterCommand::Reading(ch, v), &t, sink);
    }
    sink.take();
    app
}

// ── Staging up and down ──────────────────────────────────────

#[test]
fn surplus_stages_up_by_lowest_load_spaced_by_cooldown() {
    let mut sink = RecordingSink::new();
    let mut app = sunny_service(&mut sink);

    app.handle(HeaterCommand::Reading(Channel::BatteryPower, 2500.0), &at(noon(), 1), &mut sink);
    assert_eq!(sink.stage_changes(), vec![(1, 1)]);

    // Inside the 10 s cooldown: nothing at all.
    sink.take();
    app.handle(HeaterCommand::Tick, &at(noon(), 5), &mut sink);
    assert!(sink.take().is_empty());

    app.handle(HeaterCommand::Tick, &at(noon(), 11), &mut sink);
    app.handle(HeaterCommand::Tick, &at(noon(), 21), &mut sink);
    assert_eq!(sink.stage_changes(), vec![(2, 1), (0, 1)]);
    assert_eq!(app.state().stage_bits(), [1, 1, 1]);
}

#[test]
fn stage_on_cannot_turn_off_before_min_on() {
    let mut sink = RecordingSink::new();
    let mut app = sunny_service(&mut sink);

    app.handle(HeaterCommand::Reading(Channel::BatteryPower, 2500.0), &at(noon(), 0), &mut sink);
    assert_eq!(app.state().stage_bits(), [0, 1, 0]);

    app.handle(HeaterCommand::Reading(Channel::BatteryPower, -3000.0), &at(noon(), 30), &mut sink);
    app.handle(HeaterCommand::Tick, &at(noon(), 59), &mut sink);
    assert_eq!(app.state().stage_bits(), [0, 1, 0], "still dwelling");

    app.handle(HeaterCommand::Tick, &at(noon(), 60), &mut sink);
    assert_eq!(app.state().stage_bits(), [0, 0, 0]);
}

#[test]
fn stage_off_cannot_turn_back_on_before_min_off() {
    let mut sink = RecordingSink::new();
    let mut app = sunny_service(&mut sink);

    app.handle(HeaterCommand::Reading(Channel::BatteryPower, 2500.0), &at(noon(), 0), &mut sink);
    app.handle(HeaterCommand::Reading(Channel::BatteryPower, -3000.0), &at(noon(), 60), &mut sink);
    assert_eq!(app.state().stage_bits(), [0, 0, 0]);

    // Stage 1 is still the lowest-load OFF stage and is dwelling.
    app.handle(HeaterCommand::Reading(Channel::BatteryPower, 2500.0), &at(noon(), 80), &mut sink);
    assert_eq!(app.state().stage_bits(), [0, 0, 0]);
    app.handle(HeaterCommand::Tick, &at(noon(), 120), &mut sink);
    assert_eq!(app.state().stage_bits(), [0, 1, 0]);
}

#[test]
fn hysteresis_band_holds_whatever_is_on() {
    let mut sink = RecordingSink::new();
    let mut app = sunny_service(&mut sink);
    app.handle(HeaterCommand::Reading(Channel::BatteryPower, 2500.0), &at(noon(), 0), &mut sink);

    for s in (100..400).step_by(15) {
        app.handle(HeaterCommand::Reading(Channel::BatteryPower, 500.0), &at(noon(), s), &mut sink);
    }
    assert_eq!(app.state().stage_bits(), [0, 1, 0]);
}

#[test]
fn tank_limit_sheds_highest_load_stage_first() {
    let mut sink = RecordingSink::new();
    let mut app = sunny_service(&mut sink);
    app.handle(HeaterCommand::Reading(Channel::BatteryPower, 2500.0), &at(noon(), 0), &mut sink);
    app.handle(HeaterCommand::Tick, &at(noon(), 10), &mut sink);
    app.handle(HeaterCommand::Tick, &at(noon(), 20), &mut sink);
    assert_eq!(app.state().stage_bits(), [1, 1, 1]);
    sink.take();

    app.handle(HeaterCommand::Reading(Channel::LoadL2, 800.0), &at(noon(), 90), &mut sink);
    app.handle(HeaterCommand::Reading(Channel::TankTemp, 40.0), &at(noon(), 91), &mut sink);
    assert_eq!(sink.stage_changes(), vec![(1, 0)]);
}

// ── Manual override ──────────────────────────────────────────

#[test]
fn manual_override_forces_all_on_then_times_out() {
    let mut sink = RecordingSink::new();
    let mut app = sunny_service(&mut sink);
    app.handle(HeaterCommand::Reading(Channel::TankTemp, 80.0), &at(noon(), 0), &mut sink);
    sink.take();

    app.handle(HeaterCommand::Manual(true), &at(noon(), 5), &mut sink);
    assert_eq!(app.state().stage_bits(), [1, 1, 1]);
    let events = sink.take();
    assert_eq!(events[0], HeaterEvent::Notice(Notice::ManualForced));
    match events.last() {
        Some(HeaterEvent::Status(s)) => {
            assert!(s.manual_override);
            assert_eq!(s.mode, Mode::Manual);
        }
        other => panic!("expected status, got {other:?}"),
    }

    app.handle(HeaterCommand::Tick, &at(noon(), 605), &mut sink);
    assert!(app.state().override_mode.is_manual());

    app.handle(HeaterCommand::Tick, &at(noon(), 606), &mut sink);
    let events = sink.take();
    assert!(events.contains(&HeaterEvent::Notice(Notice::ManualTimedOut)));
    assert!(!app.state().override_mode.is_manual());
    // Tank is hot, so AUTO immediately starts shedding.
    assert_eq!(app.state().stage_bits().iter().filter(|&&b| b == 1).count(), 2);
}

#[test]
fn manual_release_returns_control_to_auto() {
    let mut sink = RecordingSink::new();
    let mut app = sunny_service(&mut sink);
    app.handle(HeaterCommand::Manual(true), &at(noon(), 0), &mut sink);
    app.handle(HeaterCommand::Manual(false), &at(noon(), 100), &mut sink);

    assert!(!app.state().override_mode.is_manual());
    assert_eq!(app.state().override_mode.activated_at(), 0.0);
    assert!(sink.take().contains(&HeaterEvent::Notice(Notice::AutoRestored)));
}

#[test]
fn manual_respects_global_cooldown() {
    let mut sink = RecordingSink::new();
    let mut app = sunny_service(&mut sink);
    app.handle(HeaterCommand::Reading(Channel::BatteryPower, 2500.0), &at(noon(), 0), &mut sink);
    sink.take();

    app.handle(HeaterCommand::Manual(true), &at(noon(), 3), &mut sink);
    assert_eq!(app.state().stage_bits(), [0, 1, 0]);
    assert_eq!(sink.take(), vec![HeaterEvent::Notice(Notice::ManualForced)]);

    app.handle(HeaterCommand::Tick, &at(noon(), 10), &mut sink);
    assert_eq!(app.state().stage_bits(), [1, 1, 1]);
    assert_eq!(sink.stage_changes(), vec![(0, 1), (2, 1)]);
}

// ── Status throttle ──────────────────────────────────────────

#[test]
fn unchanged_status_is_throttled_to_interval() {
    let mut sink = RecordingSink::new();
    let mut app = sunny_service(&mut sink);
    app.handle(HeaterCommand::Tick, &at(noon(), 0), &mut sink);
    sink.take();

    for s in 1..=20 {
        app.handle(HeaterCommand::Tick, &at(noon(), s), &mut sink);
    }
    assert_eq!(sink.status_count(), 4, "one snapshot per 5 s");
}

// ── Configuration ────────────────────────────────────────────

#[test]
fn config_update_applies_before_the_same_tick() {
    let mut sink = RecordingSink::new();
    let mut app = sunny_service(&mut sink);
    app.handle(HeaterCommand::Reading(Channel::BatteryPower, 700.0), &at(noon(), 0), &mut sink);
    assert_eq!(app.state().stage_bits(), [0, 0, 0]);

    let serde_json::Value::Object(partial) = serde_json::json!({ "onThreshold": 500, "minSoc": "lots" })
    else {
        unreachable!()
    };
    app.handle(HeaterCommand::UpdateConfig(partial), &at(noon(), 1), &mut sink);

    assert_eq!(app.config().on_threshold, 500.0);
    assert_eq!(app.config().min_soc, 70.0);
    assert_eq!(app.state().stage_bits(), [0, 1, 0]);
}

#[test]
fn invalid_schedule_fails_closed_without_crashing() {
    let mut sink = RecordingSink::new();
    let mut app = sunny_service(&mut sink);
    app.handle(HeaterCommand::Reading(Channel::BatteryPower, 2500.0), &at(noon(), 0), &mut sink);

    let serde_json::Value::Object(partial) = serde_json::json!({ "scheduleEnd": "sunset" }) else {
        unreachable!()
    };
    app.handle(HeaterCommand::UpdateConfig(partial), &at(noon(), 60), &mut sink);
    assert_eq!(app.state().stage_bits(), [0, 0, 0]);
    assert_ne!(app.inhibits(), 0);
}

#[test]
fn overnight_window_never_heats() {
    use chrono::{FixedOffset, TimeZone};
    use heatstage::safety::Inhibit;

    let late = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2025, 10, 6, 23, 30, 0)
        .unwrap();
    let mut sink = RecordingSink::new();
    let mut app = HeaterService::new(HeaterConfig::default());

    let serde_json::Value::Object(partial) =
        serde_json::json!({ "scheduleStart": "22:00", "scheduleEnd": "05:00" })
    else {
        unreachable!()
    };
    app.handle(HeaterCommand::UpdateConfig(partial), &late, &mut sink);
    for (ch, v) in [
        (Channel::Soc, 95.0),
        (Channel::TankTemp, 20.0),
        (Channel::InverterLoad, 100.0),
        (Channel::BatteryPower, 3000.0),
    ] {
        app.handle(HeaterCommand::Reading(ch, v), &late, &mut sink);
    }
    for s in [60, 3 * 3600, 5 * 3600] {
        app.handle(HeaterCommand::Tick, &at(late, s), &mut sink);
        assert_eq!(app.state().stage_bits(), [0, 0, 0]);
        assert_eq!(app.inhibits(), Inhibit::OutsideWindow.mask());
    }
    assert!(sink.stage_changes().is_empty());
}

// ── Persistence ──────────────────────────────────────────────

#[test]
fn persisted_state_restores_verbatim() {
    let mut sink = RecordingSink::new();
    let mut app = sunny_service(&mut sink);
    app.handle(HeaterCommand::Reading(Channel::BatteryPower, 2500.0), &at(noon(), 0), &mut sink);
    app.handle(HeaterCommand::Manual(true), &at(noon(), 30), &mut sink);

    let mut store = MockStore::new();
    app.persist(&mut store).unwrap();
    assert!(store.exists("heater", "state"));

    let restored = HeaterService::restore(&store);
    assert_eq!(restored.state(), app.state());
}

#[test]
fn missing_or_corrupt_state_starts_from_defaults() {
    let store = MockStore::new();
    let app = HeaterService::restore(&store);
    assert_eq!(app.state().stage_bits(), [0, 0, 0]);

    let mut store = MockStore::new();
    store.corrupt("heater", "state");
    let app = HeaterService::restore(&store);
    assert_eq!(app.config(), &HeaterConfig::default());
}

#[test]
fn storage_failure_is_reported_to_host() {
    let app = HeaterService::new(HeaterConfig::default());
    let mut store = MockStore::new();
    store.fail_writes = true;
    assert_eq!(app.persist(&mut store), Err(Error::Storage(StorageError::Full)));
}
