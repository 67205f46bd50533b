//! Relay bank driven through the service's event stream.

use super::mock_hw::{MockPin, PinProbe, RecordingSink, at, noon};

use heatstage::app::commands::HeaterCommand;
use heatstage::app::events::{HeaterEvent, StageChange};
use heatstage::app::ports::EventSink;
use heatstage::app::service::HeaterService;
use heatstage::config::HeaterConfig;
use heatstage::drivers::relay::{RelayBank, RelayState};
use heatstage::telemetry::Channel;

fn bank() -> (RelayBank<MockPin>, [PinProbe; 3]) {
    let pins = [MockPin::new(), MockPin::new(), MockPin::new()];
    let probes = [pins[0].probe(), pins[1].probe(), pins[2].probe()];
    (RelayBank::new(pins), probes)
}

fn levels(probes: &[PinProbe; 3]) -> [bool; 3] {
    [probes[0].level.get(), probes[1].level.get(), probes[2].level.get()]
}

#[test]
fn new_bank_de_energises_every_coil() {
    let (relays, probes) = bank();
    assert_eq!(relays.states(), [RelayState::Off; 3]);
    assert!(probes.iter().all(|p| p.writes.get() == 1));
    assert_eq!(levels(&probes), [false; 3]);
}

#[test]
fn stage_change_events_drive_pins() {
    let (mut relays, probes) = bank();
    relays.emit(&HeaterEvent::StageChanged(StageChange { stage_index: 2, new_state: 1 }));
    assert_eq!(levels(&probes), [false, false, true]);
    assert_eq!(relays.state(2), RelayState::On);

    relays.emit(&HeaterEvent::StageChanged(StageChange { stage_index: 2, new_state: 0 }));
    assert_eq!(levels(&probes), [false; 3]);
}

#[test]
fn broken_pin_is_marked_faulted_and_resync_recovers() {
    let (mut relays, probes) = bank();
    probes[1].broken.set(true);

    assert!(!relays.set(1, true));
    assert_eq!(relays.state(1), RelayState::Faulted);
    assert!(relays.has_fault());

    probes[1].broken.set(false);
    relays.resync([false, true, false]);
    assert!(!relays.has_fault());
    assert_eq!(levels(&probes), [false, true, false]);
}

#[test]
fn relays_follow_the_engine_through_fan_out() {
    let (relays, probes) = bank();
    let recorder = RecordingSink::new();
    let mut sink = (recorder.clone(), relays);
    let mut app = HeaterService::new(HeaterConfig::default());

    let t = noon();
    app.handle(HeaterCommand::Reading(Channel::Soc, 90.0), &t, &mut sink);
    app.handle(HeaterCommand::Reading(Channel::TankTemp, 20.0), &t, &mut sink);
    app.handle(HeaterCommand::Reading(Channel::InverterLoad, 400.0), &t, &mut sink);
    app.handle(HeaterCommand::Reading(Channel::BatteryPower, 3000.0), &t, &mut sink);
    assert_eq!(levels(&probes), [true, false, false]);

    app.handle(HeaterCommand::Manual(true), &at(t, 15), &mut sink);
    assert_eq!(levels(&probes), [true; 3]);
    assert_eq!(recorder.stage_changes(), vec![(0, 1), (1, 1), (2, 1)]);

    let (_, relays) = sink;
    let states = relays.states();
    assert_eq!(states, [RelayState::On; 3]);
}
