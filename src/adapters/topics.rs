//! Broker topic adapter.
//!
//! Maps `{topic, payload}` messages from the energy system's message bus
//! onto [`HeaterCommand`]s, and encodes [`HeaterEvent`]s back into
//! outbound messages.
//!
//! | Topic                 | Payload        | Command                         |
//! |-----------------------|----------------|---------------------------------|
//! | `/Heater/Config`      | object         | `UpdateConfig`                  |
//! | `/Heater/Manual`      | any (truthy)   | `Manual`                        |
//! | `/Heater/Tick`        | ignored        | `Tick`                          |
//! | `/Dc/Battery/Power`   | number         | `Reading(BatteryPower)`         |
//! | `/Dc/Battery/Soc`     | number         | `Reading(Soc)`                  |
//! | `/Ac/L{1,2,3}/Power`  | number         | `Reading(LoadL{1,2,3})`         |
//! | `/Boiler/Temp`        | number         | `Reading(TankTemp)`             |
//! | `/Inverter/Load`      | number         | `Reading(InverterLoad)`         |
//!
//! Unknown topics, non-object configs and non-numeric readings still
//! count as a tick with no new data.

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::app::commands::HeaterCommand;
use crate::app::events::HeaterEvent;
use crate::error::{Error, Result};
use crate::telemetry::Channel;

pub const CONFIG_TOPIC: &str = "/Heater/Config";
pub const MANUAL_TOPIC: &str = "/Heater/Manual";
pub const TICK_TOPIC: &str = "/Heater/Tick";
pub const STATUS_TOPIC: &str = "/Heater/Status";

/// One bus message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub topic: String,
    #[serde(default)]
    pub payload: Value,
}

impl Message {
    pub fn new(topic: impl Into<String>, payload: Value) -> Self {
        Self {
            topic: topic.into(),
            payload,
        }
    }
}

/// Outbound topic for stage `i`.
pub fn stage_topic(i: usize) -> String {
    format!("/Relay/{i}/State")
}

fn sensor_channel(topic: &str) -> Option<Channel> {
    Some(match topic {
        "/Dc/Battery/Power" => Channel::BatteryPower,
        "/Dc/Battery/Soc" => Channel::Soc,
        "/Ac/L1/Power" => Channel::LoadL1,
        "/Ac/L2/Power" => Channel::LoadL2,
        "/Ac/L3/Power" => Channel::LoadL3,
        "/Boiler/Temp" => Channel::TankTemp,
        "/Inverter/Load" => Channel::InverterLoad,
        _ => return None,
    })
}

/// Translate an inbound message into a command.
pub fn route(msg: &Message) -> HeaterCommand {
    match msg.topic.as_str() {
        CONFIG_TOPIC => match &msg.payload {
            Value::Object(partial) => HeaterCommand::UpdateConfig(partial.clone()),
            other => {
                debug!("Config payload is not an object ({other}), ticking only");
                HeaterCommand::Tick
            }
        },
        MANUAL_TOPIC => HeaterCommand::Manual(is_truthy(&msg.payload)),
        TICK_TOPIC => HeaterCommand::Tick,
        topic => match sensor_channel(topic) {
            Some(channel) => match numeric(&msg.payload) {
                Some(value) => HeaterCommand::Reading(channel, value),
                None => {
                    debug!("Non-numeric reading on {topic}, value unchanged");
                    HeaterCommand::Tick
                }
            },
            None => HeaterCommand::Tick,
        },
    }
}

/// Encode an outbound event.  Notices are log-only and yield `None`.
pub fn encode(event: &HeaterEvent) -> Result<Option<Message>> {
    match event {
        HeaterEvent::StageChanged(change) => Ok(Some(Message::new(
            stage_topic(change.stage_index),
            Value::from(change.new_state),
        ))),
        HeaterEvent::Status(status) => {
            let payload = serde_json::to_value(status).map_err(|_| Error::Codec("status encode"))?;
            Ok(Some(Message::new(STATUS_TOPIC, payload)))
        }
        HeaterEvent::Notice(_) => Ok(None),
    }
}

/// Loose truthiness, as used by dashboard switches: `false`, `0`, `""`,
/// `null` are false; everything else is true.
pub fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Numbers, or text that parses as a finite number (bus payloads are
/// often strings).
fn numeric(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|x| x.is_finite()),
        _ => None,
    }
}
