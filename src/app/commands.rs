//! Inbound commands to the application service.
//!
//! These represent everything the outside world (broker topics, the host
//! runner, a scheduler) can deliver to the
//! [`HeaterService`](super::service::HeaterService).  Each one is followed
//! by a single engine tick.

use serde_json::{Map, Value};

use crate::telemetry::Channel;

#[derive(Debug, Clone, PartialEq)]
pub enum HeaterCommand {
    /// Partial configuration update, merged key by key.
    UpdateConfig(Map<String, Value>),

    /// Operator manual override; `true` forces every stage ON.
    Manual(bool),

    /// New sensor reading.
    Reading(Channel, f64),

    /// Bare tick with no new data (e.g. a periodic scheduler).
    Tick,
}
