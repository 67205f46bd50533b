//! Application core — pure domain logic, zero I/O.
//!
//! This module wraps the staged relay engine in a service that accepts
//! inbound commands, runs exactly one engine tick per command, and emits
//! structured events.  All interaction with the outside world happens
//! through the **port traits** in [`ports`], keeping this layer fully
//! testable without a broker, relays or a filesystem.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
