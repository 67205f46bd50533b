//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ HeaterService (domain)
//! ```
//!
//! Driven adapters (event sinks, relay banks, storage, clocks) implement
//! these traits.  The [`HeaterService`](super::service::HeaterService)
//! consumes them via generics, so the domain core never touches I/O
//! directly.

use chrono::{DateTime, FixedOffset};

use crate::error::StorageError;

use super::events::HeaterEvent;

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → relays / broker / log)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`HeaterEvent`]s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &HeaterEvent);
}

/// Fan out to two sinks, e.g. a relay bank and a publisher.
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&mut self, event: &HeaterEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: &HeaterEvent) {
        (**self).emit(event);
    }
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ disk / flash)
// ───────────────────────────────────────────────────────────────

/// Persistent key-value storage for the engine state.
///
/// - Keys are namespaced to prevent collisions between subsystems.
/// - Write operations MUST be atomic: a crash mid-write must leave
///   either the old or the new blob, never a torn one.
pub trait StoragePort {
    /// Read a whole value.
    fn read(&self, namespace: &str, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Delete a key.  Returns `Ok(())` even if the key didn't exist.
    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError>;

    /// Check whether a key exists without reading it.
    fn exists(&self, namespace: &str, key: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: wall clock → domain)
// ───────────────────────────────────────────────────────────────

/// Source of the local wall-clock time injected into each tick.
pub trait ClockPort {
    fn now(&self) -> DateTime<FixedOffset>;
}
