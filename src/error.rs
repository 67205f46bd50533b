//! Unified error types for the heater controller.
//!
//! A single `Error` enum for the fallible paths: evaluating the operating
//! window and persisting state.  None of these cross the tick boundary:
//! the safety gate turns schedule faults into a fail-closed inhibit and
//! storage faults are surfaced only to the host that asked for persistence.
//! Config faults are not errors at all; they are collected per key in a
//! `MergeReport` as [`ConfigError`]s.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The operating window could not be evaluated.
    Schedule(ScheduleError),
    /// The persistence backend failed.
    Storage(StorageError),
    /// Persisted or wire data could not be encoded/decoded.
    Codec(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schedule(e) => write!(f, "schedule: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Codec(msg) => write!(f, "codec: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Schedule errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Not an `HH:MM` time of day (or out of range).
    InvalidTimeOfDay(String),
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTimeOfDay(raw) => write!(f, "invalid time of day {raw:?}"),
        }
    }
}

impl From<ScheduleError> for Error {
    fn from(e: ScheduleError) -> Self {
        Self::Schedule(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The value for `key` had the wrong JSON type; the prior value is kept.
    TypeMismatch { key: String, expected: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { key, expected } => {
                write!(f, "{key}: expected {expected}, value rejected")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Storage errors
// ---------------------------------------------------------------------------

/// Errors from [`StoragePort`](crate::app::ports::StoragePort) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Backing store is full.
    Full,
    /// Generic I/O error.
    IoError,
    /// Stored blob failed to decode.
    Corrupted,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
            Self::Corrupted => write!(f, "stored data corrupted"),
        }
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

pub type Result<T> = core::result::Result<T, Error>;
