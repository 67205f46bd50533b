//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to                   |
//! |----------------|--------------------|-------------------------------|
//! | `clock`        | ClockPort          | Host wall clock / fixed clock |
//! | `file_storage` | StoragePort        | Files under a state directory |
//! | `log_sink`     | EventSink          | `log` facade                  |
//! | `topics`       | —                  | Broker `{topic, payload}` bus |

pub mod clock;
pub mod file_storage;
pub mod log_sink;
pub mod topics;
