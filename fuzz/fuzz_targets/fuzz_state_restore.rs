//! Fuzz target: `HeaterService::restore`
//!
//! Any persisted blob must either decode or fall back to defaults; a tick
//! on the restored service must not panic.
//!
//! cargo fuzz run fuzz_state_restore

#![no_main]

use chrono::{FixedOffset, TimeZone};
use heatstage::StorageError;
use heatstage::app::commands::HeaterCommand;
use heatstage::app::events::HeaterEvent;
use heatstage::app::ports::{EventSink, StoragePort};
use heatstage::app::service::HeaterService;
use libfuzzer_sys::fuzz_target;

struct Blob<'a>(&'a [u8]);

impl StoragePort for Blob<'_> {
    fn read(&self, _: &str, _: &str) -> Result<Vec<u8>, StorageError> {
        Ok(self.0.to_vec())
    }

    fn write(&mut self, _: &str, _: &str, _: &[u8]) -> Result<(), StorageError> {
        Err(StorageError::IoError)
    }

    fn delete(&mut self, _: &str, _: &str) -> Result<(), StorageError> {
        Ok(())
    }

    fn exists(&self, _: &str, _: &str) -> bool {
        true
    }
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _: &HeaterEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let mut app = HeaterService::restore(&Blob(data));
    let now = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2025, 6, 21, 12, 0, 0)
        .unwrap();
    app.handle(HeaterCommand::Tick, &now, &mut Discard);
});
