//! Heatstage host runner.
//!
//! Bridges a message bus to the controller over stdio: one JSON message
//! `{"topic": ..., "payload": ...}` per input line, one JSON message per
//! outbound relay state or status snapshot on stdout.
//!
//! ```text
//!  stdin ──▶ topics::route ──▶ HeaterService ──▶ (LogEventSink, StdoutPublisher)
//!                                  │
//!                                  └──▶ FileStorage (optional, after every message)
//! ```

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{error, info, warn};
use serde_json::Value;

use heatstage::adapters::clock::SystemClock;
use heatstage::adapters::file_storage::FileStorage;
use heatstage::adapters::log_sink::LogEventSink;
use heatstage::adapters::topics::{self, Message};
use heatstage::app::commands::HeaterCommand;
use heatstage::app::events::HeaterEvent;
use heatstage::app::ports::{ClockPort, EventSink};
use heatstage::app::service::HeaterService;
use heatstage::config::HeaterConfig;

#[derive(Debug, Parser)]
#[command(version, about = "Staged relay controller for PV-surplus water heating")]
struct Args {
    /// Directory to persist engine state in; omit to start fresh every run.
    #[arg(long)]
    state_dir: Option<PathBuf>,

    /// JSON object with an initial partial configuration.
    #[arg(long)]
    config: Option<PathBuf>,
}

// ── Stdout publisher ──────────────────────────────────────────

/// Writes encoded outbound messages as JSON lines.
struct StdoutPublisher<W: Write> {
    out: W,
}

impl<W: Write> EventSink for StdoutPublisher<W> {
    fn emit(&mut self, event: &HeaterEvent) {
        let message = match topics::encode(event) {
            Ok(Some(m)) => m,
            Ok(None) => return,
            Err(e) => {
                error!("Dropping outbound event: {e}");
                return;
            }
        };
        let written = serde_json::to_writer(&mut self.out, &message)
            .map_err(io::Error::from)
            .and_then(|()| writeln!(self.out))
            .and_then(|()| self.out.flush());
        if let Err(e) = written {
            error!("Publish to stdout failed: {e}");
        }
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    info!("heatstage v{}", env!("CARGO_PKG_VERSION"));

    let clock = SystemClock::new();
    let mut storage = args.state_dir.map(FileStorage::new);
    let mut service = match &storage {
        Some(store) => HeaterService::restore(store),
        None => HeaterService::new(HeaterConfig::default()),
    };

    let mut sink = (
        LogEventSink::new(),
        StdoutPublisher {
            out: io::stdout().lock(),
        },
    );

    if let Some(path) = &args.config {
        let partial = load_partial_config(path)?;
        service.handle(HeaterCommand::UpdateConfig(partial), &clock.now(), &mut sink);
    }

    for line in io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let message: Message = match serde_json::from_str(&line) {
            Ok(m) => m,
            Err(e) => {
                warn!("Skipping malformed message ({e}): {line}");
                continue;
            }
        };

        service.handle(topics::route(&message), &clock.now(), &mut sink);

        if let Some(store) = storage.as_mut() {
            if let Err(e) = service.persist(store) {
                warn!("Engine state not persisted: {e}");
            }
        }
    }

    info!("Input closed after {} messages, exiting", service.tick_count());
    Ok(())
}

fn load_partial_config(path: &Path) -> Result<serde_json::Map<String, Value>> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    match serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))? {
        Value::Object(map) => Ok(map),
        _ => bail!("{} must contain a JSON object", path.display()),
    }
}
