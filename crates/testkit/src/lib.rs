#![warn(missing_docs)]
//! Deterministic testing surfaces (event journal + metrics plumbing).

mod metrics;

use anyhow::Result;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use voxelstrike_core::{SimEvent, SimTick};

pub use metrics::*;

/// Primary event record captured by headless tests.
#[derive(Debug, Serialize)]
pub struct EventRecord {
    /// Simulation tick when the event occurred.
    pub tick: SimTick,
    /// The simulation event.
    pub event: SimEvent,
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: File,
}

impl JsonlSink {
    /// Create a new sink at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self { file })
    }

    /// Append an event to the log.
    pub fn write(&mut self, record: &EventRecord) -> Result<()> {
        let line = serde_json::to_string(record)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }

    /// Append every event of a drained tick.
    pub fn write_tick(&mut self, tick: SimTick, events: &[SimEvent]) -> Result<()> {
        for event in events {
            self.write(&EventRecord {
                tick,
                event: event.clone(),
            })?;
        }
        Ok(())
    }
}
