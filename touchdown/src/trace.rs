//! Recorded telemetry traces.
//!
//! A trace is a JSON-lines file with one [`TraceRecord`] per flight-loop
//! invocation. Traces feed the session offline: the CLI replays them and
//! the integration tests build them. Blank lines and lines starting with
//! `#` are skipped when reading.
//!
//! ```text
//! {"tick":{"elapsed_since_last_call":0.1,"elapsed_time":12.3},"snapshot":{...}}
//! {"tick":{"elapsed_since_last_call":0.1,"elapsed_time":12.4}}
//! ```
//!
//! A record without a snapshot is a tick where telemetry was unavailable.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::telemetry::{TelemetryProvider, TelemetrySnapshot, Tick};

/// Errors reading or writing traces.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid trace record at line {line}: {source}")]
    Record {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode trace record: {0}")]
    Encode(#[source] serde_json::Error),
}

/// One flight-loop invocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub tick: Tick,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<TelemetrySnapshot>,
}

impl TraceRecord {
    /// Record for one tick; `None` when the host had no telemetry.
    pub fn new(tick: Tick, snapshot: Option<TelemetrySnapshot>) -> Self {
        Self { tick, snapshot }
    }
}

/// Replaying a record provides its snapshot.
impl TelemetryProvider for TraceRecord {
    fn read(&mut self) -> Option<TelemetrySnapshot> {
        self.snapshot
    }
}

/// Writes trace records as JSON lines.
#[derive(Debug)]
pub struct TraceWriter<W: Write> {
    writer: W,
    records: usize,
}

impl TraceWriter<BufWriter<File>> {
    /// Create (or truncate) a trace file.
    pub fn create(path: &Path) -> Result<Self, TraceError> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> TraceWriter<W> {
    /// Write records to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer, records: 0 }
    }

    /// Append one record.
    pub fn write(&mut self, record: &TraceRecord) -> Result<(), TraceError> {
        serde_json::to_writer(&mut self.writer, record).map_err(TraceError::Encode)?;
        self.writer.write_all(b"\n")?;
        self.records += 1;
        Ok(())
    }

    /// Records written so far.
    pub fn records(&self) -> usize {
        self.records
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> Result<W, TraceError> {
        self.writer.flush()?;
        debug!(records = self.records, "Trace written");
        Ok(self.writer)
    }
}

/// Read all records from a JSON-lines source.
pub fn read_records<R: BufRead>(reader: R) -> Result<Vec<TraceRecord>, TraceError> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let record = serde_json::from_str(trimmed).map_err(|source| TraceError::Record {
            line: index + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Read a trace file.
pub fn read_trace(path: &Path) -> Result<Vec<TraceRecord>, TraceError> {
    let file = File::open(path)?;
    let records = read_records(BufReader::new(file))?;
    debug!(path = %path.display(), records = records.len(), "Trace read");
    Ok(records)
}
