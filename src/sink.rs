//! Append-only sinks for report rows.
//!
//! [`JsonlSink`] writes one JSON object per line. Each entry carries the row
//! columns and the time it was recorded.

use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use chrono::Utc;
use serde::Serialize;

use crate::report::ReportRow;

/// A destination that accepts report rows.
pub trait RowSink: Send + Sync {
    /// Append one row.
    ///
    /// # Errors
    ///
    /// Returns an error if the row could not be written.
    fn append(&self, row: &ReportRow) -> anyhow::Result<()>;
}

#[derive(Debug, Serialize)]
struct SinkEntry<'a> {
    recorded_at: String,
    #[serde(flatten)]
    row: &'a ReportRow,
}

/// Row sink writing JSON lines to an append-only writer.
pub struct JsonlSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for JsonlSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonlSink").finish_non_exhaustive()
    }
}

impl JsonlSink {
    /// Create a sink that appends to the given file, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open sink file {}", path.display()))?;
        Ok(Self {
            writer: Mutex::new(Box::new(file)),
        })
    }

    /// Create a sink from an arbitrary writer (for testing).
    pub fn from_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl RowSink for JsonlSink {
    fn append(&self, row: &ReportRow) -> anyhow::Result<()> {
        let entry = SinkEntry {
            recorded_at: Utc::now().to_rfc3339(),
            row,
        };
        let mut line = serde_json::to_string(&entry).context("failed to encode sink row")?;
        line.push('\n');

        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("sink writer lock poisoned: {e}"))?;
        writer
            .write_all(line.as_bytes())
            .context("failed to write sink row")?;
        writer.flush().context("failed to flush sink")?;
        Ok(())
    }
}
