//! Completed-day journal.
//!
//! Each time the user completes a ritual day, a record is appended to a
//! JSONL (JSON Lines) journal with file locking. The journal is the durable
//! history behind the profile's completed-day counter and the CSV export.

use crate::Result;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One completed ritual day
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompletedDay {
    pub id: Uuid,
    pub program_id: String,
    /// The finished day (1-based)
    pub day: u32,
    pub completed_at: DateTime<Utc>,
    /// Completion fraction of the ritual at the moment the day was closed
    pub fraction: f64,
}

impl CompletedDay {
    /// Build a journal record from a tracker day completion
    pub fn from_completion(completion: &crate::DayCompletion, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            program_id: completion.program_id.clone(),
            day: completion.day,
            completed_at: at,
            fraction: completion.fraction,
        }
    }
}

/// Sink trait for persisting completed days
pub trait RitualSink {
    fn append(&mut self, record: &CompletedDay) -> Result<()>;
}

/// JSONL-based journal with file locking
pub struct JsonlJournal {
    path: PathBuf,
}

impl JsonlJournal {
    /// Create a new journal handle for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl RitualSink for JsonlJournal {
    fn append(&mut self, record: &CompletedDay) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(record)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        file.unlock()?;

        tracing::debug!("Appended completed day {} to journal", record.id);
        Ok(())
    }
}

/// Read all records from a journal file
///
/// Malformed lines are logged and skipped rather than failing the read.
pub fn read_records(path: &Path) -> Result<Vec<CompletedDay>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<CompletedDay>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Failed to parse record at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} records from journal", records.len());
    Ok(records)
}
