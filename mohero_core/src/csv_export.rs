//! CSV export for the completed-day journal.
//!
//! Rolls journal records into an append-only CSV history file, then archives
//! the journal atomically so records are never exported twice.

use crate::journal::CompletedDay;
use crate::Result;
use std::fs::OpenOptions;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    program_id: String,
    day: u32,
    completed_at: String,
    fraction: f64,
}

impl From<&CompletedDay> for CsvRow {
    fn from(record: &CompletedDay) -> Self {
        CsvRow {
            id: record.id.to_string(),
            program_id: record.program_id.clone(),
            day: record.day,
            completed_at: record.completed_at.to_rfc3339(),
            fraction: record.fraction,
        }
    }
}

/// Roll journal records into CSV and archive the journal atomically
///
/// This function:
/// 1. Reads all records from the journal
/// 2. Appends them to the CSV file (creates with headers if needed)
/// 3. Syncs the CSV to disk
/// 4. Renames the journal to .processed
/// 5. Returns the number of records processed
///
/// The CSV is fsynced before the journal is renamed, and the journal is
/// renamed rather than deleted so manual recovery stays possible.
pub fn journal_to_csv_and_archive(journal_path: &Path, csv_path: &Path) -> Result<usize> {
    let records = crate::journal::read_records(journal_path)?;

    if records.is_empty() {
        tracing::info!("No records in journal to export");
        return Ok(0);
    }

    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    // Headers only when the file is empty
    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    for record in &records {
        writer.serialize(CsvRow::from(record))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Wrote {} records to CSV", records.len());

    let processed_path = journal_path.with_extension("jsonl.processed");
    std::fs::rename(journal_path, &processed_path)?;

    tracing::info!("Archived journal to {:?}", processed_path);

    Ok(records.len())
}

/// Clean up old processed journal files in the given directory
pub fn cleanup_processed_journals(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if let Some(extension) = path.extension() {
            if extension == "processed" {
                std::fs::remove_file(&path)?;
                tracing::debug!("Removed processed journal: {:?}", path);
                count += 1;
            }
        }
    }

    if count > 0 {
        tracing::info!("Cleaned up {} processed journal files", count);
    }

    Ok(count)
}
