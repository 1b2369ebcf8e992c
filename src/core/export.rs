// LogSift - core/export.rs
//
// JSON and CSV rendering of the structured entry contract, written to any
// Write trait object. The engine owns no on-disk format; these are the
// shapes a display or report collaborator consumes.

use crate::core::model::LogEntry;
use crate::util::error::ExportError;
use serde::Serialize;
use std::io::Write;

/// The per-entry output contract: line number, ISO-8601 timestamp or null,
/// canonical level or null, message, source or null.
#[derive(Debug, Serialize)]
struct EntryRecord<'a> {
    line_number: u64,
    timestamp: Option<String>,
    level: Option<&'static str>,
    message: &'a str,
    source: Option<&'a str>,
}

impl<'a> From<&'a LogEntry> for EntryRecord<'a> {
    fn from(entry: &'a LogEntry) -> Self {
        Self {
            line_number: entry.line_number,
            timestamp: entry.timestamp.map(|ts| ts.to_rfc3339()),
            level: entry.level.map(|l| l.as_str()),
            message: &entry.message,
            source: entry.source.as_deref(),
        }
    }
}

/// Write entries as a JSON array of contract records.
pub fn entries_to_json<W: Write>(entries: &[LogEntry], writer: W) -> Result<usize, ExportError> {
    let records: Vec<EntryRecord<'_>> = entries.iter().map(EntryRecord::from).collect();
    serde_json::to_writer_pretty(writer, &records).map_err(|source| ExportError::Json { source })?;
    Ok(records.len())
}

/// Write entries as CSV with a header row.
pub fn entries_to_csv<W: Write>(entries: &[LogEntry], writer: W) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["line_number", "timestamp", "level", "message", "source"])
        .map_err(|source| ExportError::Csv { source })?;

    let mut count = 0;
    for entry in entries {
        let record = EntryRecord::from(entry);
        csv_writer
            .write_record([
                record.line_number.to_string().as_str(),
                record.timestamp.as_deref().unwrap_or(""),
                record.level.unwrap_or(""),
                record.message,
                record.source.unwrap_or(""),
            ])
            .map_err(|source| ExportError::Csv { source })?;
        count += 1;
    }

    csv_writer.flush().map_err(|source| ExportError::Io { source })?;
    Ok(count)
}
