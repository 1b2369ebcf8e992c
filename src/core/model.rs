// LogSift - core/model.rs
//
// Core data model types. Pure data definitions with no I/O.
// These types are the shared vocabulary across parsing, filtering,
// statistics, and export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// =============================================================================
// Log Entry (normalised output of parsing)
// =============================================================================

/// A single parsed log event, normalised across all formats.
///
/// Every non-blank input line yields exactly one of these, regardless of
/// whether a grammar matched. Entries are never mutated after creation;
/// filters and statistics only read.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    /// 1-based position of the originating line in the input stream.
    /// Blank lines advance the counter but produce no entry.
    pub line_number: u64,

    /// Parsed timestamp in UTC. `None` when the line carried no
    /// recognisable timestamp — expected for many formats, not an error.
    pub timestamp: Option<DateTime<Utc>>,

    /// Normalised severity, when one was captured or detected.
    pub level: Option<Level>,

    /// Extracted message text, or the full trimmed line when the matched
    /// grammar exposes no message field.
    pub message: String,

    /// Origin tag (service, module, or host) when the grammar exposes one.
    pub source: Option<String>,

    /// Raw captured fields, preserved for diagnostics. Regex captures are
    /// stored as strings; for JSON input this is the full decoded object.
    pub extra: BTreeMap<String, Value>,
}

// =============================================================================
// Level
// =============================================================================

/// Normalised severity levels, ordered least to most severe.
///
/// Format-specific spellings (WARN, err, Crit, ...) are folded into these
/// six canonical tokens by [`Level::parse`] and [`crate::core::level::detect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
    Fatal,
}

impl Level {
    /// All variants in detection priority order (first textual match wins).
    pub const ALL: [Level; 6] = [
        Level::Debug,
        Level::Info,
        Level::Warning,
        Level::Error,
        Level::Critical,
        Level::Fatal,
    ];

    /// Canonical uppercase token, as emitted in the output contract.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
            Level::Fatal => "FATAL",
        }
    }

    /// Parse a raw level string, folding case and common aliases.
    ///
    /// Returns `None` for spellings outside the canonical set and its
    /// aliases; callers decide whether to fall back to content detection.
    pub fn parse(raw: &str) -> Option<Level> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warning" | "warn" => Some(Level::Warning),
            "error" | "err" => Some(Level::Error),
            "critical" | "crit" => Some(Level::Critical),
            "fatal" => Some(Level::Fatal),
            _ => None,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Entry store
// =============================================================================

/// The ordered sequence of entries produced by one parse pass.
///
/// Owned by the parse call that created it; entry order equals input order
/// and `line_number` values are strictly increasing. Filters and statistics
/// read the slice and never write back.
#[derive(Debug, Default)]
pub struct EntryStore {
    entries: Vec<LogEntry>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.entries.iter()
    }

    /// Consume the store, yielding the owned entry sequence.
    pub fn into_entries(self) -> Vec<LogEntry> {
        self.entries
    }
}

impl From<Vec<LogEntry>> for EntryStore {
    fn from(entries: Vec<LogEntry>) -> Self {
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a EntryStore {
    type Item = &'a LogEntry;
    type IntoIter = std::slice::Iter<'a, LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
