// LogSift - core/parser.rs
//
// Line-oriented log parsing. Each non-blank input line produces exactly
// one LogEntry via an ordered strategy sequence: JSON-first, explicit or
// auto grammar match, generic fallback. Parsing never fails for
// unparseable content — entries degrade to fewer populated fields.

use crate::core::format::{self, FormatMatch, LogFormat};
use crate::core::level;
use crate::core::model::{EntryStore, Level, LogEntry};
use crate::core::timestamp;
use crate::util::error::ParseError;
use rayon::prelude::*;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

// =============================================================================
// Session entry points
// =============================================================================

/// Parse a log file from disk.
///
/// The one fatal failure in the engine: an unreadable or missing file.
/// Undecodable bytes are replaced rather than rejected, so a partially
/// binary file still yields entries for its readable lines.
pub fn parse_file(path: &Path, hint: LogFormat) -> Result<EntryStore, ParseError> {
    tracing::info!(file = %path.display(), hint = %hint, "parsing log file");

    let bytes = std::fs::read(path).map_err(|source| ParseError::Io {
        file: path.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8_lossy(&bytes);
    let store = parse_content(&content, hint);

    tracing::info!(file = %path.display(), entries = store.len(), "parsed log file");
    Ok(store)
}

/// Parse a complete input text, one entry per non-blank line.
///
/// Lines are trimmed before parsing. Blank lines produce no entry but
/// still advance the 1-based counter, so `line_number` stays consistent
/// with file position.
pub fn parse_content(content: &str, hint: LogFormat) -> EntryStore {
    tracing::debug!(hint = %hint, "parse started");

    let mut store = EntryStore::new();
    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        store.push(parse_line(line, idx as u64 + 1, hint));
    }

    tracing::debug!(entries = store.len(), "parse complete");
    store
}

/// Chunk-parallel variant of [`parse_content`] for large inputs.
///
/// Lines carry no cross-line state, so the scan parallelises per line;
/// indexed collection restores original input order before the store is
/// exposed to consumers.
pub fn parse_content_parallel(content: &str, hint: LogFormat) -> EntryStore {
    let lines: Vec<&str> = content.lines().collect();
    let entries: Vec<LogEntry> = lines
        .par_iter()
        .enumerate()
        .map(|(idx, raw)| {
            let line = raw.trim();
            if line.is_empty() {
                None
            } else {
                Some(parse_line(line, idx as u64 + 1, hint))
            }
        })
        .collect::<Vec<Option<LogEntry>>>()
        .into_iter()
        .flatten()
        .collect();
    EntryStore::from(entries)
}

// =============================================================================
// Single-line strategies
// =============================================================================

/// Parse one trimmed, non-blank line into exactly one entry.
///
/// Strategy order, each falling through to the next only on failure:
///   1. JSON-first: a `{`-prefixed line that decodes to an object.
///   2. Grammar match per the format hint (see [`format::match_line`]).
///   3. Fallback: the raw line with best-effort level and timestamp.
pub fn parse_line(line: &str, line_number: u64, hint: LogFormat) -> LogEntry {
    if let Some(entry) = json_entry(line, line_number) {
        return entry;
    }
    if let Some(found) = format::match_line(line, hint) {
        return entry_from_match(found, line, line_number);
    }
    fallback_entry(line, line_number)
}

/// JSON strategy: decode a `{`-prefixed line as an object and map the
/// conventional key pairs (timestamp/time, level/severity, message/msg,
/// source/logger). Decode failure falls through silently — a brace-prefixed
/// plain-text line is not an error.
fn json_entry(line: &str, line_number: u64) -> Option<LogEntry> {
    if !line.starts_with('{') {
        return None;
    }
    let map = match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(map)) => map,
        _ => return None,
    };

    let timestamp = str_key(&map, "timestamp")
        .or_else(|| str_key(&map, "time"))
        .and_then(timestamp::normalize);
    let entry_level = str_key(&map, "level")
        .or_else(|| str_key(&map, "severity"))
        .and_then(Level::parse);
    let message = str_key(&map, "message")
        .or_else(|| str_key(&map, "msg"))
        .map(str::to_owned)
        // Neither message key present: the string form of the whole object.
        .unwrap_or_else(|| serde_json::to_string(&map).unwrap_or_else(|_| line.to_string()));
    let source = str_key(&map, "source")
        .or_else(|| str_key(&map, "logger"))
        .map(str::to_owned);

    Some(LogEntry {
        line_number,
        timestamp,
        level: entry_level,
        message,
        source,
        extra: map.into_iter().collect(),
    })
}

fn str_key<'m>(map: &'m serde_json::Map<String, Value>, key: &str) -> Option<&'m str> {
    map.get(key).and_then(Value::as_str)
}

/// Build an entry from a grammar match's named captures.
fn entry_from_match(found: FormatMatch, line: &str, line_number: u64) -> LogEntry {
    let FormatMatch { fields, .. } = found;

    let ts = fields
        .get("timestamp")
        .and_then(|raw| timestamp::normalize(raw));

    // An unrecognisable captured level falls back to content detection,
    // the same as a grammar with no level field at all.
    let entry_level = fields
        .get("level")
        .and_then(|raw| Level::parse(raw))
        .or_else(|| level::detect(line));

    let message = fields
        .get("message")
        .cloned()
        .unwrap_or_else(|| line.to_string());

    // First origin-like capture wins.
    let source = ["service", "module", "host"]
        .iter()
        .find_map(|key| fields.get(*key))
        .cloned();

    LogEntry {
        line_number,
        timestamp: ts,
        level: entry_level,
        message,
        source,
        extra: fields
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect(),
    }
}

/// Fallback strategy: no grammar matched. The entry keeps the whole line
/// as its message, with best-effort level and timestamp extraction.
fn fallback_entry(line: &str, line_number: u64) -> LogEntry {
    tracing::trace!(line_number, "no grammar matched; fallback entry");
    LogEntry {
        line_number,
        timestamp: timestamp::sniff(line),
        level: level::detect(line),
        message: line.to_string(),
        source: None,
        extra: BTreeMap::new(),
    }
}
