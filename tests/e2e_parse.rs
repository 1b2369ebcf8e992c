// LogSift - tests/e2e_parse.rs
//
// End-to-end tests for the parse -> filter -> statistics pipeline.
//
// These tests exercise real files on disk, real chrono timestamp parsing,
// and real regex grammar matching — no mocks, no stubs. This is the full
// path from a raw log file to structured entries, filtered views, and an
// aggregate report.

use logsift::core::filter;
use logsift::core::format::LogFormat;
use logsift::core::model::Level;
use logsift::core::parser::{parse_content, parse_file};
use logsift::core::stats;
use logsift::util::error::ParseError;
use std::fs;
use std::path::PathBuf;

// =============================================================================
// Helpers
// =============================================================================

/// Write `content` to a fresh file inside a temp dir, returning both so
/// the dir outlives the path.
fn temp_log(content: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("app.log");
    fs::write(&path, content).expect("write temp log");
    (dir, path)
}

/// A synthetic application log: 100 non-blank lines in python format with
/// 10 ERROR, 5 CRITICAL, and 85 INFO entries.
fn synthetic_app_log() -> String {
    let mut content = String::new();
    for n in 0..100 {
        let level = match n {
            0..=9 => "ERROR",
            10..=14 => "CRITICAL",
            _ => "INFO",
        };
        let minute = n / 2;
        content.push_str(&format!(
            "2024-01-01 12:{minute:02}:00,000 - worker - {level} - event {n}\n"
        ));
    }
    content
}

// =============================================================================
// File-level parsing
// =============================================================================

/// Every non-blank line yields exactly one entry; blank lines are skipped
/// without breaking the 1-based line numbering.
#[test]
fn e2e_totality_and_line_numbering() {
    let content = "\
Jan 15 12:00:00 web01 sshd[4242]: session opened

127.0.0.1 - - [15/Jan/2024:12:00:01 +0000] \"GET / HTTP/1.1\" 200 512
{\"time\":\"2024-01-15T12:00:02Z\",\"level\":\"INFO\",\"msg\":\"healthy\"}

completely free-form line
";
    let (_dir, path) = temp_log(content);
    let store = parse_file(&path, LogFormat::Auto).expect("parse temp file");

    assert_eq!(store.len(), 4, "four non-blank lines, four entries");
    let numbers: Vec<u64> = store.iter().map(|e| e.line_number).collect();
    assert_eq!(numbers, vec![1, 3, 4, 6], "blank lines advance the counter");
}

/// A missing file is the one fatal error the engine surfaces.
#[test]
fn e2e_missing_file_returns_io_error() {
    let result = parse_file(
        &PathBuf::from("/nonexistent/logsift-e2e-test-path/app.log"),
        LogFormat::Auto,
    );
    assert!(
        matches!(result, Err(ParseError::Io { .. })),
        "expected ParseError::Io, got {result:?}"
    );
}

/// Parsing the same file twice with the same hint is byte-identical.
#[test]
fn e2e_parse_is_deterministic_across_runs() {
    let (_dir, path) = temp_log(&synthetic_app_log());

    let first = parse_file(&path, LogFormat::Auto).expect("first parse");
    let second = parse_file(&path, LogFormat::Auto).expect("second parse");

    let a = serde_json::to_string(first.entries()).expect("serialise first");
    let b = serde_json::to_string(second.entries()).expect("serialise second");
    assert_eq!(a, b);
}

// =============================================================================
// Format examples
// =============================================================================

/// The python-format reference line maps every structured field.
#[test]
fn e2e_python_format_reference_line() {
    let store = parse_content(
        "2024-01-01 12:00:00,123 - db - ERROR - connection refused",
        LogFormat::Python,
    );

    assert_eq!(store.len(), 1);
    let entry = &store.entries()[0];
    assert_eq!(entry.level, Some(Level::Error));
    assert_eq!(entry.message, "connection refused");
    assert_eq!(entry.source.as_deref(), Some("db"));
    let ts = entry.timestamp.expect("timestamp should parse");
    assert_eq!(
        ts.format("%Y-%m-%dT%H:%M:%S%.3f").to_string(),
        "2024-01-01T12:00:00.123"
    );
}

/// The JSON reference line maps the conventional key aliases.
#[test]
fn e2e_json_reference_line() {
    let store = parse_content(
        r#"{"time":"2024-01-01T00:00:00Z","level":"INFO","msg":"started"}"#,
        LogFormat::Auto,
    );

    let entry = &store.entries()[0];
    assert_eq!(entry.level, Some(Level::Info));
    assert_eq!(entry.message, "started");
    let ts = entry.timestamp.expect("timestamp should parse");
    assert_eq!(
        ts.format("%Y-%m-%dT%H:%M:%S").to_string(),
        "2024-01-01T00:00:00"
    );
}

/// A `{`-prefixed line that is not valid JSON and matches no grammar
/// becomes a fallback entry carrying the line verbatim.
#[test]
fn e2e_malformed_json_falls_back_verbatim() {
    let line = r#"{"level":"INFO", unterminated"#;
    let store = parse_content(line, LogFormat::Auto);

    let entry = &store.entries()[0];
    assert_eq!(entry.message, line);
    assert!(entry.extra.is_empty(), "no captures on a fallback entry");
}

/// WARN alias normalisation, end to end.
#[test]
fn e2e_warn_alias_normalises() {
    let store = parse_content("WARN: disk space low", LogFormat::Auto);
    assert_eq!(store.entries()[0].level, Some(Level::Warning));
}

// =============================================================================
// Filtering
// =============================================================================

/// Level filtering keeps exactly the requested severities, in original
/// relative order.
#[test]
fn e2e_level_filter_on_synthetic_log() {
    let store = parse_content(&synthetic_app_log(), LogFormat::Auto);
    assert_eq!(store.len(), 100);

    let kept = filter::by_level(store.entries(), &[Level::Error, Level::Critical]);
    assert_eq!(kept.len(), 15, "10 ERROR + 5 CRITICAL");

    let numbers: Vec<u64> = kept.iter().map(|e| e.line_number).collect();
    let expected: Vec<u64> = (1..=15).collect();
    assert_eq!(numbers, expected, "errors occupy the first fifteen lines");
}

/// Time-range and pattern filters compose over parsed output.
#[test]
fn e2e_time_and_pattern_filters() {
    let store = parse_content(&synthetic_app_log(), LogFormat::Auto);

    let half_past = chrono::DateTime::parse_from_rfc3339("2024-01-01T12:25:00Z")
        .expect("bound parses")
        .with_timezone(&chrono::Utc);
    let late = filter::by_time_range(store.entries(), Some(half_past), None);
    assert!(late.iter().all(|e| e.timestamp.is_some_and(|ts| ts >= half_past)));
    assert_eq!(late.len(), 50, "minutes 25..=49 hold two entries each");

    let nines = filter::by_pattern(store.entries(), r"event \d9$", false).expect("valid pattern");
    assert_eq!(nines.len(), 9, "event 19, 29, ... 99");
}

// =============================================================================
// Statistics
// =============================================================================

/// The report satisfies the closure properties: the level histogram sums
/// to the levelled entry count, and top_errors is capped and sorted.
#[test]
fn e2e_statistics_closure() {
    let mut content = synthetic_app_log();
    content.push_str("free-form line with no level\n");
    let store = parse_content(&content, LogFormat::Auto);

    let report = stats::collect(store.entries());
    assert_eq!(report.total, 101);

    let levelled: u64 = report.levels.values().sum();
    assert_eq!(levelled, 100, "only the python lines carry a level");
    assert_eq!(report.levels.get(&Level::Error), Some(&10));
    assert_eq!(report.levels.get(&Level::Critical), Some(&5));
    assert_eq!(report.levels.get(&Level::Info), Some(&85));

    assert!(report.top_errors.len() <= 10);
    let counts: Vec<u64> = report.top_errors.iter().map(|(_, c)| *c).collect();
    let mut sorted = counts.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(counts, sorted, "top_errors sorted by descending frequency");

    assert_eq!(report.sources.first().map(|(s, _)| s.as_str()), Some("worker"));
    assert_eq!(report.time_span_seconds, Some(49.0 * 60.0));
}

/// Timeline bucketing over the synthetic log: 50 minutes of entries in
/// 10-minute buckets.
#[test]
fn e2e_timeline_buckets() {
    let store = parse_content(&synthetic_app_log(), LogFormat::Auto);
    let buckets = stats::timeline(store.entries(), 10);

    assert_eq!(buckets.len(), 5, "minutes 0..=49 span five 10-minute buckets");
    let total: u64 = buckets.values().sum();
    assert_eq!(total, 100, "every stamped entry lands in a bucket");
    // BTreeMap keys iterate ascending.
    let starts: Vec<String> = buckets
        .keys()
        .map(|ts| ts.format("%H:%M").to_string())
        .collect();
    assert_eq!(starts, vec!["12:00", "12:10", "12:20", "12:30", "12:40"]);
}
