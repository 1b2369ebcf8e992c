// LogSift - core/stats.rs
//
// Aggregate statistics over a parse session: level histogram, time span,
// top error messages, source ranking, and a bucketed timeline. Read-only
// over the entry slice, like the filter engine.

use crate::core::model::{Level, LogEntry};
use crate::util::constants;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

/// The aggregate report for one entry-store snapshot.
///
/// Serialises to the statistics report contract: timestamps as ISO 8601,
/// levels keyed by canonical token, `top_errors` as (message, count) pairs.
#[derive(Debug, Serialize)]
pub struct Statistics {
    /// Entry count, including entries with no level or timestamp.
    pub total: usize,

    /// Level -> count, over entries with a present level.
    pub levels: BTreeMap<Level, u64>,

    /// Earliest timestamp among stamped entries.
    pub first_timestamp: Option<DateTime<Utc>>,

    /// Latest timestamp among stamped entries.
    pub last_timestamp: Option<DateTime<Utc>>,

    /// Seconds between first and last timestamp; absent when no entry
    /// carries a timestamp.
    pub time_span_seconds: Option<f64>,

    /// Error-or-worse messages (100-character preview) ranked by frequency
    /// descending, ties broken by first appearance, capped at ten.
    pub top_errors: Vec<(String, u64)>,

    /// Source -> count, top ten by frequency, serialised in ranked order.
    #[serde(serialize_with = "pairs_as_map")]
    pub sources: Vec<(String, u64)>,
}

/// Build the aggregate report.
pub fn collect(entries: &[LogEntry]) -> Statistics {
    let mut levels: BTreeMap<Level, u64> = BTreeMap::new();
    for level in entries.iter().filter_map(|e| e.level) {
        *levels.entry(level).or_insert(0) += 1;
    }

    let mut first_timestamp = None;
    let mut last_timestamp = None;
    for ts in entries.iter().filter_map(|e| e.timestamp) {
        if first_timestamp.map_or(true, |first| ts < first) {
            first_timestamp = Some(ts);
        }
        if last_timestamp.map_or(true, |last| ts > last) {
            last_timestamp = Some(ts);
        }
    }
    let time_span_seconds = match (first_timestamp, last_timestamp) {
        (Some(first), Some(last)) => Some((last - first).num_milliseconds() as f64 / 1000.0),
        _ => None,
    };

    let top_errors = ranked_counts(
        entries
            .iter()
            .filter(|e| {
                matches!(
                    e.level,
                    Some(Level::Error | Level::Critical | Level::Fatal)
                )
            })
            .map(|e| preview(&e.message).to_string()),
        constants::TOP_ERRORS_LIMIT,
    );

    let sources = ranked_counts(
        entries.iter().filter_map(|e| e.source.clone()),
        constants::TOP_SOURCES_LIMIT,
    );

    Statistics {
        total: entries.len(),
        levels,
        first_timestamp,
        last_timestamp,
        time_span_seconds,
        top_errors,
        sources,
    }
}

/// Bucket stamped entries into fixed `interval_minutes` windows.
///
/// Each timestamp's minutes-since-epoch is floored to the interval
/// boundary; the result maps bucket start to entry count, ascending.
/// Callers wanting the conventional hourly view pass
/// [`constants::DEFAULT_TIMELINE_INTERVAL_MINUTES`]. A zero interval is
/// clamped to one minute.
pub fn timeline(entries: &[LogEntry], interval_minutes: u32) -> BTreeMap<DateTime<Utc>, u64> {
    if interval_minutes == 0 {
        tracing::warn!("timeline interval of 0 minutes clamped to 1");
    }
    let interval = i64::from(interval_minutes.max(1));

    let mut buckets: BTreeMap<DateTime<Utc>, u64> = BTreeMap::new();
    for ts in entries.iter().filter_map(|e| e.timestamp) {
        let minutes = ts.timestamp().div_euclid(60);
        let bucket_start_secs = minutes.div_euclid(interval) * interval * 60;
        if let Some(start) = DateTime::from_timestamp(bucket_start_secs, 0) {
            *buckets.entry(start).or_insert(0) += 1;
        }
    }
    buckets
}

/// Frequency-rank an iterator of keys: descending count, ties in
/// first-seen order, truncated to `limit`.
fn ranked_counts<I: Iterator<Item = String>>(keys: I, limit: usize) -> Vec<(String, u64)> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for key in keys {
        match counts.get_mut(&key) {
            Some(count) => *count += 1,
            None => {
                counts.insert(key.clone(), 1);
                order.push(key);
            }
        }
    }

    let mut ranked: Vec<(String, u64)> = order
        .into_iter()
        .map(|key| {
            let count = counts.get(&key).copied().unwrap_or(0);
            (key, count)
        })
        .collect();
    // Stable sort keeps first-seen order for equal counts.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

/// First `ERROR_PREVIEW_CHARS` characters of a message, on a character
/// boundary.
fn preview(message: &str) -> &str {
    match message.char_indices().nth(constants::ERROR_PREVIEW_CHARS) {
        Some((idx, _)) => &message[..idx],
        None => message,
    }
}

fn pairs_as_map<S: Serializer>(pairs: &[(String, u64)], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(pairs.iter().map(|(key, count)| (key.as_str(), count)))
}
