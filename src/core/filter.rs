// LogSift - core/filter.rs
//
// Pure read-only queries over parsed entries. Every operation returns a
// new sequence preserving relative order and line numbers; entries lacking
// the filtered-on attribute are excluded, never included by default.

use crate::core::model::{Level, LogEntry};
use crate::util::constants;
use crate::util::error::FilterError;
use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;

// =============================================================================
// Standalone operations
// =============================================================================

/// Keep entries whose level is present and equal to one of `levels`.
pub fn by_level(entries: &[LogEntry], levels: &[Level]) -> Vec<LogEntry> {
    let wanted: HashSet<Level> = levels.iter().copied().collect();
    entries
        .iter()
        .filter(|e| e.level.is_some_and(|l| wanted.contains(&l)))
        .cloned()
        .collect()
}

/// Keep entries whose timestamp falls inside the inclusive bounds.
///
/// Bounds are optional and apply independently; when either bound is set,
/// entries without a timestamp are excluded.
pub fn by_time_range(
    entries: &[LogEntry],
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
) -> Vec<LogEntry> {
    entries
        .iter()
        .filter(|e| match e.timestamp {
            Some(ts) => {
                since.map_or(true, |bound| ts >= bound) && until.map_or(true, |bound| ts <= bound)
            }
            None => since.is_none() && until.is_none(),
        })
        .cloned()
        .collect()
}

/// Keep entries whose message matches `pattern`.
///
/// Case sensitivity is the caller's choice; the engine's default posture
/// is case-insensitive. An invalid or oversized pattern is a
/// [`FilterError`].
pub fn by_pattern(
    entries: &[LogEntry],
    pattern: &str,
    case_sensitive: bool,
) -> Result<Vec<LogEntry>, FilterError> {
    let regex = compile_pattern(pattern, case_sensitive)?;
    Ok(entries
        .iter()
        .filter(|e| regex.is_match(&e.message))
        .cloned()
        .collect())
}

/// Compile a user-supplied pattern with a length guard.
fn compile_pattern(pattern: &str, case_sensitive: bool) -> Result<Regex, FilterError> {
    if pattern.len() > constants::MAX_PATTERN_LENGTH {
        return Err(FilterError::PatternTooLong {
            length: pattern.len(),
            max_length: constants::MAX_PATTERN_LENGTH,
        });
    }
    RegexBuilder::new(pattern)
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|source| FilterError::InvalidRegex {
            pattern: pattern.to_string(),
            source,
        })
}

// =============================================================================
// Composable filter
// =============================================================================

/// Composable filter state. Active criteria are AND-combined by `apply`.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    /// Levels to include (empty = no level criterion).
    pub levels: HashSet<Level>,

    /// Inclusive lower time bound.
    pub since: Option<DateTime<Utc>>,

    /// Inclusive upper time bound.
    pub until: Option<DateTime<Utc>>,

    /// Compiled message pattern, set via [`Filter::set_pattern`].
    pattern: Option<Regex>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The triage preset: errors and worse.
    pub fn errors_only() -> Self {
        Self {
            levels: [Level::Error, Level::Critical, Level::Fatal]
                .into_iter()
                .collect(),
            ..Self::default()
        }
    }

    /// Set the message pattern, compiling it; an empty string clears it.
    pub fn set_pattern(&mut self, pattern: &str, case_sensitive: bool) -> Result<(), FilterError> {
        if pattern.is_empty() {
            self.pattern = None;
            return Ok(());
        }
        self.pattern = Some(compile_pattern(pattern, case_sensitive)?);
        Ok(())
    }

    /// True when no criterion is active.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
            && self.since.is_none()
            && self.until.is_none()
            && self.pattern.is_none()
    }

    /// Check one entry against every active criterion.
    pub fn matches(&self, entry: &LogEntry) -> bool {
        if !self.levels.is_empty() && !entry.level.is_some_and(|l| self.levels.contains(&l)) {
            return false;
        }

        if self.since.is_some() || self.until.is_some() {
            match entry.timestamp {
                Some(ts) => {
                    if self.since.is_some_and(|bound| ts < bound) {
                        return false;
                    }
                    if self.until.is_some_and(|bound| ts > bound) {
                        return false;
                    }
                }
                // Entries without timestamps are excluded from time filters.
                None => return false,
            }
        }

        if let Some(ref regex) = self.pattern {
            if !regex.is_match(&entry.message) {
                return false;
            }
        }

        true
    }

    /// Apply to a slice, preserving relative order and line numbers.
    pub fn apply(&self, entries: &[LogEntry]) -> Vec<LogEntry> {
        if self.is_empty() {
            return entries.to_vec();
        }
        entries.iter().filter(|e| self.matches(e)).cloned().collect()
    }
}
