// LogSift - core/level.rs
//
// Content-based severity detection for lines with no usable level field.

use crate::core::model::Level;

/// Infer a severity from line content.
///
/// Scans the case-folded line for the canonical tokens in [`Level::ALL`]
/// order — the first token textually present wins — then falls back to the
/// common abbreviations WARN, ERR, and CRIT/FATAL. No match is `None`, not
/// an error.
pub fn detect(line: &str) -> Option<Level> {
    let upper = line.to_uppercase();

    for level in Level::ALL {
        if upper.contains(level.as_str()) {
            return Some(level);
        }
    }

    // Abbreviations, consulted only when no canonical token is present.
    if upper.contains("WARN") {
        return Some(Level::Warning);
    }
    if upper.contains("ERR") {
        return Some(Level::Error);
    }
    if upper.contains("CRIT") || upper.contains("FATAL") {
        return Some(Level::Critical);
    }

    None
}
