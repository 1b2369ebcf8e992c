// LogSift - core/format.rs
//
// The fixed, ordered catalog of known log grammars.
// Registration order is the tie-break authority for auto-detection:
// nginx and apache share an identical line grammar and differ only by
// name, so the earliest-registered descriptor must win deterministically.
// The catalog is an explicit Vec rather than a map precisely so that
// order never depends on a container's iteration guarantees.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

// =============================================================================
// Format tags
// =============================================================================

/// Supported log formats, as selectable by the caller's format hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Nginx,
    Apache,
    Json,
    Syslog,
    Python,
    Docker,
    Auto,
}

impl LogFormat {
    /// Parse a caller-supplied hint string, case-insensitively.
    pub fn parse(raw: &str) -> Option<LogFormat> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "nginx" => Some(LogFormat::Nginx),
            "apache" => Some(LogFormat::Apache),
            "json" => Some(LogFormat::Json),
            "syslog" => Some(LogFormat::Syslog),
            "python" => Some(LogFormat::Python),
            "docker" => Some(LogFormat::Docker),
            "auto" => Some(LogFormat::Auto),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Nginx => "nginx",
            LogFormat::Apache => "apache",
            LogFormat::Json => "json",
            LogFormat::Syslog => "syslog",
            LogFormat::Python => "python",
            LogFormat::Docker => "docker",
            LogFormat::Auto => "auto",
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Descriptors
// =============================================================================

/// One recognised grammar: a stable format tag plus the anchored pattern
/// that either fails or yields named field captures.
#[derive(Debug)]
pub struct FormatDescriptor {
    pub format: LogFormat,
    pattern: Regex,
}

impl FormatDescriptor {
    fn new(format: LogFormat, pattern: &str) -> Self {
        // Patterns are fixed at compile time and exercised by the tests
        // below, so a mistake shows up as a failing test rather than a
        // runtime panic.
        Self {
            format,
            pattern: Regex::new(pattern).expect("format registry: invalid pattern"),
        }
    }

    /// Apply this descriptor's matcher to a line. Side-effect-free;
    /// returns the named captures on a match, `None` otherwise.
    pub fn try_match(&self, line: &str) -> Option<FormatMatch> {
        let caps = self.pattern.captures(line)?;
        let mut fields = BTreeMap::new();
        for name in self.pattern.capture_names().flatten() {
            if let Some(m) = caps.name(name) {
                fields.insert(name.to_string(), m.as_str().to_string());
            }
        }
        Some(FormatMatch {
            format: self.format,
            fields,
        })
    }
}

/// A successful grammar match: which descriptor matched and its captures.
#[derive(Debug)]
pub struct FormatMatch {
    pub format: LogFormat,
    pub fields: BTreeMap<String, String>,
}

// =============================================================================
// Registry
// =============================================================================

/// The ordered descriptor catalog, built once on first use.
pub fn registry() -> &'static [FormatDescriptor] {
    static REGISTRY: OnceLock<Vec<FormatDescriptor>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        vec![
            // 127.0.0.1 - - [01/Jan/2024:12:00:00 +0000] "GET / HTTP/1.1" 200 1234
            FormatDescriptor::new(
                LogFormat::Nginx,
                r#"^(?P<ip>[\d.]+) - - \[(?P<timestamp>[^\]]+)\] "(?P<method>\w+) (?P<path>[^ ]+) HTTP/[\d.]+" (?P<status>\d+) (?P<size>\d+)"#,
            ),
            // Identical grammar to nginx; kept as a distinct entry so an
            // explicit hint reports the format the caller asked for, and
            // auto-detection resolves the ambiguity to nginx by order.
            FormatDescriptor::new(
                LogFormat::Apache,
                r#"^(?P<ip>[\d.]+) - - \[(?P<timestamp>[^\]]+)\] "(?P<method>\w+) (?P<path>[^ ]+) HTTP/[\d.]+" (?P<status>\d+) (?P<size>\d+)"#,
            ),
            // Jan 15 12:00:00 hostname service[1234]: message
            FormatDescriptor::new(
                LogFormat::Syslog,
                r"^(?P<timestamp>\w+ \d+ \d+:\d+:\d+) (?P<host>\S+) (?P<service>\w+)(?:\[(?P<pid>\d+)\])?: (?P<message>.*)",
            ),
            // 2024-01-01 12:00:00,123 - module - LEVEL - message
            FormatDescriptor::new(
                LogFormat::Python,
                r"^(?P<timestamp>\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2},\d{3}) - (?P<module>\S+) - (?P<level>\w+) - (?P<message>.*)",
            ),
            // 2024-01-01T12:00:00.123456789Z [level] message
            FormatDescriptor::new(
                LogFormat::Docker,
                r"^(?P<timestamp>\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d+Z) \[(?P<level>\w+)\] (?P<message>.*)",
            ),
        ]
    })
}

/// Match a line against the catalog.
///
/// An explicit hint applies only that descriptor's matcher; `Auto` walks
/// the catalog in registration order and the first success wins. `Json`
/// names no grammar here — JSON lines are decoded upstream by the parser —
/// so it never matches, and neither does `Auto` as a descriptor name.
pub fn match_line(line: &str, hint: LogFormat) -> Option<FormatMatch> {
    match hint {
        LogFormat::Auto => registry().iter().find_map(|d| d.try_match(line)),
        LogFormat::Json => None,
        explicit => registry()
            .iter()
            .find(|d| d.format == explicit)
            .and_then(|d| d.try_match(line)),
    }
}
