// LogSift - util/constants.rs
//
// Single source of truth for named limits and defaults.

// =============================================================================
// Crate metadata
// =============================================================================

/// Crate display name, used in logging output.
pub const APP_NAME: &str = "LogSift";

/// Crate version as compiled.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Statistics limits
// =============================================================================

/// Number of top error messages reported by the statistics engine.
pub const TOP_ERRORS_LIMIT: usize = 10;

/// Number of top sources reported by the statistics engine.
pub const TOP_SOURCES_LIMIT: usize = 10;

/// Character length of the error-message preview used as the ranking key.
pub const ERROR_PREVIEW_CHARS: usize = 100;

/// Default timeline bucket width in minutes.
pub const DEFAULT_TIMELINE_INTERVAL_MINUTES: u32 = 60;

// =============================================================================
// Filter limits
// =============================================================================

/// Maximum user-supplied filter pattern length, guarding against ReDoS.
pub const MAX_PATTERN_LENGTH: usize = 4_096;

// =============================================================================
// Logging
// =============================================================================

/// Default log level for the tracing subscriber.
pub const DEFAULT_LOG_LEVEL: &str = "info";
