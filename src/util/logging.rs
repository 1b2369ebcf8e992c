// LogSift - util/logging.rs
//
// Structured logging setup for host tools embedding the engine.
//
// Activation:
//   - Environment variable: RUST_LOG=debug (or trace)
//   - Debug flag from the host tool's own surface
//   - An explicit level string
//
// Output: stderr. Raw line content is never logged above trace level.

use tracing_subscriber::EnvFilter;

/// Initialise the logging subsystem.
///
/// `debug_flag` is true when the host tool was asked for verbose output.
/// `level` is an optional explicit level string.
///
/// Priority: RUST_LOG env var > `debug_flag` > `level` > default "info".
pub fn init(debug_flag: bool, level: Option<&str>) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        // RUST_LOG takes highest priority (already set)
        EnvFilter::from_default_env()
    } else if debug_flag {
        EnvFilter::new("debug")
    } else if let Some(level) = level {
        EnvFilter::new(level)
    } else {
        EnvFilter::new(super::constants::DEFAULT_LOG_LEVEL)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .init();

    tracing::debug!(
        app = super::constants::APP_NAME,
        version = super::constants::APP_VERSION,
        "logging initialised"
    );
}
