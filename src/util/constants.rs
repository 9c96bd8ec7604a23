// LogMon - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LogMon";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "LogMon";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the configuration file inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "logmon.toml";

// =============================================================================
// Log check defaults and limits
// =============================================================================

/// Number of trailing lines inspected when a log config does not say.
pub const DEFAULT_LINE_COUNT: usize = 200;

/// Smallest accepted line count. A check must inspect at least one line.
pub const MIN_LINE_COUNT: usize = 1;

/// Hard upper bound on the configurable line count.
///
/// Larger values defeat the purpose of a tail read and usually mean a typo
/// in the configuration (an extra zero or two).
pub const MAX_LINE_COUNT: usize = 1_000_000;

// =============================================================================
// Tail read buffer sizes
// =============================================================================

/// Buffer used when only the very last line is requested.
pub const SMALL_TAIL_BUFFER: usize = 64;

/// Buffer used for a handful of lines.
pub const MEDIUM_TAIL_BUFFER: usize = 512;

/// Buffer used for everything else, and for the fixed (non-adaptive) mode.
pub const LARGE_TAIL_BUFFER: usize = 4096;

/// Line counts below this use `SMALL_TAIL_BUFFER`.
pub const SMALL_BUFFER_LINE_THRESHOLD: usize = 2;

/// Line counts below this (and not below the small threshold) use
/// `MEDIUM_TAIL_BUFFER`.
pub const MEDIUM_BUFFER_LINE_THRESHOLD: usize = 10;

/// Hard upper bound on a configured fixed buffer size.
pub const MAX_TAIL_BUFFER: usize = 1024 * 1024; // 1 MiB

// =============================================================================
// Report
// =============================================================================

/// Aggregate status code when no monitored file reported an error.
pub const STATUS_CODE_OK: u16 = 200;

/// Aggregate status code when at least one monitored file reported an error.
pub const STATUS_CODE_ERROR: u16 = 500;

/// `chrono` format string for the `last_modified` field of the report.
pub const LAST_MODIFIED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// Logging
// =============================================================================

/// Default log level when neither RUST_LOG, --debug, nor config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted by the `[logging] level` config key.
pub const VALID_LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

// =============================================================================
// CLI exit codes
// =============================================================================

/// Every monitored file is OK (or not found).
pub const EXIT_OK: i32 = 0;

/// At least one monitored file reported an error.
pub const EXIT_ERRORS_FOUND: i32 = 1;

/// Configuration could not be loaded or is invalid.
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// The report or command output could not be written.
pub const EXIT_OUTPUT_ERROR: i32 = 3;
