// LogMon - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation: every variant carries the path or
// field it concerns and, where there is one, the underlying cause.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Top-level error type for all LogMon operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum LogMonError {
    /// Reading the tail of a log file failed.
    Tail(TailError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// Writing the report failed.
    Export(ExportError),

    /// I/O error with context, e.g. writing command output.
    Io {
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for LogMonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tail(e) => write!(f, "Tail error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Io { operation, source } => write!(f, "I/O error during {operation}: {source}"),
        }
    }
}

impl std::error::Error for LogMonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Tail(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Tail errors
// ---------------------------------------------------------------------------

/// Errors raised while reading the trailing lines of a log file.
#[derive(Debug)]
pub enum TailError {
    /// The file does not exist or could not be opened.
    NotFound { path: PathBuf, source: io::Error },

    /// The file was opened but a seek or read failed part-way through.
    Io { path: PathBuf, source: io::Error },
}

impl TailError {
    /// Path of the file the error concerns.
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path, .. } | Self::Io { path, .. } => path,
        }
    }
}

impl fmt::Display for TailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path, source } => {
                write!(f, "Cannot open '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "I/O error reading tail of '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for TailError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<TailError> for LogMonError {
    fn from(e: TailError) -> Self {
        Self::Tail(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading and log config validation.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// A log config entry does not have the expected shape (missing field,
    /// wrong type, negative line count).
    InvalidEntry {
        index: usize,
        source: toml::de::Error,
    },

    /// A required log config field is empty.
    EmptyField { index: usize, field: &'static str },

    /// A log config asks for fewer than one line (or more than the cap).
    InvalidLineCount {
        index: usize,
        value: usize,
        max: usize,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::InvalidEntry { index, source } => write!(
                f,
                "Log config {}: {}",
                index + 1,
                source.message().trim()
            ),
            Self::EmptyField { index, field } => write!(
                f,
                "Log config {}: '{field}' can't be empty",
                index + 1
            ),
            Self::InvalidLineCount { index, value, max } => write!(
                f,
                "Log config {}: line_count = {value} is out of range (1-{max})",
                index + 1
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::InvalidEntry { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for LogMonError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to writing a monitor report.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the report.
    Io { source: io::Error },

    /// CSV serialisation error.
    Csv { source: csv::Error },

    /// JSON serialisation error.
    Json { source: serde_json::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { source } => write!(f, "Report I/O error: {source}"),
            Self::Csv { source } => write!(f, "CSV report error: {source}"),
            Self::Json { source } => write!(f, "JSON report error: {source}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source } => Some(source),
            Self::Csv { source } => Some(source),
            Self::Json { source } => Some(source),
        }
    }
}

impl From<ExportError> for LogMonError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

/// Convenience type alias for LogMon results.
pub type Result<T> = std::result::Result<T, LogMonError>;
