// LogMon - platform/config.rs
//
// Platform-specific configuration directory resolution and logmon.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::app::monitor::ScanOptions;
use crate::app::registry::{validate_spec, MonitorSet};
use crate::core::model::LogCheckSpec;
use crate::core::tail::BufferStrategy;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for LogMon configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/logmon/ or %APPDATA%\LogMon\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of logmon.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// logmon.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of logmon.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[logging]` section.
    pub logging: LoggingSection,
    /// `[scan]` section.
    pub scan: ScanSection,
    /// `[[log_configs]]` entries, kept untyped so that one malformed entry
    /// is skipped on its own instead of failing the whole file.
    pub log_configs: Vec<toml::Value>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// `[scan]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ScanSection {
    /// Scan files on a thread pool.
    pub parallel: Option<bool>,
    /// Size the tail read buffer from the line count.
    pub adaptive_buffer: Option<bool>,
    /// Fixed buffer size in bytes when `adaptive_buffer = false`.
    pub buffer_size: Option<usize>,
}

/// Validated application configuration derived from logmon.toml.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Log checks that passed validation, in file order.
    pub monitors: MonitorSet,

    /// How the checks are run.
    pub scan: ScanOptions,

    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

/// Load and validate a config file.
///
/// Returns `AppConfig` with validated values and a list of non-fatal
/// warnings. A missing file yields defaults (no log checks) and no warnings.
/// A file that exists but cannot be read or parsed is an error. Invalid
/// values fall back to defaults and invalid log checks are skipped, each
/// with a warning.
pub fn load_config(config_path: &Path) -> Result<(AppConfig, Vec<String>), ConfigError> {
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config file found; using defaults");
        return Ok((AppConfig::default(), Vec::new()));
    }

    let content = std::fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
        path: config_path.to_path_buf(),
        source: e,
    })?;

    let raw: RawConfig = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: config_path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(path = %config_path.display(), "Loaded config file");

    let (config, warnings) = validate_raw(raw);

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    Ok((config, warnings))
}

/// Turn a parsed config into a validated one, accumulating warnings.
pub fn validate_raw(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let mut config = AppConfig::default();

    // -- Scan: parallel --
    if let Some(parallel) = raw.scan.parallel {
        config.scan.parallel = parallel;
    }

    // -- Scan: buffer --
    let adaptive = raw.scan.adaptive_buffer.unwrap_or(true);
    match (adaptive, raw.scan.buffer_size) {
        (true, Some(size)) => warnings.push(format!(
            "[scan] buffer_size = {size} is ignored while adaptive_buffer = true.",
        )),
        (true, None) => config.scan.buffer = BufferStrategy::Adaptive,
        (false, None) => config.scan.buffer = BufferStrategy::fixed_large(),
        (false, Some(size)) => {
            if (1..=constants::MAX_TAIL_BUFFER).contains(&size) {
                config.scan.buffer = BufferStrategy::Fixed(size);
            } else {
                let problem = ConfigError::ValueOutOfRange {
                    field: "[scan] buffer_size".to_string(),
                    value: size.to_string(),
                    expected: format!("1-{}", constants::MAX_TAIL_BUFFER),
                };
                warnings.push(format!(
                    "{problem}. Using default ({}).",
                    constants::LARGE_TAIL_BUFFER
                ));
                config.scan.buffer = BufferStrategy::fixed_large();
            }
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default ({}).",
                constants::DEFAULT_LOG_LEVEL,
            ));
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    // -- Log checks --
    for (index, value) in raw.log_configs.into_iter().enumerate() {
        let spec: LogCheckSpec = match value.try_into() {
            Ok(spec) => spec,
            Err(e) => {
                let problem = ConfigError::InvalidEntry { index, source: e };
                warnings.push(format!("{problem}. Entry skipped."));
                continue;
            }
        };
        let problems = validate_spec(index, &spec);
        if problems.is_empty() {
            config.monitors.add(spec);
        } else {
            for problem in problems {
                warnings.push(format!("{problem}. Entry skipped."));
            }
        }
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn parse(toml_text: &str) -> (AppConfig, Vec<String>) {
        validate_raw(toml::from_str(toml_text).unwrap())
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(&dir.path().join("logmon.toml")).unwrap();
        assert!(config.monitors.is_empty());
        assert!(warnings.is_empty());
        assert_eq!(config.scan, ScanOptions::default());
    }

    #[test]
    fn test_unparseable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logmon.toml");
        fs::write(&path, "[[log_configs]\npath = ").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::TomlParse { .. })
        ));
    }

    #[test]
    fn test_full_config() {
        let (config, warnings) = parse(
            r#"
            [logging]
            level = "DEBUG"

            [scan]
            parallel = false
            adaptive_buffer = false
            buffer_size = 1024

            [[log_configs]]
            path = "/var/log/app.log"
            search_words = ["exception", "fatal"]
            exclude_words = ["fatal: known issue"]
            line_count = 100

            [[log_configs]]
            path_to_logs = "/var/log/php.log"
            search_words = "PHP Fatal error"
            "#,
        );
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert!(!config.scan.parallel);
        assert_eq!(config.scan.buffer, BufferStrategy::Fixed(1024));
        assert_eq!(config.monitors.len(), 2);
        assert_eq!(config.monitors.specs()[0].line_count, 100);
        assert_eq!(
            config.monitors.specs()[1].line_count,
            constants::DEFAULT_LINE_COUNT
        );
    }

    #[test]
    fn test_invalid_entries_are_skipped_with_warnings() {
        let (config, warnings) = parse(
            r#"
            [[log_configs]]
            path = "/var/log/ok.log"
            search_words = ["error"]

            [[log_configs]]
            path = "/var/log/bad.log"
            search_words = ["error"]
            line_count = 0
            "#,
        );
        assert_eq!(config.monitors.len(), 1);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Log config 2"));
    }

    #[test]
    fn test_malformed_entry_does_not_fail_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logmon.toml");
        fs::write(
            &path,
            r#"
            [[log_configs]]
            path = "/var/log/ok.log"
            search_words = ["error"]

            [[log_configs]]
            path = "/var/log/negative.log"
            search_words = ["error"]
            line_count = -5

            [[log_configs]]
            path = "/var/log/no-words.log"

            [[log_configs]]
            path = "/var/log/also-ok.log"
            search_words = "fatal"
            "#,
        )
        .unwrap();

        let (config, warnings) = load_config(&path).unwrap();
        let labels: Vec<_> = config
            .monitors
            .specs()
            .iter()
            .map(LogCheckSpec::file_label)
            .collect();
        assert_eq!(labels, vec!["ok.log", "also-ok.log"]);
        assert_eq!(warnings.len(), 2, "warnings: {warnings:?}");
        assert!(warnings[0].starts_with("Log config 2:"));
        assert!(warnings[0].ends_with("Entry skipped."));
        assert!(warnings[1].starts_with("Log config 3:"));
        assert!(warnings[1].contains("search_words"));
    }

    #[test]
    fn test_out_of_range_values_fall_back() {
        let (config, warnings) = parse(
            r#"
            [logging]
            level = "loud"

            [scan]
            adaptive_buffer = false
            buffer_size = 0
            "#,
        );
        assert_eq!(warnings.len(), 2);
        assert!(config.log_level.is_none());
        assert_eq!(config.scan.buffer, BufferStrategy::fixed_large());
    }

    #[test]
    fn test_non_adaptive_defaults_to_large_buffer() {
        let (config, warnings) = parse("[scan]\nadaptive_buffer = false\n");
        assert!(warnings.is_empty());
        assert_eq!(config.scan.buffer, BufferStrategy::Fixed(4096));
    }
}
