// LogMon - core/model.rs
//
// Core data model types. Pure data definitions with no I/O.
//
// These types are the shared vocabulary across all layers: a log config
// comes in from the configuration file, a scan outcome is produced per
// config, and the outcomes are folded into one report.

use crate::util::constants::{
    DEFAULT_LINE_COUNT, LAST_MODIFIED_FORMAT, STATUS_CODE_ERROR, STATUS_CODE_OK,
};
use chrono::{DateTime, Local};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

// =============================================================================
// Log check configuration
// =============================================================================

/// One monitored log file: where it is, which phrases indicate an error,
/// which phrases suppress a line, and how many trailing lines to inspect.
///
/// Immutable for the duration of a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogCheckSpec {
    /// Path to the log file, with surrounding whitespace removed.
    #[serde(alias = "path_to_logs", deserialize_with = "deserialize_path")]
    pub path: PathBuf,

    /// Phrases whose presence marks the file as erroneous.
    #[serde(deserialize_with = "deserialize_phrases")]
    pub search_words: Vec<String>,

    /// Phrases whose presence on a line removes that line from the search.
    #[serde(default, deserialize_with = "deserialize_phrases")]
    pub exclude_words: Vec<String>,

    /// Number of trailing lines to search.
    #[serde(alias = "lines_count", default = "default_line_count")]
    pub line_count: usize,
}

fn default_line_count() -> usize {
    DEFAULT_LINE_COUNT
}

impl LogCheckSpec {
    /// Create a spec with no exclude phrases and the default line count.
    pub fn new<I, S>(path: impl Into<PathBuf>, search_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: trim_path(path.into()),
            search_words: search_words.into_iter().map(Into::into).collect(),
            exclude_words: Vec::new(),
            line_count: DEFAULT_LINE_COUNT,
        }
    }

    pub fn with_exclude_words<I, S>(mut self, exclude_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_words = exclude_words.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_line_count(mut self, line_count: usize) -> Self {
        self.line_count = line_count;
        self
    }

    /// The file's base name, used as its key in the report.
    pub fn file_label(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Strip leading and trailing whitespace from a path pasted into a config.
/// Paths that are not valid UTF-8 are returned unchanged.
pub fn trim_path(path: PathBuf) -> PathBuf {
    match path.to_str() {
        Some(s) if s.trim().len() != s.len() => PathBuf::from(s.trim()),
        _ => path,
    }
}

fn deserialize_path<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
where
    D: Deserializer<'de>,
{
    PathBuf::deserialize(deserializer).map(trim_path)
}

/// Split a newline-separated block of phrases into one phrase per line,
/// trimming each. Empty lines are kept out.
pub fn split_phrases(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Phrases may be written as a TOML array or as one newline-separated string.
fn deserialize_phrases<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Phrases {
        List(Vec<String>),
        Text(String),
    }

    Ok(match Phrases::deserialize(deserializer)? {
        Phrases::List(list) => list
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect(),
        Phrases::Text(text) => split_phrases(&text),
    })
}

// =============================================================================
// Scan results
// =============================================================================

/// Health of one monitored file after a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileStatus {
    /// The tail contains no (non-excluded) error phrase.
    #[serde(rename = "OK")]
    Ok,
    /// The tail contains at least one error phrase.
    #[serde(rename = "NOK")]
    Nok,
    /// The file does not exist or could not be read.
    #[serde(rename = "Not found.")]
    NotFound,
}

impl FileStatus {
    /// Human-readable label, identical to the serialised form.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Nok => "NOK",
            Self::NotFound => "Not found.",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of scanning one `LogCheckSpec`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutcome {
    /// Base name of the scanned file.
    pub file_label: String,

    pub status: FileStatus,

    /// Modification time at scan time. `None` when the file was not found.
    pub last_modified: Option<DateTime<Local>>,

    /// The search phrase that triggered `Nok`. Diagnostic only, never
    /// written to the report.
    pub matched_phrase: Option<String>,
}

impl ScanOutcome {
    pub fn not_found(file_label: String) -> Self {
        Self {
            file_label,
            status: FileStatus::NotFound,
            last_modified: None,
            matched_phrase: None,
        }
    }

    /// `last_modified` formatted as `YYYY-MM-DD HH:MM:SS`.
    pub fn last_modified_display(&self) -> Option<String> {
        self.last_modified
            .map(|t| t.format(LAST_MODIFIED_FORMAT).to_string())
    }
}

// =============================================================================
// Report
// =============================================================================

/// Per-file entry as it appears in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

/// Aggregated result of one monitor run.
///
/// Serialises as a JSON object keyed by file base name, in the order each
/// label first appeared. The status code is not part of the body.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorReport {
    entries: Vec<(String, FileReport)>,
    status_code: u16,
}

impl MonitorReport {
    /// Fold outcomes into a report.
    ///
    /// A label seen twice keeps its first position and takes the later
    /// outcome. The status code is 500 if any outcome was `Nok`, even one
    /// whose entry was later replaced; "Not found." never raises it.
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = ScanOutcome>,
    {
        let mut entries: Vec<(String, FileReport)> = Vec::new();
        let mut any_error = false;

        for outcome in outcomes {
            any_error |= outcome.status == FileStatus::Nok;
            let report = FileReport {
                status: outcome.status,
                last_modified: outcome.last_modified_display(),
            };
            match entries.iter_mut().find(|(label, _)| *label == outcome.file_label) {
                Some((_, existing)) => *existing = report,
                None => entries.push((outcome.file_label, report)),
            }
        }

        let status_code = if any_error {
            STATUS_CODE_ERROR
        } else {
            STATUS_CODE_OK
        };

        Self {
            entries,
            status_code,
        }
    }

    /// 500 if any file reported an error, 200 otherwise.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn has_errors(&self) -> bool {
        self.status_code == STATUS_CODE_ERROR
    }

    pub fn entries(&self) -> &[(String, FileReport)] {
        &self.entries
    }

    pub fn get(&self, label: &str) -> Option<&FileReport> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, r)| r)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for MonitorReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, report) in &self.entries {
            map.serialize_entry(label, report)?;
        }
        map.end()
    }
}
