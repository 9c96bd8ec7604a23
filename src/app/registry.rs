// LogMon - app/registry.rs
//
// The ordered collection of configured log checks, with the add/remove
// operations an editing front-end needs and the validation every entry must
// pass before it is saved or scanned.
//
// A single legacy "one path, one word list" configuration is simply a set
// of size one.

use crate::core::model::LogCheckSpec;
use crate::util::constants::{MAX_LINE_COUNT, MIN_LINE_COUNT};
use crate::util::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorSet {
    specs: Vec<LogCheckSpec>,
}

impl MonitorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_specs(specs: Vec<LogCheckSpec>) -> Self {
        Self { specs }
    }

    /// Append a spec at the end. Returns its index.
    pub fn add(&mut self, spec: LogCheckSpec) -> usize {
        tracing::debug!(file = %spec.path.display(), "Log config added");
        self.specs.push(spec);
        self.specs.len() - 1
    }

    /// Remove the spec at `index`, shifting later specs up.
    /// Returns `None` if the index is out of range.
    pub fn remove(&mut self, index: usize) -> Option<LogCheckSpec> {
        if index >= self.specs.len() {
            return None;
        }
        let removed = self.specs.remove(index);
        tracing::debug!(file = %removed.path.display(), index, "Log config removed");
        Some(removed)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogCheckSpec> {
        self.specs.iter()
    }

    pub fn specs(&self) -> &[LogCheckSpec] {
        &self.specs
    }

    /// Validate every entry, collecting all problems rather than stopping at
    /// the first.
    pub fn validate(&self) -> Vec<ConfigError> {
        self.specs
            .iter()
            .enumerate()
            .flat_map(|(index, spec)| validate_spec(index, spec))
            .collect()
    }
}

/// Check one entry. `index` is only used to label the errors.
///
/// Every field except the exclude phrases must be filled in, and the line
/// count must be at least one.
pub fn validate_spec(index: usize, spec: &LogCheckSpec) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if spec.path.as_os_str().to_string_lossy().trim().is_empty() {
        errors.push(ConfigError::EmptyField {
            index,
            field: "path",
        });
    }

    if spec.search_words.iter().all(|w| w.trim().is_empty()) {
        errors.push(ConfigError::EmptyField {
            index,
            field: "search_words",
        });
    }

    if !(MIN_LINE_COUNT..=MAX_LINE_COUNT).contains(&spec.line_count) {
        errors.push(ConfigError::InvalidLineCount {
            index,
            value: spec.line_count,
            max: MAX_LINE_COUNT,
        });
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(path: &str) -> LogCheckSpec {
        LogCheckSpec::new(path, ["error"])
    }

    #[test]
    fn test_add_and_remove_keep_order() {
        let mut set = MonitorSet::new();
        assert_eq!(set.add(spec("/a.log")), 0);
        assert_eq!(set.add(spec("/b.log")), 1);
        assert_eq!(set.add(spec("/c.log")), 2);

        let removed = set.remove(1).unwrap();
        assert_eq!(removed.file_label(), "b.log");

        let labels: Vec<_> = set.iter().map(LogCheckSpec::file_label).collect();
        assert_eq!(labels, vec!["a.log", "c.log"]);
        assert!(set.remove(5).is_none());
    }

    #[test]
    fn test_valid_set_has_no_errors() {
        let set = MonitorSet::from_specs(vec![
            spec("/a.log"),
            spec("/b.log").with_exclude_words(Vec::<String>::new()),
        ]);
        assert!(set.validate().is_empty());
    }

    #[test]
    fn test_validation_collects_every_problem() {
        let bad = LogCheckSpec::new("", ["  "]).with_line_count(0);
        let set = MonitorSet::from_specs(vec![spec("/ok.log"), bad]);
        let errors = set.validate();
        assert_eq!(errors.len(), 3);
        assert!(errors
            .iter()
            .all(|e| e.to_string().starts_with("Log config 2:")));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidLineCount { value: 0, .. })));
    }

    #[test]
    fn test_line_count_upper_bound() {
        let errors = validate_spec(0, &spec("/a.log").with_line_count(MAX_LINE_COUNT + 1));
        assert_eq!(errors.len(), 1);
        assert!(validate_spec(0, &spec("/a.log").with_line_count(MAX_LINE_COUNT)).is_empty());
    }
}
