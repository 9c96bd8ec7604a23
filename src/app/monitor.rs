// LogMon - app/monitor.rs
//
// Per-file orchestration: tail read → phrase match → outcome, then the
// fold of all outcomes into one report.
//
// Failure isolation:
//   - A file that cannot be opened, or fails mid-read, becomes "Not found."
//     with a warning; the remaining files are still scanned.
//   - A metadata failure after a successful read only drops last_modified.
//   - Nothing here returns an error; the worst result is a "Not found." entry.
//
// Specs share no state, so parallel mode hands them to the rayon pool and
// collects the outcomes back in configured order.

use crate::core::matcher::{self, PhraseSet};
use crate::core::model::{FileStatus, LogCheckSpec, MonitorReport, ScanOutcome};
use crate::core::tail::{self, BufferStrategy};
use chrono::{DateTime, Local};
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;

/// Knobs for one monitor run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Read buffer sizing for the tail reader.
    pub buffer: BufferStrategy,
    /// Scan specs on the rayon thread pool instead of one after another.
    pub parallel: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            buffer: BufferStrategy::Adaptive,
            parallel: true,
        }
    }
}

/// Scan a single log file. Never fails.
pub fn scan_spec(spec: &LogCheckSpec, options: &ScanOptions) -> ScanOutcome {
    let file_label = spec.file_label();

    let tail = match tail::tail_file(&spec.path, spec.line_count, options.buffer) {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(
                file = %e.path().display(),
                error = %e,
                "Log file not accessible"
            );
            return ScanOutcome::not_found(file_label);
        }
    };

    let search = PhraseSet::new(&spec.search_words);
    let exclude = PhraseSet::new(&spec.exclude_words);
    let matched_phrase = matcher::first_match_in(&tail, &search, &exclude).map(str::to_string);

    let status = if matched_phrase.is_some() {
        FileStatus::Nok
    } else {
        FileStatus::Ok
    };

    match &matched_phrase {
        Some(phrase) => tracing::info!(
            file = %spec.path.display(),
            phrase = %phrase,
            lines = spec.line_count,
            "Error phrase found"
        ),
        None => tracing::debug!(
            file = %spec.path.display(),
            lines = spec.line_count,
            "No error phrase found"
        ),
    }

    ScanOutcome {
        file_label,
        status,
        last_modified: last_modified(&spec.path),
        matched_phrase,
    }
}

/// Scan every spec and fold the outcomes into a report.
pub fn run_checks(specs: &[LogCheckSpec], options: &ScanOptions) -> MonitorReport {
    let started = Instant::now();

    let outcomes: Vec<ScanOutcome> = if options.parallel && specs.len() > 1 {
        specs.par_iter().map(|s| scan_spec(s, options)).collect()
    } else {
        specs.iter().map(|s| scan_spec(s, options)).collect()
    };

    let report = MonitorReport::from_outcomes(outcomes);

    tracing::info!(
        files = specs.len(),
        status_code = report.status_code(),
        parallel = options.parallel,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Monitor run complete"
    );

    report
}

fn last_modified(path: &Path) -> Option<DateTime<Local>> {
    match std::fs::metadata(path).and_then(|m| m.modified()) {
        Ok(time) => Some(DateTime::<Local>::from(time)),
        Err(e) => {
            tracing::debug!(file = %path.display(), error = %e, "Cannot read modification time");
            None
        }
    }
}
