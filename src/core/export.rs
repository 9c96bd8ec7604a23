// LogMon - core/export.rs
//
// JSON and CSV rendering of a monitor report.
// Core layer: writes to any Write trait object.

use crate::core::model::MonitorReport;
use crate::util::error::ExportError;
use std::io::Write;

/// Write the report as a JSON object keyed by file base name.
///
/// Returns the number of file entries written.
pub fn export_json<W: Write>(
    report: &MonitorReport,
    mut writer: W,
    pretty: bool,
) -> Result<usize, ExportError> {
    let result = if pretty {
        serde_json::to_writer_pretty(&mut writer, report)
    } else {
        serde_json::to_writer(&mut writer, report)
    };
    result.map_err(|e| ExportError::Json { source: e })?;

    writeln!(writer).map_err(|e| ExportError::Io { source: e })?;
    Ok(report.len())
}

/// Write the report as CSV: file, status, last_modified.
pub fn export_csv<W: Write>(report: &MonitorReport, writer: W) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["file", "status", "last_modified"])
        .map_err(|e| ExportError::Csv { source: e })?;

    let mut count = 0;
    for (label, entry) in report.entries() {
        csv_writer
            .write_record([
                label.as_str(),
                entry.status.label(),
                entry.last_modified.as_deref().unwrap_or(""),
            ])
            .map_err(|e| ExportError::Csv { source: e })?;
        count += 1;
    }

    csv_writer
        .flush()
        .map_err(|e| ExportError::Io { source: e })?;

    Ok(count)
}
