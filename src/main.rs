// LogMon - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading (logmon.toml) and logging initialisation
// 3. Dispatch to `check`, `tail`, or `validate`
//
// stdout carries the report (or the tail text); diagnostics go to the log.

use logmon::app::monitor;
use logmon::core::export;
use logmon::core::model::MonitorReport;
use logmon::core::tail::{self, BufferStrategy};
use logmon::platform::config::{self, AppConfig, PlatformPaths};
use logmon::util::error::{self, LogMonError};
use logmon::util::{self, constants};

use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// LogMon - log file health monitor.
///
/// Reads the last lines of each configured log file and reports NOK for any
/// file whose tail contains an error phrase.
#[derive(Parser, Debug)]
#[command(name = "logmon", version, about)]
struct Cli {
    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan every configured log file and print the report.
    ///
    /// Exit status: 0 when every file is OK or not found, 1 when any file
    /// is NOK, 2 when the configuration cannot be loaded, 3 when the report
    /// cannot be written.
    Check {
        /// Config file (defaults to the platform config directory).
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,

        /// Report format.
        #[arg(short = 'f', long = "format", value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Single-line JSON instead of pretty-printed.
        #[arg(long = "compact")]
        compact: bool,

        /// Scan files one after another instead of in parallel.
        #[arg(long = "sequential")]
        sequential: bool,
    },

    /// Print the last lines of one file.
    Tail {
        /// File to read.
        path: PathBuf,

        /// Number of trailing lines.
        #[arg(short = 'n', long = "lines", default_value_t = constants::DEFAULT_LINE_COUNT)]
        lines: usize,

        /// Fixed read buffer in bytes (adaptive if omitted).
        #[arg(short = 'b', long = "buffer")]
        buffer: Option<usize>,
    },

    /// Load the config file and report every problem found in it.
    Validate {
        /// Config file (defaults to the platform config directory).
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Csv,
}

fn main() {
    let cli = Cli::parse();

    let code = match cli.command {
        Command::Check {
            config,
            format,
            compact,
            sequential,
        } => run_check(cli.debug, config, format, compact, sequential),
        Command::Tail {
            path,
            lines,
            buffer,
        } => run_tail(cli.debug, &path, lines, buffer),
        Command::Validate { config } => run_validate(cli.debug, config),
    };

    std::process::exit(code);
}

/// Resolve the config path (CLI override > platform default), load it, and
/// initialise logging with its `[logging]` section.
fn load_and_init(debug: bool, config_path: Option<PathBuf>) -> Option<(AppConfig, Vec<String>)> {
    let path = config_path.unwrap_or_else(|| PlatformPaths::resolve().config_file());

    match config::load_config(&path) {
        Ok((app_config, warnings)) => {
            util::logging::init(
                debug,
                app_config.log_level.as_deref(),
                app_config.log_file.as_deref(),
            );
            tracing::info!(
                version = constants::APP_VERSION,
                config = %path.display(),
                monitors = app_config.monitors.len(),
                "LogMon starting"
            );
            for warning in &warnings {
                tracing::warn!("{}", warning);
            }
            Some((app_config, warnings))
        }
        Err(e) => {
            util::logging::init(debug, None, None);
            tracing::error!(error = %e, "Failed to load configuration");
            eprintln!("Error: {e}");
            None
        }
    }
}

fn run_check(
    debug: bool,
    config_path: Option<PathBuf>,
    format: Format,
    compact: bool,
    sequential: bool,
) -> i32 {
    let Some((app_config, _warnings)) = load_and_init(debug, config_path) else {
        return constants::EXIT_CONFIG_ERROR;
    };

    if app_config.monitors.is_empty() {
        tracing::warn!("No log configs defined; the report will be empty");
    }

    let mut options = app_config.scan;
    if sequential {
        options.parallel = false;
    }

    let report = monitor::run_checks(app_config.monitors.specs(), &options);

    let written = write_report(&report, format, compact, io::stdout().lock());
    match &written {
        Ok(count) => tracing::debug!(entries = count, "Report written"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to write report");
            eprintln!("Error: {e}");
        }
    }

    check_exit_code(&report, &written)
}

/// A report that never reached the reader is an output failure, whatever
/// the scan found.
fn check_exit_code(report: &MonitorReport, written: &error::Result<usize>) -> i32 {
    if written.is_err() {
        constants::EXIT_OUTPUT_ERROR
    } else if report.has_errors() {
        constants::EXIT_ERRORS_FOUND
    } else {
        constants::EXIT_OK
    }
}

/// Render the report in the requested format.
fn write_report<W: Write>(
    report: &MonitorReport,
    format: Format,
    compact: bool,
    out: W,
) -> error::Result<usize> {
    let count = match format {
        Format::Json => export::export_json(report, out, !compact)?,
        Format::Csv => export::export_csv(report, out)?,
    };
    Ok(count)
}

fn run_tail(debug: bool, path: &Path, lines: usize, buffer: Option<usize>) -> i32 {
    util::logging::init(debug, None, None);

    let strategy = buffer.map_or(BufferStrategy::Adaptive, BufferStrategy::Fixed);
    match print_tail(io::stdout().lock(), path, lines, strategy) {
        Ok(()) => constants::EXIT_OK,
        Err(e @ LogMonError::Tail(_)) => {
            eprintln!("Error: {e}");
            constants::EXIT_ERRORS_FOUND
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to write tail");
            eprintln!("Error: {e}");
            constants::EXIT_OUTPUT_ERROR
        }
    }
}

fn print_tail<W: Write>(
    mut out: W,
    path: &Path,
    lines: usize,
    strategy: BufferStrategy,
) -> error::Result<()> {
    let text = tail::tail_file(path, lines, strategy)?;
    writeln!(out, "{text}").map_err(|source| LogMonError::Io {
        operation: "writing tail",
        source,
    })
}

fn run_validate(debug: bool, config_path: Option<PathBuf>) -> i32 {
    let Some((app_config, warnings)) = load_and_init(debug, config_path) else {
        return constants::EXIT_CONFIG_ERROR;
    };

    if let Err(e) = write_validation(io::stdout().lock(), app_config.monitors.len(), &warnings) {
        tracing::error!(error = %e, "Failed to write validation result");
        eprintln!("Error: {e}");
        return constants::EXIT_OUTPUT_ERROR;
    }

    if warnings.is_empty() {
        constants::EXIT_OK
    } else {
        constants::EXIT_CONFIG_ERROR
    }
}

/// One line per warning, then a summary line.
fn write_validation<W: Write>(mut out: W, valid: usize, warnings: &[String]) -> error::Result<()> {
    let io_err = |source| LogMonError::Io {
        operation: "writing validation result",
        source,
    };
    for warning in warnings {
        writeln!(out, "warning: {warning}").map_err(io_err)?;
    }
    writeln!(
        out,
        "{valid} valid log config(s), {} warning(s)",
        warnings.len()
    )
    .map_err(io_err)
}
