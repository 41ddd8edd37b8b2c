//! Structured logger with dry-run awareness and run summaries.
use std::path::PathBuf;

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::Log;
use super::utils::log_file_path;
use crate::engine::{RunResult, StepStatus};

/// Implement the methods of [`Log`] by delegating to inherent methods of the
/// same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger that forwards to `tracing`.
///
/// Every message also reaches the persistent log file at
/// `$XDG_CACHE_HOME/provision/<command>.log` (default
/// `~/.cache/provision/<command>.log`) through the file layer installed by
/// [`init_subscriber`](super::subscriber::init_subscriber).
#[derive(Debug)]
pub struct Logger {
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger for `command`.
    ///
    /// Stores the log file path for display in the run summary; the file
    /// itself is created by the subscriber's file layer.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            log_file: log_file_path(command),
        }
    }

    /// Create a logger that reports `log_file` in its summary.
    #[must_use]
    pub const fn with_log_file(log_file: Option<PathBuf>) -> Self {
        Self { log_file }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Print the summary of a finished run: one line per step outcome,
    /// then the totals.
    pub fn print_summary(&self, result: &RunResult) {
        if result.outcomes.is_empty() {
            return;
        }

        self.stage("Summary");

        for outcome in &result.outcomes {
            let (icon, color) = status_style(outcome.status);
            let suffix = outcome
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));
            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", outcome.name));
        }

        self.info(&totals_line(result));

        if result.warning_count() > 0 {
            self.warn(&format!(
                "completed with {} warning(s); see above",
                result.warning_count()
            ));
        }

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);
}

/// Summary icon and ANSI color for a step status.
const fn status_style(status: StepStatus) -> (&'static str, &'static str) {
    match status {
        StepStatus::Applied => ("✓", "\x1b[32m"),
        StepStatus::Skipped => ("·", "\x1b[2m"),
        StepStatus::WouldApply => ("~", "\x1b[37m"),
        StepStatus::FailedNonFatal => ("!", "\x1b[33m"),
        StepStatus::Failed => ("✗", "\x1b[31m"),
    }
}

/// Format the totals line, e.g. `3 steps: 1 applied, 1 skipped, ...`.
fn totals_line(result: &RunResult) -> String {
    let count = |status| result.count(status);
    format!(
        "{} steps: \x1b[32m{} applied\x1b[0m, \x1b[2m{} skipped\x1b[0m, \x1b[37m{} would apply\x1b[0m, \x1b[33m{} warnings\x1b[0m, \x1b[31m{} failed\x1b[0m",
        result.outcomes.len(),
        count(StepStatus::Applied),
        count(StepStatus::Skipped),
        count(StepStatus::WouldApply),
        count(StepStatus::FailedNonFatal),
        count(StepStatus::Failed),
    )
}
