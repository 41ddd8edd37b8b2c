//! Tracing subscriber setup: console formatter, file layer, and initialisation.
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use super::utils::{format_utc_datetime, format_utc_time, log_file_path, strip_ansi};

/// Target used for stage headers (run start, run end, sections).
pub(super) const STAGE_TARGET: &str = "provision::stage";
/// Target used for changes that dry-run mode suppressed.
pub(super) const DRY_RUN_TARGET: &str = "provision::dry_run";

const DRY_RUN_MARKER: &str = "[DRY-RUN]";

/// Extracts the `message` field from a [`tracing::Event`].
#[derive(Default)]
struct MessageExtractor {
    message: String,
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

/// A [`tracing_subscriber::Layer`] that appends all events to the persistent
/// log file with timestamps and ANSI codes stripped.
///
/// Always captures events at `DEBUG` level and above regardless of the
/// console verbosity setting.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
    dry_run: bool,
}

impl FileLayer {
    /// Open the log file for `command`, truncate it with a run header, and
    /// return a layer ready to receive events.
    ///
    /// Returns `None` if the cache directory cannot be created or the file
    /// cannot be opened.
    pub(super) fn new(command: &str, dry_run: bool) -> Option<Self> {
        Self::at(&log_file_path(command)?, dry_run)
    }

    /// Like [`new`](Self::new), writing to an explicit `path`.
    pub(super) fn at(path: &Path, dry_run: bool) -> Option<Self> {
        let version = option_env!("PROVISION_VERSION")
            .unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let mode = if dry_run { " (dry run)" } else { "" };
        let header = format!(
            "==========================================\n\
             provision {version} {}{mode}\n\
             ==========================================\n",
            format_utc_datetime(),
        );
        fs::write(path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(path).ok()?;
        Some(Self {
            file: Mutex::new(file),
            dry_run,
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        let level = *metadata.level();
        let target = metadata.target();

        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        let msg = strip_ansi(&extractor.message);
        let ts = format_utc_time();
        let marker = if self.dry_run {
            format!("{DRY_RUN_MARKER} ")
        } else {
            String::new()
        };

        let line = match (level, target) {
            (tracing::Level::INFO, STAGE_TARGET) => format!("[{ts}] {marker}==> {msg}"),
            (tracing::Level::INFO, DRY_RUN_TARGET) => format!("[{ts}] {marker}    ~ {msg}"),
            (tracing::Level::ERROR, _) => format!("[{ts}] {marker}    [error] {msg}"),
            (tracing::Level::WARN, _) => format!("[{ts}] {marker}    [warn] {msg}"),
            (tracing::Level::DEBUG, _) => format!("[{ts}] {marker}    [debug] {msg}"),
            _ => format!("[{ts}] {marker}    {msg}"),
        };

        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] that emits one timestamped
/// console line per event, marked `[DRY-RUN]` in preview mode.
#[derive(Debug, Clone, Copy)]
pub(super) struct ProvisionFormatter {
    pub(super) dry_run: bool,
    pub(super) color: bool,
}

impl ProvisionFormatter {
    /// Render one console line (without the trailing newline).
    pub(super) fn render(&self, level: tracing::Level, target: &str, msg: &str) -> String {
        let ts = format!("\x1b[2m[{}]\x1b[0m", format_utc_datetime());
        let marker = if self.dry_run {
            format!(" \x1b[33m{DRY_RUN_MARKER}\x1b[0m")
        } else {
            String::new()
        };
        let body = match level {
            tracing::Level::ERROR => format!("\x1b[31mERROR\x1b[0m {msg}"),
            tracing::Level::WARN => format!("\x1b[33mWARN\x1b[0m  {msg}"),
            tracing::Level::INFO if target == STAGE_TARGET => {
                format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m")
            }
            tracing::Level::INFO if target == DRY_RUN_TARGET => {
                format!("  \x1b[33m~\x1b[0m {msg}")
            }
            tracing::Level::INFO => format!("  {msg}"),
            _ => format!("  \x1b[2m{msg}\x1b[0m"),
        };
        let line = format!("{ts}{marker} {body}");
        if self.color { line } else { strip_ansi(&line) }
    }
}

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ProvisionFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        writeln!(
            writer,
            "{}",
            self.render(*metadata.level(), metadata.target(), &extractor.message)
        )
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Sets up a console layer writing every event to stdout in the provision
/// line format, and a file layer that writes all events (including `debug`)
/// to `$XDG_CACHE_HOME/provision/<command>.log`.
/// Must be called once at program startup, before any logging.
pub fn init_subscriber(verbose: bool, dry_run: bool, command: &str) {
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let formatter = ProvisionFormatter {
        dry_run,
        color: console::Term::stdout().features().colors_supported(),
    };

    let console_layer = fmt::layer()
        .event_format(formatter)
        .with_writer(std::io::stdout)
        .with_filter(console_level);

    let file_layer = FileLayer::new(command, dry_run).map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
