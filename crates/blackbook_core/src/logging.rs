//! Process-wide logging bootstrap.
//!
//! # Responsibility
//! - Start the `flexi_logger` backend once per process, either on rotating
//!   files or on stderr.
//! - Capture panics as metadata-only log lines.
//!
//! # Invariants
//! - Initialization never panics.
//! - Repeating the same initialization is a no-op; any other
//!   re-initialization is rejected.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "blackbook";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    Stderr,
    Directory(PathBuf),
}

impl Display for LogSink {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stderr => write!(f, "stderr"),
            Self::Directory(path) => write!(f, "{}", path.display()),
        }
    }
}

struct LoggingState {
    level: &'static str,
    sink: LogSink,
    _logger: LoggerHandle,
}

/// Starts rotating file logs under `log_dir` (absolute).
///
/// # Errors
/// - Unsupported `level`, empty or relative `log_dir`.
/// - Directory creation or backend start failure.
/// - Logging already active with another level or sink.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let sink = LogSink::Directory(normalize_log_dir(log_dir)?);
    init_with_sink(level, sink)
}

/// Starts logging on stderr, for runs without a configured log directory.
pub fn init_console_logging(level: &str) -> Result<(), String> {
    init_with_sink(level, LogSink::Stderr)
}

fn init_with_sink(level: &str, sink: LogSink) -> Result<(), String> {
    let level = normalize_level(level)?;
    let state = LOGGING_STATE.get_or_try_init(|| start_logger(level, sink.clone()))?;

    if state.sink != sink {
        return Err(format!(
            "logging already initialized on `{}`; refusing to switch to `{}`",
            state.sink, sink
        ));
    }
    if state.level != level {
        return Err(format!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            state.level, level
        ));
    }
    Ok(())
}

fn start_logger(level: &'static str, sink: LogSink) -> Result<LoggingState, String> {
    let builder = Logger::try_with_str(level)
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?;

    let logger = match &sink {
        LogSink::Stderr => builder
            .log_to_stderr()
            .format_for_stderr(flexi_logger::detailed_format)
            .start(),
        LogSink::Directory(dir) => {
            std::fs::create_dir_all(dir).map_err(|err| {
                format!("failed to create log directory `{}`: {err}", dir.display())
            })?;
            builder
                .log_to_file(
                    FileSpec::default()
                        .directory(dir.as_path())
                        .basename(LOG_FILE_BASENAME),
                )
                .rotate(
                    Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(MAX_LOG_FILES),
                )
                .write_mode(WriteMode::BufferAndFlush)
                .append()
                .format_for_files(flexi_logger::detailed_format)
                .start()
        }
    }
    .map_err(|err| format!("failed to start logger: {err}"))?;

    install_panic_hook_once();
    info!(
        "event=app_start module=core status=ok platform={} build_mode={} version={}",
        std::env::consts::OS,
        build_mode(),
        env!("CARGO_PKG_VERSION")
    );
    info!(
        "event=logging_init module=core status=ok level={} sink={}",
        level, sink
    );

    Ok(LoggingState {
        level,
        sink,
        _logger: logger,
    })
}

/// Active `(level, sink)`, or `None` before initialization.
pub fn logging_status() -> Option<(&'static str, LogSink)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level, state.sink.clone()))
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        )),
    }
}

fn normalize_log_dir(log_dir: &str) -> Result<PathBuf, String> {
    let trimmed = log_dir.trim();
    if trimmed.is_empty() {
        return Err("log_dir cannot be empty".to_string());
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(format!("log_dir must be an absolute path, got `{trimmed}`"));
    }
    Ok(path.to_path_buf())
}

fn build_mode() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

fn install_panic_hook_once() {
    if PANIC_HOOK_INSTALLED.set(()).is_err() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Payloads may echo request data; keep them single-line and short.
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_payload_summary(panic_info);
        error!(
            "event=panic_captured module=core status=error location={} payload={}",
            location, payload
        );
        previous_hook(panic_info);
    }));
}

fn panic_payload_summary(info: &std::panic::PanicHookInfo<'_>) -> String {
    let payload = info
        .payload()
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| info.payload().downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());

    sanitize_message(&payload, MAX_PANIC_PAYLOAD_CHARS)
}

fn sanitize_message(value: &str, max_chars: usize) -> String {
    let normalized = value.replace(['\n', '\r'], " ");
    let mut truncated = normalized.chars().take(max_chars).collect::<String>();
    if normalized.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}
