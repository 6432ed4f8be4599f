//! Process-wide rolling file logs.
//!
//! # Invariants
//! - At most one logger per process. A second `init_logging` with the same
//!   target is a no-op; a different target is an error.
//! - Initialization never panics.
//! - Log lines carry ids, counts and codes. Session text and fragments are
//!   never logged, and captured panic payloads are flattened and truncated.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "grammarfix";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 5;
const PANIC_PAYLOAD_LIMIT: usize = 160;

static ACTIVE_LOGGER: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Eq)]
struct LogTarget {
    level: &'static str,
    dir: PathBuf,
}

struct ActiveLogger {
    target: LogTarget,
    _handle: LoggerHandle,
}

/// Starts file logging at `level` under the absolute directory `log_dir`.
///
/// # Errors
/// - `level` is not one of `trace|debug|info|warn|error` (`warning` is accepted).
/// - `log_dir` is blank, relative, or cannot be created.
/// - A logger with a different level or directory is already running.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let requested = LogTarget {
        level: normalize_level(level)?,
        dir: normalize_log_dir(log_dir)?,
    };

    let active = ACTIVE_LOGGER.get_or_try_init(|| start(requested.clone()))?;
    if active.target == requested {
        return Ok(());
    }
    Err(format!(
        "logging already running as {}; refusing to switch to {}",
        describe(&active.target),
        describe(&requested)
    ))
}

/// `(level, log_dir)` of the running logger, or `None` before init.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE_LOGGER
        .get()
        .map(|active| (active.target.level, active.target.dir.clone()))
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start(target: LogTarget) -> Result<ActiveLogger, String> {
    std::fs::create_dir_all(&target.dir)
        .map_err(|err| format!("cannot create log directory `{}`: {err}", target.dir.display()))?;

    let handle = Logger::try_with_str(target.level)
        .map_err(|err| format!("invalid log level `{}`: {err}", target.level))?
        .log_to_file(
            FileSpec::default()
                .directory(&target.dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("logger backend failed to start: {err}"))?;

    if PANIC_HOOK.set(()).is_ok() {
        capture_panics();
    }

    info!(
        "event=core_init module=core status=ok version={} os={} {}",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        describe(&target)
    );

    Ok(ActiveLogger {
        target,
        _handle: handle,
    })
}

fn describe(target: &LogTarget) -> String {
    format!("level={} log_dir={}", target.level, target.dir.display())
}

pub(crate) fn normalize_level(level: &str) -> Result<&'static str, String> {
    let level = level.trim().to_ascii_lowercase();
    let normalized = match level.as_str() {
        "warning" => "warn",
        other => ["trace", "debug", "info", "warn", "error"]
            .into_iter()
            .find(|known| *known == other)
            .ok_or_else(|| {
                format!("unsupported log level `{other}`; expected trace|debug|info|warn|error")
            })?,
    };
    Ok(normalized)
}

pub(crate) fn normalize_log_dir(log_dir: &str) -> Result<PathBuf, String> {
    let path = Path::new(log_dir.trim());
    if path.as_os_str().is_empty() {
        return Err("log_dir cannot be empty".to_string());
    }
    if path.is_relative() {
        return Err(format!(
            "log_dir must be an absolute path, got `{}`",
            path.display()
        ));
    }
    Ok(path.to_path_buf())
}

fn capture_panics() {
    let chained = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(String::as_str))
            .unwrap_or("non-string panic payload");
        error!(
            "event=panic_captured module=core status=error location={location} payload={}",
            sanitize_message(payload, PANIC_PAYLOAD_LIMIT)
        );
        chained(info);
    }));
}

fn sanitize_message(value: &str, max_chars: usize) -> String {
    let mut chars = value.chars().map(|ch| match ch {
        '\n' | '\r' => ' ',
        other => other,
    });
    let mut sanitized: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        sanitized.push_str("...");
    }
    sanitized
}
