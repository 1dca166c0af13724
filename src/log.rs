//! Leveled file logging for scriptgen.
//!
//! The library logs through the macros below at any time; nothing is
//! written until the binary has picked a log file with [`init_with_debug`]
//! or [`init_to`].
//!
//! Log levels:
//! - ERROR: A generation run was rejected
//! - WARN: Unexpected but recoverable conditions (unreadable config, etc.)
//! - INFO: Generation start and result
//! - DEBUG: Graph edges, adjacency lists, emission order
//! - TRACE: Rendered node bodies
//!
//! Debug mode can be enabled with `--debug` flag or `SCRIPTGEN_DEBUG=1` env var.

use crate::config::Config;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::OnceLock;

static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();
static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);

/// Log levels for filtering messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }

    fn from_u8(v: u8) -> Self {
        match v {
            0 => LogLevel::Error,
            1 => LogLevel::Warn,
            2 => LogLevel::Info,
            3 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

fn debug_from_env() -> bool {
    std::env::var("SCRIPTGEN_DEBUG")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false)
}

/// Initialize logging to ~/.scriptgen/scriptgen.log.
///
/// The file is truncated so each invocation starts with a fresh log.
pub fn init_with_debug(debug: bool) {
    match Config::log_path() {
        Ok(path) => {
            if let Some(dir) = path.parent() {
                let _ = std::fs::create_dir_all(dir);
            }
            init_to(&path, debug);
        }
        Err(_) => set_level(level_for(debug)),
    }
}

/// Initialize logging to an explicit file.
///
/// Only the first call picks the file; later calls still adjust the level.
pub fn init_to(path: &Path, debug: bool) {
    set_level(level_for(debug));
    let _ = std::fs::write(path, "");
    LOG_PATH.set(path.to_path_buf()).ok();
}

fn level_for(debug: bool) -> LogLevel {
    if debug || debug_from_env() {
        LogLevel::Debug
    } else {
        LogLevel::Info
    }
}

/// Set the minimum log level for output.
pub fn set_level(level: LogLevel) {
    LOG_LEVEL.store(level as u8, Ordering::SeqCst);
}

/// Get the current log level.
pub fn get_level() -> LogLevel {
    LogLevel::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

/// Whether a message at `level` would currently be written.
///
/// Lets callers skip building expensive messages (adjacency lists,
/// rendered bodies) that would be filtered out anyway.
pub fn enabled(level: LogLevel) -> bool {
    level <= get_level() && LOG_PATH.get().is_some()
}

/// Log a message at the specified level.
pub fn log_at(level: LogLevel, msg: &str) {
    if !enabled(level) {
        return;
    }

    if let Some(path) = LOG_PATH.get() {
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
            let _ = writeln!(file, "[{}] [{}] {}", timestamp, level.as_str(), msg);
        }
    }
}

/// Log a header followed by one tab-indented line per item.
pub fn log_block<I, S>(level: LogLevel, header: &str, lines: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if !enabled(level) {
        return;
    }
    log_at(level, &indent_block(header, lines));
}

fn indent_block<I, S>(header: &str, lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = header.to_string();
    for line in lines {
        out.push_str("\n\t");
        out.push_str(line.as_ref());
    }
    out
}

/// Log a message at INFO level.
pub fn log(msg: &str) {
    log_at(LogLevel::Info, msg);
}

/// Log a message at ERROR level.
pub fn error(msg: &str) {
    log_at(LogLevel::Error, msg);
}

/// Log a message at WARN level.
pub fn warn(msg: &str) {
    log_at(LogLevel::Warn, msg);
}

/// Log a message at DEBUG level (only in debug mode).
pub fn debug(msg: &str) {
    log_at(LogLevel::Debug, msg);
}

/// Log a message at TRACE level (very verbose).
pub fn trace(msg: &str) {
    log_at(LogLevel::Trace, msg);
}

/// Log macro for INFO level.
#[macro_export]
macro_rules! sglog {
    ($($arg:tt)*) => {
        $crate::log::log(&format!($($arg)*))
    };
}

/// Log macro for ERROR level.
#[macro_export]
macro_rules! sglog_error {
    ($($arg:tt)*) => {
        $crate::log::error(&format!($($arg)*))
    };
}

/// Log macro for WARN level.
#[macro_export]
macro_rules! sglog_warn {
    ($($arg:tt)*) => {
        $crate::log::warn(&format!($($arg)*))
    };
}

/// Log macro for DEBUG level (only logs when debug mode is enabled).
#[macro_export]
macro_rules! sglog_debug {
    ($($arg:tt)*) => {
        $crate::log::debug(&format!($($arg)*))
    };
}

/// Log macro for TRACE level.
#[macro_export]
macro_rules! sglog_trace {
    ($($arg:tt)*) => {
        $crate::log::trace(&format!($($arg)*))
    };
}
