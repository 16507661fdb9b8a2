//! Engine logging
//!
//! Every engine message goes through one pluggable sink:
//! - `Logger` trait, installed globally with `Engine::set_logger`
//! - `LogSeverity` from per-call traffic (Trace) up to contract violations (Error)
//! - `DefaultLogger` printing colored lines to stdout, filtered by a minimum severity
//! - `engine_*!` macros used inside the crate; `engine_error!` adds file:line

use std::fmt::Display;
use std::time::SystemTime;
use chrono::{DateTime, Local};
use colored::*;

/// Destination for engine log entries
///
/// # Example
///
/// ```no_run
/// use galaxy_2d_engine::galaxy2d::log::{Logger, LogEntry};
///
/// struct StderrLogger;
///
/// impl Logger for StderrLogger {
///     fn log(&self, entry: &LogEntry) {
///         eprintln!("[{}] {}", entry.source, entry.message);
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    fn log(&self, entry: &LogEntry);
}

/// One log record
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub severity: LogSeverity,
    pub timestamp: SystemTime,
    /// Emitting component (e.g. "galaxy2d::MultiBuffer", "galaxy2d::SpriteSheet")
    pub source: String,
    pub message: String,
    /// Set for ERROR entries raised through `engine_error!`
    pub file: Option<&'static str>,
    pub line: Option<u32>,
}

/// Log severity, ordered from most to least verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogSeverity {
    /// Per-call traffic (bind, upload, update, map)
    Trace,
    /// Lifecycle events (buffer creation, teardown, depletion, animation changes)
    Debug,
    Info,
    /// Recoverable problems (failed implicit unmap, leaked handles)
    Warn,
    /// Contract violations and driver failures
    Error,
}

impl LogSeverity {
    /// Fixed-width label used in formatted lines
    pub fn label(self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }

    fn colored_label(self) -> ColoredString {
        let label = self.label();
        match self {
            LogSeverity::Trace => label.bright_black(),
            LogSeverity::Debug => label.cyan(),
            LogSeverity::Info => label.green(),
            LogSeverity::Warn => label.yellow(),
            LogSeverity::Error => label.red().bold(),
        }
    }
}

/// Console logger
///
/// Prints `[timestamp] [SEVERITY] [source] message`, followed by
/// `(file:line)` when the entry carries a location. Entries below the
/// minimum severity are dropped; the default minimum is Debug, which hides
/// per-call Trace traffic.
#[derive(Debug, Clone, Copy)]
pub struct DefaultLogger {
    min_severity: LogSeverity,
}

impl DefaultLogger {
    pub fn new() -> Self {
        Self::with_min_severity(LogSeverity::Debug)
    }

    /// Logger that drops every entry below `min_severity`
    pub fn with_min_severity(min_severity: LogSeverity) -> Self {
        Self { min_severity }
    }

    pub fn min_severity(&self) -> LogSeverity {
        self.min_severity
    }

    /// Whether an entry of `severity` would be printed
    pub fn accepts(&self, severity: LogSeverity) -> bool {
        severity >= self.min_severity
    }

    /// Format an entry without colors, for loggers that write to files
    pub fn format_plain(entry: &LogEntry) -> String {
        format_line(entry, entry.severity.label(), &entry.source)
    }
}

impl Default for DefaultLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        if !self.accepts(entry.severity) {
            return;
        }
        println!("{}", format_line(entry, entry.severity.colored_label(), entry.source.bright_blue()));
    }
}

fn format_line(entry: &LogEntry, severity: impl Display, source: impl Display) -> String {
    let datetime: DateTime<Local> = entry.timestamp.into();
    let mut line = format!(
        "[{}] [{}] [{}] {}",
        datetime.format("%Y-%m-%d %H:%M:%S%.3f"),
        severity,
        source,
        entry.message
    );
    if let (Some(file), Some(line_number)) = (entry.file, entry.line) {
        line.push_str(&format!(" ({}:{})", file, line_number));
    }
    line
}

// ===== LOGGING MACROS =====

/// Log at an explicit severity (shared body of the `engine_*!` macros)
#[doc(hidden)]
#[macro_export]
macro_rules! engine_log {
    ($severity:ident, $source:expr, $($arg:tt)*) => {
        $crate::galaxy2d::Engine::log(
            $crate::galaxy2d::log::LogSeverity::$severity,
            $source,
            format!($($arg)*)
        )
    };
}

/// Per-call traffic
///
/// ```ignore
/// engine_trace!("galaxy2d::MultiBuffer", "Bound {:?}", target);
/// ```
#[macro_export]
macro_rules! engine_trace {
    ($source:expr, $($arg:tt)*) => { $crate::engine_log!(Trace, $source, $($arg)*) };
}

/// Lifecycle events
#[macro_export]
macro_rules! engine_debug {
    ($source:expr, $($arg:tt)*) => { $crate::engine_log!(Debug, $source, $($arg)*) };
}

#[macro_export]
macro_rules! engine_info {
    ($source:expr, $($arg:tt)*) => { $crate::engine_log!(Info, $source, $($arg)*) };
}

#[macro_export]
macro_rules! engine_warn {
    ($source:expr, $($arg:tt)*) => { $crate::engine_log!(Warn, $source, $($arg)*) };
}

/// ERROR entry carrying the caller's file and line
///
/// ```ignore
/// engine_error!("galaxy2d::MultiBuffer", "Failed to release handles: {}", error);
/// ```
#[macro_export]
macro_rules! engine_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy2d::Engine::log_detailed(
            $crate::galaxy2d::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
