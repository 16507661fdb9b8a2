/// Galaxy2D Engine - global services shared by every subsystem
///
/// The engine currently owns one global service: the logger used by the
/// `engine_*!` macros. Buffers and sprite sheets are plain values created
/// by the caller and do not register themselves here.

use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

/// Installed logger, DefaultLogger until replaced
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

fn logger_slot() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger::default())))
}

fn install(logger: Box<dyn Logger>) {
    // A poisoned slot keeps the previous logger
    if let Ok(mut slot) = logger_slot().write() {
        *slot = logger;
    }
}

fn dispatch(entry: LogEntry) {
    if let Ok(slot) = logger_slot().read() {
        slot.log(&entry);
    }
}

/// Engine-wide services
///
/// # Example
///
/// ```no_run
/// use galaxy_2d_engine::galaxy2d::{Engine, log::{Logger, LogEntry}};
///
/// struct QuietLogger;
/// impl Logger for QuietLogger {
///     fn log(&self, _entry: &LogEntry) {}
/// }
///
/// Engine::set_logger(QuietLogger);
/// ```
pub struct Engine;

impl Engine {
    // ===== LOGGING API =====

    /// Route every subsequent engine log to `logger`
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        install(Box::new(logger));
    }

    /// Go back to a console DefaultLogger
    pub fn reset_logger() {
        install(Box::new(DefaultLogger::default()));
    }

    /// Log without a source location
    ///
    /// Target of the engine_trace!/debug!/info!/warn! macros; `source`
    /// names the emitting component (e.g. "galaxy2d::MultiBuffer").
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        dispatch(LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: None,
            line: None,
        });
    }

    /// Log with the file and line that raised the entry (engine_error!)
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        dispatch(LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: Some(file),
            line: Some(line),
        });
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
