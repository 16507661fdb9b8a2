//! Error types for the Galaxy2D engine
//!
//! This module defines the error type shared by the buffer manager, the
//! graphics device facade and the sprite-sheet helper, plus the
//! `engine_err!` / `engine_bail!` macros that log an error at the point
//! where it is raised.

use std::fmt;
use crate::resource::BufferTargets;

/// Result type for Galaxy2D engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy2D engine errors
///
/// All of these are contract violations or driver failures. None of them
/// is transient, so nothing in the engine retries on error.
#[derive(Debug, Clone)]
pub enum Error {
    /// Invalid construction arguments (empty capability mask, bad sheet layout, ...)
    ConfigurationError(String),

    /// A target outside the capability mask, or a union where a single target is required
    InvalidTarget {
        /// Target passed by the caller
        requested: BufferTargets,
        /// Capability mask of the buffer
        supported: BufferTargets,
    },

    /// The named operation needs a bound target and nothing is bound
    NoTargetBound(&'static str),

    /// The target has no data uploaded since its last depletion
    EmptyTarget(BufferTargets),

    /// Index, row, column or byte range outside the valid range
    OutOfBounds(String),

    /// The graphics device rejected the call sequence (draw while mapped, ...)
    DriverStateError(String),

    /// Backend-specific error (allocation mismatch, poisoned device lock, ...)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// No animation registered under this name
    AnimationNotFound(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            Error::InvalidTarget { requested, supported } => write!(
                f,
                "Invalid target: {:?} is not a single target of {:?}",
                requested, supported
            ),
            Error::NoTargetBound(op) => write!(f, "No target bound: {} requires a bound target", op),
            Error::EmptyTarget(target) => write!(f, "Empty target: {:?} has no data", target),
            Error::OutOfBounds(msg) => write!(f, "Out of bounds: {}", msg),
            Error::DriverStateError(msg) => write!(f, "Driver state error: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::AnimationNotFound(name) => write!(f, "Animation not found: {}", name),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an error at ERROR severity (with file:line) and evaluate to it
///
/// Takes an `Error` value rather than a format string; the variant carries
/// the context and its `Display` text becomes the log message.
///
/// # Example
///
/// ```ignore
/// let err = engine_err!("galaxy2d::MultiBuffer", Error::NoTargetBound("upload"));
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $err:expr) => {{
        let err = $err;
        $crate::engine_error!($source, "{}", err);
        err
    }};
}

/// Log an error at ERROR severity and return it from the current function
///
/// Same call shape as `engine_err!`: a source and an `Error` value, not a
/// message. Build formatted context into the variant, e.g.
/// `Error::ConfigurationError(format!(...))`.
///
/// # Example
///
/// ```ignore
/// if self.bound.is_none() {
///     engine_bail!("galaxy2d::MultiBuffer", Error::NoTargetBound("upload"));
/// }
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $err:expr) => {
        return Err($crate::engine_err!($source, $err))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
