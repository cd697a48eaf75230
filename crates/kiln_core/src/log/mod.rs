//! # Logging
//!
//! Leveled console logging with a bounded message length.
//!
//! ## Line Format
//!
//! ```text
//! \x1b[31mERROR: Failed to open file: shaders/quad.vert\x1b[0m
//! ```
//!
//! ## Rules
//!
//! - Messages are rendered into a stack buffer of [`MAX_MESSAGE_LEN`] bytes
//! - Oversized messages are cut and end with [`TRUNCATION_MARKER`]
//! - Arguments are checked at compile time (`format_args!`)
//! - Every line is mirrored to `tracing`
//!
//! ## Example
//!
//! ```rust,ignore
//! use kiln_core::{log_error, log_trace};
//!
//! log_trace!("transient storage: {} bytes", arena.capacity());
//! log_error!("Failed to open file: {}", path.display());
//! ```

mod logger;
mod message;

pub use logger::Logger;
pub use message::{BoundedMessage, MAX_MESSAGE_LEN, TRUNCATION_MARKER};

use std::fmt;
use std::sync::OnceLock;

use colored::Color;
use serde::{Deserialize, Serialize};

/// Log severity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Progress information.
    #[default]
    Trace,
    /// Something unexpected that the caller survives.
    Warn,
    /// A failed operation.
    Error,
}

impl Severity {
    /// Line prefix.
    #[inline]
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Trace => "TRACE:",
            Self::Warn => "WARN:",
            Self::Error => "ERROR:",
        }
    }

    /// Console color of the line.
    #[inline]
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Trace => Color::Green,
            Self::Warn => Color::Yellow,
            Self::Error => Color::Red,
        }
    }

    /// Lowercase name, as used in config files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err("invalid severity"),
        }
    }
}

/// The process logger.
static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Installs the process logger.
///
/// Only the first call wins; later calls hand the logger back.
///
/// # Errors
///
/// Returns `logger` unchanged if a process logger is already in place
/// (including the stdout default created by an earlier log call).
pub fn install(logger: Logger) -> Result<(), Logger> {
    LOGGER.set(logger)
}

/// The process logger, defaulting to stdout.
#[must_use]
pub fn logger() -> &'static Logger {
    LOGGER.get_or_init(Logger::stdout)
}

/// Writes one line through the process logger.
pub fn log(severity: Severity, args: fmt::Arguments<'_>) {
    logger().log(severity, args);
}

/// Logs at [`Severity::Error`] and halts.
///
/// Workspace profiles build with `panic = "abort"`, so this never unwinds
/// outside of tests.
#[cold]
#[inline(never)]
pub fn fatal(args: fmt::Arguments<'_>) -> ! {
    let message = BoundedMessage::format(args);
    logger().emit(Severity::Error, &message);
    panic!("{message}");
}

/// Logs at [`Severity::Trace`].
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)+) => {
        $crate::log::log($crate::log::Severity::Trace, ::core::format_args!($($arg)+))
    };
}

/// Logs at [`Severity::Warn`].
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)+) => {
        $crate::log::log($crate::log::Severity::Warn, ::core::format_args!($($arg)+))
    };
}

/// Logs at [`Severity::Error`].
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)+) => {
        $crate::log::log($crate::log::Severity::Error, ::core::format_args!($($arg)+))
    };
}

/// Logs at [`Severity::Error`] and halts.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)+) => {
        $crate::log::fatal(::core::format_args!($($arg)+))
    };
}

/// Halts through [`fatal`] when `cond` is false.
#[macro_export]
macro_rules! kiln_assert {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            $crate::log::fatal(::core::format_args!($($arg)+));
        }
    };
}
