//! # Logger
//!
//! Writes colored, severity-prefixed lines to a sink and mirrors each line
//! as a `tracing` event.

use std::fmt;
use std::io::{self, Write};

use parking_lot::Mutex;

use super::message::BoundedMessage;
use super::Severity;

/// ANSI reset sequence closing every colored line.
const RESET: &str = "\x1b[0m";

/// A leveled logger writing to one sink.
///
/// # Thread Safety
///
/// The sink is behind a mutex, so a logger can be shared. Lines from
/// different threads never interleave.
pub struct Logger {
    /// Destination for rendered lines.
    sink: Mutex<Box<dyn Write + Send>>,
    /// Lines below this severity are dropped.
    min_severity: Severity,
    /// Wrap lines in ANSI color codes.
    color: bool,
}

impl Logger {
    /// Creates a logger writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::with_sink(io::stdout())
    }

    /// Creates a logger writing to `sink`, accepting every severity.
    #[must_use]
    pub fn with_sink(sink: impl Write + Send + 'static) -> Self {
        Self {
            sink: Mutex::new(Box::new(sink)),
            min_severity: Severity::Trace,
            color: true,
        }
    }

    /// Sets the minimum severity that is written.
    #[must_use]
    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    /// Enables or disables ANSI colors.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Minimum severity that is written.
    #[inline]
    #[must_use]
    pub const fn min_severity(&self) -> Severity {
        self.min_severity
    }

    /// Whether a line of `severity` would be written.
    #[inline]
    #[must_use]
    pub fn enabled(&self, severity: Severity) -> bool {
        severity >= self.min_severity
    }

    /// Formats and writes one line.
    pub fn log(&self, severity: Severity, args: fmt::Arguments<'_>) {
        if !self.enabled(severity) {
            return;
        }
        let message = BoundedMessage::format(args);
        self.emit(severity, &message);
    }

    /// Writes an already rendered message.
    ///
    /// Sink errors are swallowed: logging never fails the caller.
    pub fn emit(&self, severity: Severity, message: &BoundedMessage) {
        if !self.enabled(severity) {
            return;
        }

        mirror(severity, message);

        let mut sink = self.sink.lock();
        let written = if self.color && colored::control::SHOULD_COLORIZE.should_colorize() {
            writeln!(
                sink,
                "\x1b[{}m{} {}{}",
                severity.color().to_fg_str(),
                severity.prefix(),
                message,
                RESET
            )
        } else {
            writeln!(sink, "{} {}", severity.prefix(), message)
        };
        if written.is_ok() {
            let _ = sink.flush();
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("min_severity", &self.min_severity)
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

/// Forwards a line to any installed `tracing` subscriber.
fn mirror(severity: Severity, message: &BoundedMessage) {
    let text = message.as_str();
    let truncated = message.is_truncated();
    match severity {
        Severity::Trace => tracing::trace!(truncated, "{}", text),
        Severity::Warn => tracing::warn!(truncated, "{}", text),
        Severity::Error => tracing::error!(truncated, "{}", text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// Sink that keeps everything written to it.
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_plain_line_format() {
        let capture = Capture::default();
        let logger = Logger::with_sink(capture.clone()).with_color(false);

        logger.log(Severity::Error, format_args!("Failed to open file: {}", "missing.bin"));

        assert_eq!(capture.text(), "ERROR: Failed to open file: missing.bin\n");
    }

    #[test]
    fn test_min_severity_filters() {
        let capture = Capture::default();
        let logger = Logger::with_sink(capture.clone())
            .with_color(false)
            .with_min_severity(Severity::Warn);

        logger.log(Severity::Trace, format_args!("hidden"));
        logger.log(Severity::Warn, format_args!("shown"));

        assert_eq!(capture.text(), "WARN: shown\n");
        assert!(!logger.enabled(Severity::Trace));
        assert!(logger.enabled(Severity::Error));
    }

    #[test]
    fn test_colored_line_is_reset() {
        colored::control::set_override(true);
        let capture = Capture::default();
        let logger = Logger::with_sink(capture.clone());

        logger.log(Severity::Trace, format_args!("loaded"));

        let text = capture.text();
        assert!(text.starts_with("\x1b[32m"));
        assert!(text.contains("TRACE: loaded"));
        assert!(text.trim_end().ends_with(RESET));
    }
}
