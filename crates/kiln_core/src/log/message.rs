//! # Bounded Messages
//!
//! Log messages are rendered into a fixed stack buffer. No heap allocation
//! happens while formatting, and an oversized message is cut and flagged
//! instead of overflowing.

use std::fmt::{self, Write};

/// Maximum rendered length of a log message in bytes, marker included.
pub const MAX_MESSAGE_LEN: usize = 8192;

/// Appended to a message that did not fit in [`MAX_MESSAGE_LEN`].
pub const TRUNCATION_MARKER: &str = " [truncated]";

/// A formatted message of at most [`MAX_MESSAGE_LEN`] bytes of UTF-8.
pub struct BoundedMessage {
    /// Rendered bytes; `buf[..len]` is always valid UTF-8.
    buf: [u8; MAX_MESSAGE_LEN],
    /// Bytes in use.
    len: usize,
    /// Set once any input was dropped.
    truncated: bool,
}

impl BoundedMessage {
    /// Creates an empty message.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buf: [0; MAX_MESSAGE_LEN],
            len: 0,
            truncated: false,
        }
    }

    /// Renders `args`, truncating at [`MAX_MESSAGE_LEN`].
    #[must_use]
    pub fn format(args: fmt::Arguments<'_>) -> Self {
        let mut message = Self::new();
        // Overflow is absorbed by `write_str`; only a failing Display impl errors here.
        if message.write_fmt(args).is_err() {
            message.truncated = true;
        }
        message.seal();
        message
    }

    /// The rendered text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.buf[..self.len]).unwrap_or_default()
    }

    /// Length of the rendered text in bytes.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing was rendered.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether part of the input was dropped.
    #[inline]
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Makes room for and appends the truncation marker.
    fn seal(&mut self) {
        if !self.truncated {
            return;
        }
        let mut cut = self.len.min(MAX_MESSAGE_LEN - TRUNCATION_MARKER.len());
        while cut > 0 && is_continuation(self.buf[cut]) {
            cut -= 1;
        }
        let end = cut + TRUNCATION_MARKER.len();
        self.buf[cut..end].copy_from_slice(TRUNCATION_MARKER.as_bytes());
        self.len = end;
    }
}

impl Default for BoundedMessage {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for BoundedMessage {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated {
            return Ok(());
        }

        let room = MAX_MESSAGE_LEN - self.len;
        let mut take = s.len();
        if take > room {
            take = room;
            while !s.is_char_boundary(take) {
                take -= 1;
            }
            self.truncated = true;
        }

        self.buf[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        Ok(())
    }
}

impl fmt::Debug for BoundedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedMessage")
            .field("text", &self.as_str())
            .field("truncated", &self.truncated)
            .finish()
    }
}

impl fmt::Display for BoundedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// UTF-8 continuation byte (`10xxxxxx`).
#[inline]
const fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}
