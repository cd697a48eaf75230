//! # File Error Types
//!
//! All errors that can occur in the file layer. The sentinel operations log
//! these and return `false`/`0`/`None`; the `try_*` operations return them.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while accessing files.
#[derive(Error, Debug)]
pub enum FileError {
    /// The file could not be opened.
    #[error("Failed to open file: {}: {source}", .path.display())]
    Open {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying OS error.
        source: io::Error,
    },

    /// The file's metadata could not be queried.
    #[error("Failed to query file: {}: {source}", .path.display())]
    Metadata {
        /// Path that was queried.
        path: PathBuf,
        /// Underlying OS error.
        source: io::Error,
    },

    /// The path does not name a regular file.
    #[error("Not a regular file: {}", .path.display())]
    NotAFile {
        /// Offending path.
        path: PathBuf,
    },

    /// Reading the content failed part way.
    #[error("Failed to read file: {}: {source}", .path.display())]
    Read {
        /// Path being read.
        path: PathBuf,
        /// Underlying OS error.
        source: io::Error,
    },

    /// Writing the content failed part way.
    #[error("Failed to write to file: {}: {source}", .path.display())]
    Write {
        /// Path being written.
        path: PathBuf,
        /// Underlying OS error.
        source: io::Error,
    },

    /// The destination cannot hold the content plus its terminator.
    #[error("Buffer too small for {}: need {needed} bytes, have {available}", .path.display())]
    BufferTooSmall {
        /// Path being read.
        path: PathBuf,
        /// Content size plus one terminator byte.
        needed: usize,
        /// Bytes the destination offered.
        available: usize,
    },

    /// The file is empty and the destination does not take empty files.
    #[error("File is empty: {}", .path.display())]
    Empty {
        /// Path being read.
        path: PathBuf,
    },

    /// The file is larger than this platform can address.
    #[error("File too large: {}: {size} bytes", .path.display())]
    TooLarge {
        /// Path being read.
        path: PathBuf,
        /// Reported size.
        size: u64,
    },
}

impl FileError {
    /// Whether the sentinel operations report this error on the console.
    ///
    /// An empty file read into an arena is a normal outcome, not a failure.
    #[must_use]
    pub const fn is_reported(&self) -> bool {
        !matches!(self, Self::Empty { .. })
    }
}

/// Result type for file operations.
pub type FileResult<T> = Result<T, FileError>;
