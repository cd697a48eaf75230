//! # Modification Stamps
//!
//! Polling-based change detection for hot reload. The host keeps one
//! [`FileStamp`] per watched asset and asks it once per frame.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::file::modified_time;

/// Last observed modification time of one file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileStamp {
    /// Watched path.
    path: PathBuf,
    /// Timestamp at the last poll, `None` while the file cannot be queried.
    last_seen: Option<SystemTime>,
}

impl FileStamp {
    /// Starts watching `path` from its current state.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let last_seen = modified_time(&path);
        Self { path, last_seen }
    }

    /// The watched path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Timestamp seen by the last poll.
    #[must_use]
    pub const fn last_seen(&self) -> Option<SystemTime> {
        self.last_seen
    }

    /// Polls the file; `true` if its timestamp moved since the last poll.
    ///
    /// Appearing and disappearing both count as a change.
    pub fn changed(&mut self) -> bool {
        let now = modified_time(&self.path);
        if now == self.last_seen {
            return false;
        }
        self.last_seen = now;
        true
    }
}
