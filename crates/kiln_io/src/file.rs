//! # File Operations
//!
//! Stateless, blocking file access. Each operation comes twice:
//!
//! - `try_*` returns a [`FileError`]
//! - the plain form logs the error and returns a sentinel (`false`, `0`, `None`)
//!
//! File errors never halt. Only an arena running out of space does, inside
//! [`Destination::grant`].

use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use std::time::SystemTime;

use kiln_core::{log_error, log_warn, Allocation, Arena};

use crate::destination::{Destination, FileContents};
use crate::error::{FileError, FileResult};

/// Whether `path` can be opened for reading right now.
///
/// Never fails and never mutates; the probe handle is closed before returning.
#[must_use]
pub fn exists(path: impl AsRef<Path>) -> bool {
    File::open(path.as_ref()).is_ok()
}

/// Size of the file at `path` in bytes.
///
/// # Errors
///
/// [`FileError::Open`] if it cannot be opened, [`FileError::Metadata`] or
/// [`FileError::NotAFile`] if its size cannot be determined.
pub fn try_size(path: impl AsRef<Path>) -> FileResult<u64> {
    let path = path.as_ref();
    let file = open(path)?;
    regular_len(&file, path)
}

/// Size of the file at `path` in bytes, `0` (logged) if it cannot be opened.
#[must_use]
pub fn size(path: impl AsRef<Path>) -> u64 {
    try_size(path).unwrap_or_else(|err| {
        log_error!("{err}");
        0
    })
}

/// Last modification time of `path`, `None` if it cannot be queried.
///
/// Nothing is logged: callers poll this for hot reload.
#[must_use]
pub fn modified_time(path: impl AsRef<Path>) -> Option<SystemTime> {
    fs::metadata(path.as_ref()).and_then(|meta| meta.modified()).ok()
}

/// Reads the whole file at `path` into `dest`.
///
/// The destination is asked for exactly `size + 1` bytes. That region is
/// cleared before filling, so the byte after the content is always zero.
///
/// # Errors
///
/// - [`FileError::Open`] / [`FileError::Metadata`] / [`FileError::NotAFile`] before anything is granted
/// - [`FileError::Empty`] if the file is empty and `dest` declines empty files
/// - [`FileError::BufferTooSmall`] if `dest` cannot grant `size + 1` bytes
/// - [`FileError::Read`] if reading fails after the grant
pub fn try_read<D>(path: impl AsRef<Path>, dest: &mut D) -> FileResult<FileContents<D::Handle>>
where
    D: Destination + ?Sized,
{
    let path = path.as_ref();
    let mut file = open(path)?;
    let len = regular_len(&file, path)?;
    let size = usize::try_from(len).map_err(|_| FileError::TooLarge {
        path: path.to_path_buf(),
        size: len,
    })?;

    if size == 0 && !dest.accepts_empty() {
        return Err(FileError::Empty {
            path: path.to_path_buf(),
        });
    }

    let needed = size.checked_add(1).ok_or(FileError::TooLarge {
        path: path.to_path_buf(),
        size: len,
    })?;
    let available = dest.available();
    let Some((handle, region)) = dest.grant(needed) else {
        return Err(FileError::BufferTooSmall {
            path: path.to_path_buf(),
            needed,
            available,
        });
    };

    region.fill(0);
    let read = fill(&mut file, &mut region[..size]).map_err(|source| FileError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(FileContents { handle, size: read })
}

/// Reads the whole file at `path` into `dest`, `None` (logged) on failure.
///
/// An empty file declined by the destination yields `None` without a log line.
pub fn read<D>(path: impl AsRef<Path>, dest: &mut D) -> Option<FileContents<D::Handle>>
where
    D: Destination + ?Sized,
{
    try_read(path, dest).map_err(report).ok()
}

/// Reads the whole file at `path` into a fresh arena region of `size + 1` bytes.
///
/// Returns `None` and allocates nothing if the file is empty or cannot be
/// opened (the latter is logged). The returned allocation's last byte is zero.
/// If the file shrank after its size was taken, the bytes between the content
/// and the terminator are zero too; use [`read`] to get the content length.
///
/// # Panics
///
/// Halts through the fatal path if the arena cannot hold the file.
pub fn read_into_arena(path: impl AsRef<Path>, arena: &mut Arena) -> Option<Allocation> {
    read(path, arena).map(|contents| contents.handle)
}

/// Creates or truncates `path` and writes `bytes` to it.
///
/// # Errors
///
/// [`FileError::Open`] if the file cannot be created, [`FileError::Write`]
/// if writing fails.
pub fn try_write(path: impl AsRef<Path>, bytes: &[u8]) -> FileResult<()> {
    let path = path.as_ref();
    let mut file = File::create(path).map_err(|source| FileError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    file.write_all(bytes)
        .and_then(|()| file.flush())
        .map_err(|source| FileError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// Creates or truncates `path` and writes `bytes` to it; `false` (logged) on failure.
pub fn write(path: impl AsRef<Path>, bytes: &[u8]) -> bool {
    try_write(path, bytes).map_err(report).is_ok()
}

/// Copies `source` to `target` by reading it into `dest` and writing it out.
///
/// Not atomic: a failed write may leave a partial `target` behind. A failed
/// read leaves `target` untouched. Returns the bytes copied.
///
/// # Errors
///
/// Any error of [`try_read`] for `source` or [`try_write`] for `target`.
pub fn try_copy<D>(
    source: impl AsRef<Path>,
    target: impl AsRef<Path>,
    dest: &mut D,
) -> FileResult<usize>
where
    D: Destination + ?Sized,
{
    let source = source.as_ref();
    let contents = try_read(source, dest)?;
    let bytes = contents.bytes(&*dest).unwrap_or_default();
    try_write(target, bytes)?;
    Ok(contents.size)
}

/// Copies `source` to `target` through `dest`; `false` (logged) on failure.
pub fn copy<D>(source: impl AsRef<Path>, target: impl AsRef<Path>, dest: &mut D) -> bool
where
    D: Destination + ?Sized,
{
    match try_copy(source, target, dest) {
        Ok(_) => true,
        Err(err @ FileError::Empty { .. }) => {
            log_warn!("Nothing to copy: {err}");
            false
        }
        Err(err) => {
            report(err);
            false
        }
    }
}

/// Opens `path` for reading.
fn open(path: &Path) -> FileResult<File> {
    File::open(path).map_err(|source| FileError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Length of an open regular file.
fn regular_len(file: &File, path: &Path) -> FileResult<u64> {
    let meta = file.metadata().map_err(|source| FileError::Metadata {
        path: path.to_path_buf(),
        source,
    })?;
    if !meta.is_file() {
        return Err(FileError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    Ok(meta.len())
}

/// Reads until `region` is full or the file ends. Returns the bytes read.
fn fill(file: &mut File, region: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < region.len() {
        match file.read(&mut region[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}

/// Logs `err` if it is worth reporting.
fn report(err: FileError) {
    if err.is_reported() {
        log_error!("{err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scratch() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    #[test]
    fn test_exists() {
        let dir = scratch();
        let path = dir.path().join("present.txt");
        assert!(!exists(&path));

        fs::write(&path, b"x").unwrap();
        assert!(exists(&path));
    }

    #[test]
    fn test_size() {
        let dir = scratch();
        let path = dir.path().join("data.bin");
        fs::write(&path, [1u8; 37]).unwrap();

        assert_eq!(size(&path), 37);
        assert_eq!(size(dir.path().join("missing.bin")), 0);
        assert!(matches!(
            try_size(dir.path().join("missing.bin")),
            Err(FileError::Open { .. })
        ));
    }

    #[test]
    fn test_size_of_directory_is_refused() {
        let dir = scratch();
        assert!(matches!(try_size(dir.path()), Err(FileError::NotAFile { .. })));
        assert_eq!(size(dir.path()), 0);
    }

    #[test]
    fn test_read_into_buffer_clears_and_terminates() {
        let dir = scratch();
        let path = dir.path().join("shader.vert");
        fs::write(&path, b"void main(){}").unwrap();

        let mut buffer = [0xFFu8; 32];
        let contents = read(&path, &mut buffer[..]).unwrap();

        assert_eq!(contents.size, 13);
        assert_eq!(&buffer[..13], b"void main(){}");
        assert_eq!(buffer[13], 0);
        // Bytes past size + 1 are not the read's business.
        assert_eq!(buffer[14], 0xFF);
    }

    #[test]
    fn test_read_into_small_buffer_is_refused() {
        let dir = scratch();
        let path = dir.path().join("big.txt");
        fs::write(&path, b"0123456789").unwrap();

        let mut buffer = [0xEEu8; 10];
        let err = try_read(&path, &mut buffer[..]).unwrap_err();
        assert!(matches!(
            err,
            FileError::BufferTooSmall {
                needed: 11,
                available: 10,
                ..
            }
        ));
        assert!(buffer.iter().all(|&b| b == 0xEE));
        assert!(read(&path, &mut buffer[..]).is_none());
    }

    #[test]
    fn test_read_missing_leaves_buffer() {
        let dir = scratch();
        let mut buffer = [0x11u8; 8];
        assert!(read(dir.path().join("nope"), &mut buffer[..]).is_none());
        assert!(buffer.iter().all(|&b| b == 0x11));
    }

    #[test]
    fn test_read_empty_file_into_buffer() {
        let dir = scratch();
        let path = dir.path().join("empty");
        fs::write(&path, b"").unwrap();

        let mut buffer = [0x22u8; 4];
        let contents = read(&path, &mut buffer[..]).unwrap();
        assert_eq!(contents.size, 0);
        assert_eq!(buffer[0], 0);
    }

    #[test]
    fn test_read_into_arena() {
        let dir = scratch();
        let path = dir.path().join("level.txt");
        fs::write(&path, b"abc").unwrap();

        let mut arena = Arena::new(64);
        let allocation = read_into_arena(&path, &mut arena).unwrap();

        assert_eq!(allocation.len(), 4);
        assert_eq!(arena.bytes(allocation), Some(&b"abc\0"[..]));
        assert_eq!(arena.used(), 8);
    }

    #[test]
    fn test_read_into_arena_empty_or_missing_allocates_nothing() {
        let dir = scratch();
        let empty = dir.path().join("empty");
        fs::write(&empty, b"").unwrap();

        let mut arena = Arena::new(64);
        assert!(read_into_arena(&empty, &mut arena).is_none());
        assert!(read_into_arena(dir.path().join("missing"), &mut arena).is_none());
        assert_eq!(arena.used(), 0);
        assert!(matches!(
            try_read(&empty, &mut arena),
            Err(FileError::Empty { .. })
        ));
    }

    #[test]
    #[should_panic(expected = "Bump Allocator out of memory")]
    fn test_read_into_full_arena_is_fatal() {
        let dir = scratch();
        let path = dir.path().join("big.bin");
        fs::write(&path, [0u8; 64]).unwrap();

        let mut arena = Arena::new(64);
        let _ = read_into_arena(&path, &mut arena);
    }

    #[test]
    fn test_write_creates_and_truncates() {
        let dir = scratch();
        let path = dir.path().join("out.txt");

        assert!(write(&path, b"first version"));
        assert!(write(&path, b"second"));
        assert_eq!(fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = scratch();
        let path = dir.path().join("no_such_dir").join("out.txt");

        assert!(!write(&path, b"data"));
        assert!(matches!(try_write(&path, b"data"), Err(FileError::Open { .. })));
    }

    #[test]
    fn test_copy_through_buffer_and_arena() {
        let dir = scratch();
        let source = dir.path().join("source.bin");
        let content: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        fs::write(&source, &content).unwrap();

        let mut buffer = vec![0u8; 2048];
        let via_buffer = dir.path().join("via_buffer.bin");
        assert!(copy(&source, &via_buffer, buffer.as_mut_slice()));
        assert_eq!(fs::read(&via_buffer).unwrap(), content);

        let mut arena = Arena::new(4096);
        let via_arena = dir.path().join("via_arena.bin");
        assert_eq!(try_copy(&source, &via_arena, &mut arena).unwrap(), 1000);
        assert_eq!(fs::read(&via_arena).unwrap(), content);
    }

    #[test]
    fn test_copy_failed_read_leaves_target_untouched() {
        let dir = scratch();
        let target = dir.path().join("target.txt");
        fs::write(&target, b"keep me").unwrap();

        let mut arena = Arena::new(64);
        assert!(!copy(dir.path().join("missing"), &target, &mut arena));
        assert_eq!(fs::read(&target).unwrap(), b"keep me");
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn test_copy_empty_source() {
        let dir = scratch();
        let source = dir.path().join("empty");
        fs::write(&source, b"").unwrap();

        let mut arena = Arena::new(64);
        assert!(!copy(&source, dir.path().join("a"), &mut arena));
        assert!(!dir.path().join("a").exists());

        let mut buffer = [0u8; 1];
        assert!(copy(&source, dir.path().join("b"), &mut buffer[..]));
        assert_eq!(fs::read(dir.path().join("b")).unwrap(), b"");
    }
}
