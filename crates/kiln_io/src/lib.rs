//! # KILN File I/O
//!
//! Blocking file access whose destination memory is chosen by the caller.
//!
//! ## Design Principles
//!
//! 1. **Caller owns placement** - bytes land in a caller buffer or the transient arena
//! 2. **Always terminated** - every read leaves a zero byte after the content
//! 3. **File errors are reported, not fatal** - logged, then `false`/`0`/`None`
//! 4. **Not atomic** - a copy is a read followed by a write, with no rollback
//!
//! ## Example
//!
//! ```rust,ignore
//! use kiln_core::{Arena, units::mb};
//!
//! let mut transient = Arena::new(mb(50));
//! if let Some(shader) = kiln_io::read_into_arena("shaders/quad.vert", &mut transient) {
//!     let source = transient.bytes(shader).unwrap();
//!     // source ends with b'\0'
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod destination;
pub mod error;
pub mod file;
pub mod watch;

pub use destination::{Destination, FileContents};
pub use error::{FileError, FileResult};
pub use file::{
    copy, exists, modified_time, read, read_into_arena, size, try_copy, try_read, try_size,
    try_write, write,
};
pub use watch::FileStamp;
