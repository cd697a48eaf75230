//! # KILN Core
//!
//! Transient memory for a real-time application bootstrap:
//! - One zero-initialized region allocated at startup
//! - O(1) bump allocation, 8-byte aligned, never freed individually
//! - Bulk reclamation through an explicit reset
//!
//! ## Failure Rules
//!
//! 1. **Out of memory is fatal** - arena creation and `allocate` log an error and halt
//! 2. **Logging never allocates for the message** - messages are rendered into a bounded stack buffer
//! 3. **Single owner** - an arena belongs to one thread; hosts serialize access themselves
//!
//! ## Example
//!
//! ```rust,ignore
//! use kiln_core::{Arena, units::mb};
//!
//! let mut transient = Arena::new(mb(50));
//! let scratch = transient.allocate(256);
//! transient.bytes_mut(scratch).unwrap()[0] = 1;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod log;
pub mod memory;
pub mod units;

pub use error::{ArenaError, ArenaResult};
pub use log::{fatal, Logger, Severity};
pub use memory::{Allocation, Arena};
