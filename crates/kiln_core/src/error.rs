//! # Arena Error Types
//!
//! Every way the transient arena can refuse a request. The infallible
//! entry points turn these into a fatal halt; the `try_*` twins return them.

use thiserror::Error;

/// Errors that can occur while creating or allocating from an arena.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArenaError {
    /// The system allocator could not provide the backing region.
    #[error("failed to allocate arena region of {capacity} bytes")]
    OutOfMemory {
        /// Requested capacity in bytes.
        capacity: usize,
    },

    /// The request does not fit in the remaining capacity.
    #[error("arena out of memory: requested {requested} ({aligned} aligned), used {used} of {capacity}")]
    CapacityExhausted {
        /// Bytes requested by the caller.
        requested: usize,
        /// Requested size rounded up to the arena alignment.
        aligned: usize,
        /// Bytes already handed out.
        used: usize,
        /// Total arena capacity.
        capacity: usize,
    },

    /// Typed allocation for a type the arena cannot align.
    #[error("unsupported alignment: {align} bytes (arena aligns to 8)")]
    UnsupportedAlignment {
        /// Alignment required by the type.
        align: usize,
    },

    /// The requested size overflows once aligned or multiplied out.
    #[error("allocation size overflow: {count} x {elem_size} bytes")]
    SizeOverflow {
        /// Number of elements requested.
        count: usize,
        /// Size of one element in bytes (1 for raw byte requests).
        elem_size: usize,
    },
}

/// Result type for arena operations.
pub type ArenaResult<T> = Result<T, ArenaError>;
