//! # Memory Management
//!
//! Transient storage for the host application.
//!
//! ## Design Philosophy
//!
//! All memory is allocated once at startup. Afterwards:
//! - No heap allocations, only bumps of a cursor
//! - No per-allocation free
//! - Bulk reclamation when the owning phase ends

mod arena;

pub use arena::{Allocation, Arena};
