//! # Arena Allocator
//!
//! A fixed-capacity bump allocator for transient data that is discarded all at once.

use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};

use bytemuck::Pod;

use crate::error::{ArenaError, ArenaResult};
use crate::units::{align8, ALIGNMENT};

/// Source of arena identities.
static NEXT_ARENA_ID: AtomicU64 = AtomicU64::new(0);

/// Handle to a region handed out by an [`Arena`].
///
/// Handles are plain values; the bytes are reached through
/// [`Arena::bytes`] and [`Arena::bytes_mut`]. A handle from before the
/// last [`Arena::reset`] no longer resolves, and neither does a handle
/// from another arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Allocation {
    /// Byte offset of the region in the arena, always a multiple of 8.
    offset: usize,
    /// Bytes requested.
    len: usize,
    /// Bytes consumed, `len` rounded up to 8.
    span: usize,
    /// Identity of the issuing arena.
    arena: u64,
    /// Arena epoch at allocation time.
    epoch: u64,
}

impl Allocation {
    /// Byte offset of the region.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes requested by the caller.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the region is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes consumed in the arena.
    #[inline]
    #[must_use]
    pub const fn span(&self) -> usize {
        self.span
    }

    /// Offset one past the consumed span, where the next allocation starts.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset + self.span
    }
}

/// A bump-pointer arena over one zero-initialized region.
///
/// Allocations are O(1): the request is rounded up to 8 bytes and the
/// `used` cursor advances. Individual regions are never freed; [`reset`]
/// reclaims everything at once and keeps the region.
///
/// Running out of capacity is **fatal** through [`allocate`]; use
/// [`try_allocate`] to observe the failure instead.
///
/// # Thread Safety
///
/// Every mutation takes `&mut self`, so one owner at a time. Hosts that
/// share an arena across threads must serialize access themselves.
///
/// # Example
///
/// ```rust,ignore
/// let mut arena = Arena::new(1024);
/// let a = arena.allocate(3);   // offset 0, consumes 8
/// let b = arena.allocate(16);  // offset 8, consumes 16
/// assert_eq!(arena.used(), 24);
/// arena.reset();
/// assert_eq!(arena.used(), 0);
/// ```
///
/// [`reset`]: Arena::reset
/// [`allocate`]: Arena::allocate
/// [`try_allocate`]: Arena::try_allocate
pub struct Arena {
    /// Backing storage. Words keep the base address 8-byte aligned.
    words: Box<[u64]>,
    /// Total capacity in bytes. Fixed at creation.
    capacity: usize,
    /// Bytes handed out. `used <= capacity`.
    used: usize,
    /// Identity stamped into every handle.
    id: u64,
    /// Bumped on every reset to retire old handles.
    epoch: u64,
}

impl Arena {
    /// Creates an arena of `capacity` zeroed bytes.
    ///
    /// # Panics
    ///
    /// Halts through the fatal path if the system allocator refuses the region.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(arena) => arena,
            Err(err) => crate::fatal!("Failed to allocate memory! {err}"),
        }
    }

    /// Creates an arena of `capacity` zeroed bytes.
    ///
    /// # Errors
    ///
    /// [`ArenaError::OutOfMemory`] if the region cannot be allocated.
    pub fn try_new(capacity: usize) -> ArenaResult<Self> {
        let word_count = capacity.div_ceil(ALIGNMENT);

        let mut words: Vec<u64> = Vec::new();
        words
            .try_reserve_exact(word_count)
            .map_err(|_| ArenaError::OutOfMemory { capacity })?;
        words.resize(word_count, 0);

        Ok(Self {
            words: words.into_boxed_slice(),
            capacity,
            used: 0,
            id: NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed),
            epoch: 0,
        })
    }

    /// Returns the total capacity in bytes.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the bytes handed out since creation or the last reset.
    #[inline]
    #[must_use]
    pub const fn used(&self) -> usize {
        self.used
    }

    /// Returns the remaining free space in bytes.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.capacity - self.used
    }

    /// Allocates `size` bytes, rounded up to 8.
    ///
    /// Zero-byte requests succeed and consume nothing.
    ///
    /// # Panics
    ///
    /// Halts through the fatal path when the request does not fit.
    pub fn allocate(&mut self, size: usize) -> Allocation {
        match self.try_allocate(size) {
            Ok(allocation) => allocation,
            Err(err) => crate::fatal!("Bump Allocator out of memory! {err}"),
        }
    }

    /// Allocates `size` bytes, rounded up to 8.
    ///
    /// On failure nothing changes.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::SizeOverflow`] if `size` cannot be aligned
    /// - [`ArenaError::CapacityExhausted`] if the aligned size does not fit
    pub fn try_allocate(&mut self, size: usize) -> ArenaResult<Allocation> {
        let aligned = align8(size).ok_or(ArenaError::SizeOverflow {
            count: size,
            elem_size: 1,
        })?;

        let end = self
            .used
            .checked_add(aligned)
            .filter(|&end| end <= self.capacity)
            .ok_or(ArenaError::CapacityExhausted {
                requested: size,
                aligned,
                used: self.used,
                capacity: self.capacity,
            })?;

        let allocation = Allocation {
            offset: self.used,
            len: size,
            span: aligned,
            arena: self.id,
            epoch: self.epoch,
        };
        self.used = end;
        Ok(allocation)
    }

    /// Allocates room for `count` values of `T`.
    ///
    /// # Panics
    ///
    /// Halts through the fatal path when the request does not fit or `T`
    /// needs more than 8-byte alignment.
    pub fn alloc_slice<T: Pod>(&mut self, count: usize) -> Allocation {
        match self.try_alloc_slice::<T>(count) {
            Ok(allocation) => allocation,
            Err(err) => crate::fatal!("Bump Allocator out of memory! {err}"),
        }
    }

    /// Allocates room for `count` values of `T`.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::UnsupportedAlignment`] if `T` needs more than 8-byte alignment
    /// - [`ArenaError::SizeOverflow`] if `count * size_of::<T>()` overflows
    /// - [`ArenaError::CapacityExhausted`] if the region does not fit
    pub fn try_alloc_slice<T: Pod>(&mut self, count: usize) -> ArenaResult<Allocation> {
        let align = std::mem::align_of::<T>();
        if align > ALIGNMENT {
            return Err(ArenaError::UnsupportedAlignment { align });
        }

        let elem_size = std::mem::size_of::<T>();
        let size = count
            .checked_mul(elem_size)
            .ok_or(ArenaError::SizeOverflow { count, elem_size })?;
        self.try_allocate(size)
    }

    /// The bytes of `allocation`.
    ///
    /// `None` for a handle retired by [`reset`](Arena::reset) or issued by
    /// another arena.
    #[must_use]
    pub fn bytes(&self, allocation: Allocation) -> Option<&[u8]> {
        let range = self.range_of(allocation)?;
        self.as_bytes().get(range)
    }

    /// The bytes of `allocation`, mutably, or `None` for a retired or foreign handle.
    #[must_use]
    pub fn bytes_mut(&mut self, allocation: Allocation) -> Option<&mut [u8]> {
        let range = self.range_of(allocation)?;
        let capacity = self.capacity;
        bytemuck::cast_slice_mut::<u64, u8>(&mut self.words)[..capacity].get_mut(range)
    }

    /// The region viewed as `T` values.
    ///
    /// `None` for a retired handle or when the length is not a whole number of `T`.
    #[must_use]
    pub fn typed<T: Pod>(&self, allocation: Allocation) -> Option<&[T]> {
        bytemuck::try_cast_slice(self.bytes(allocation)?).ok()
    }

    /// The region viewed as mutable `T` values.
    #[must_use]
    pub fn typed_mut<T: Pod>(&mut self, allocation: Allocation) -> Option<&mut [T]> {
        bytemuck::try_cast_slice_mut(self.bytes_mut(allocation)?).ok()
    }

    /// Resets the arena, retiring every handle.
    ///
    /// This is a **zero-cost** operation - the region is kept and not cleared.
    /// The epoch is 64-bit; it does not wrap within any realistic run.
    #[inline]
    pub fn reset(&mut self) {
        self.used = 0;
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Byte range of a live handle of this arena, within `[0, used)`.
    fn range_of(&self, allocation: Allocation) -> Option<Range<usize>> {
        if allocation.arena != self.id || allocation.epoch != self.epoch {
            return None;
        }
        let end = allocation.offset.checked_add(allocation.len)?;
        (end <= self.used).then_some(allocation.offset..end)
    }

    /// The whole region as bytes.
    fn as_bytes(&self) -> &[u8] {
        &bytemuck::cast_slice::<u64, u8>(&self.words)[..self.capacity]
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("id", &self.id)
            .field("capacity", &self.capacity)
            .field("used", &self.used)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}
