//! Byte-size units and alignment.

/// Alignment of every arena allocation, in bytes.
pub const ALIGNMENT: usize = 8;

/// `n` kibibytes.
#[inline]
#[must_use]
pub const fn kb(n: usize) -> usize {
    1024 * n
}

/// `n` mebibytes.
#[inline]
#[must_use]
pub const fn mb(n: usize) -> usize {
    1024 * kb(n)
}

/// `n` gibibytes.
#[inline]
#[must_use]
pub const fn gb(n: usize) -> usize {
    1024 * mb(n)
}

/// Rounds `size` up to the next multiple of [`ALIGNMENT`].
///
/// Returns `None` when the rounded value does not fit in `usize`.
#[inline]
#[must_use]
pub const fn align8(size: usize) -> Option<usize> {
    match size.checked_add(ALIGNMENT - 1) {
        Some(padded) => Some(padded & !(ALIGNMENT - 1)),
        None => None,
    }
}
