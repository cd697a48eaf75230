//! # Destinations
//!
//! The caller decides where file bytes live. A [`Destination`] is the
//! capability "give me N bytes, possibly failing"; reads and copies are
//! written once against it.
//!
//! | Destination | Handle | Empty files | Too little room |
//! |---|---|---|---|
//! | `[u8]` (caller buffer) | `()` | read, terminator only | `BufferTooSmall` |
//! | [`Arena`] | [`Allocation`] | declined, nothing allocated | fatal |

use kiln_core::{Allocation, Arena};

/// Storage that can grant a writable region for file content.
pub trait Destination {
    /// Identifies a granted region after the grant's borrow ends.
    type Handle: Copy;

    /// Bytes this destination can still grant.
    fn available(&self) -> usize;

    /// Grants exactly `len` writable bytes, or `None` if they do not fit.
    fn grant(&mut self, len: usize) -> Option<(Self::Handle, &mut [u8])>;

    /// The first `len` bytes of a granted region.
    fn view(&self, handle: Self::Handle, len: usize) -> Option<&[u8]>;

    /// Whether an empty file is read into this destination at all.
    fn accepts_empty(&self) -> bool {
        true
    }
}

impl Destination for [u8] {
    type Handle = ();

    #[inline]
    fn available(&self) -> usize {
        self.len()
    }

    fn grant(&mut self, len: usize) -> Option<((), &mut [u8])> {
        self.get_mut(..len).map(|region| ((), region))
    }

    fn view(&self, (): (), len: usize) -> Option<&[u8]> {
        self.get(..len)
    }
}

impl Destination for Arena {
    type Handle = Allocation;

    #[inline]
    fn available(&self) -> usize {
        self.remaining()
    }

    /// Bump-allocates `len` bytes. Exhaustion halts, it never returns `None`.
    fn grant(&mut self, len: usize) -> Option<(Allocation, &mut [u8])> {
        let allocation = self.allocate(len);
        let region = self.bytes_mut(allocation)?;
        Some((allocation, region))
    }

    fn view(&self, handle: Allocation, len: usize) -> Option<&[u8]> {
        self.bytes(handle)?.get(..len)
    }

    /// An empty file costs no arena space.
    fn accepts_empty(&self) -> bool {
        false
    }
}

/// Result of reading a file into a [`Destination`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileContents<H> {
    /// Region holding the content and its terminator.
    pub handle: H,
    /// Content bytes read, excluding the terminator.
    pub size: usize,
}

impl<H: Copy> FileContents<H> {
    /// The content bytes, without the terminator.
    #[must_use]
    pub fn bytes<'d, D>(&self, dest: &'d D) -> Option<&'d [u8]>
    where
        D: Destination<Handle = H> + ?Sized,
    {
        dest.view(self.handle, self.size)
    }

    /// The content bytes followed by the zero terminator.
    #[must_use]
    pub fn bytes_with_nul<'d, D>(&self, dest: &'d D) -> Option<&'d [u8]>
    where
        D: Destination<Handle = H> + ?Sized,
    {
        dest.view(self.handle, self.size + 1)
    }

    /// The content as UTF-8 text, `None` if it is not valid UTF-8.
    #[must_use]
    pub fn text<'d, D>(&self, dest: &'d D) -> Option<&'d str>
    where
        D: Destination<Handle = H> + ?Sized,
    {
        std::str::from_utf8(self.bytes(dest)?).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_grants_prefix() {
        let mut buffer = [7u8; 16];
        let dest: &mut [u8] = &mut buffer;
        assert_eq!(dest.available(), 16);

        let ((), region) = dest.grant(4).unwrap();
        assert_eq!(region.len(), 4);
        assert!(dest.grant(17).is_none());
        assert!(dest.accepts_empty());
    }

    #[test]
    fn test_arena_grant_bumps() {
        let mut arena = Arena::new(64);
        let (allocation, region) = arena.grant(5).unwrap();
        region.copy_from_slice(b"hello");

        assert_eq!(arena.used(), 8);
        assert_eq!(arena.view(allocation, 5), Some(&b"hello"[..]));
        assert!(arena.view(allocation, 6).is_none());
        assert!(!arena.accepts_empty());
    }

    #[test]
    fn test_contents_views() {
        let buffer = *b"abc\0zzzz";
        let contents = FileContents { handle: (), size: 3 };
        let dest: &[u8] = &buffer;

        assert_eq!(contents.bytes(dest), Some(&b"abc"[..]));
        assert_eq!(contents.bytes_with_nul(dest), Some(&b"abc\0"[..]));
        assert_eq!(contents.text(dest), Some("abc"));
    }

    #[test]
    #[should_panic(expected = "Bump Allocator out of memory")]
    fn test_arena_grant_exhaustion_is_fatal() {
        let mut arena = Arena::new(8);
        let _ = arena.grant(9);
    }
}
