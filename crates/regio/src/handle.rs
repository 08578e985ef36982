//! Allocation handles.
//!
//! An [`Allocation`] records where a byte range lives inside the arena. It is
//! generation-scoped: the arena bumps its generation on every reset and free,
//! so a handle from before either is detected in O(1) when resolved. It also
//! carries the id of the arena that issued it, so a handle presented to a
//! different arena is rejected rather than aliasing that arena's bytes.

use std::fmt;

/// Location of a byte range handed out by [`Arena::alloc`](crate::Arena::alloc).
///
/// Handles do not own memory and may be freely copied. Resolve them with
/// [`Arena::get`](crate::Arena::get) or [`Arena::get_mut`](crate::Arena::get_mut).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Allocation {
    /// Process-unique id of the issuing arena.
    pub(crate) arena: u64,
    /// Arena generation when this allocation was made.
    pub(crate) generation: u64,
    /// Index of the region in the chain.
    pub(crate) region: usize,
    /// Byte offset within the region.
    pub(crate) offset: usize,
    /// Length in bytes.
    pub(crate) len: usize,
}

impl Allocation {
    pub(crate) fn new(
        arena: u64,
        generation: u64,
        region: usize,
        offset: usize,
        len: usize,
    ) -> Self {
        Self {
            arena,
            generation,
            region,
            offset,
            len,
        }
    }

    /// Id of the arena that issued this handle.
    pub fn arena_id(&self) -> u64 {
        self.arena
    }

    /// The arena generation this handle belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Index of the region holding the bytes (0 is the head).
    pub fn region(&self) -> usize {
        self.region
    }

    /// Byte offset within the region.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether this is a zero-byte allocation.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The half-open byte range within the region.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.len
    }
}

impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Allocation(arena={}, gen={}, region={}, off={}, len={})",
            self.arena, self.generation, self.region, self.offset, self.len
        )
    }
}
