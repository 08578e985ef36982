//! Fixed-capacity regions and their inspection records.
//!
//! A [`Region`] is a contiguous byte buffer with a bump cursor. Regions are
//! created on demand by the [`Arena`](crate::Arena), reset in bulk, and
//! released only when the arena is freed.

use std::fmt;

use crate::raw::{RawBuffer, RegionAllocator};

/// A single contiguous byte buffer with bump allocation.
///
/// Bytes in `[0, used)` are live; bytes in `[used, capacity)` are free.
/// `capacity` is fixed at creation and `used <= capacity` always holds.
pub struct Region {
    /// Backing storage. Allocated to full capacity at creation.
    data: RawBuffer,
    /// Bump pointer: number of bytes handed out.
    used: usize,
}

impl Region {
    /// Create an empty region of exactly `capacity` bytes.
    ///
    /// Returns `None` if the allocator cannot supply the memory.
    pub(crate) fn new<A: RegionAllocator + ?Sized>(capacity: usize, allocator: &A) -> Option<Self> {
        let data = RawBuffer::new(capacity, allocator)?;
        Some(Self { data, used: 0 })
    }

    /// Create a region of at least `floor` bytes whose first `bytes` bytes
    /// are already handed out.
    ///
    /// The capacity is `max(bytes, floor)`, so the claim always fits.
    pub(crate) fn with_first<A: RegionAllocator + ?Sized>(
        bytes: usize,
        floor: usize,
        allocator: &A,
    ) -> Option<Self> {
        let mut region = Self::new(bytes.max(floor), allocator)?;
        region.used = bytes;
        Some(region)
    }

    /// Whether `bytes` more bytes fit after the cursor.
    pub fn fits(&self, bytes: usize) -> bool {
        bytes <= self.remaining()
    }

    /// Bump the cursor by `bytes`.
    ///
    /// Returns the offset of the carved-out range (the cursor before the
    /// bump), or `None` if there is insufficient remaining capacity.
    pub(crate) fn bump(&mut self, bytes: usize) -> Option<usize> {
        if !self.fits(bytes) {
            return None;
        }
        let offset = self.used;
        self.used += bytes;
        Some(offset)
    }

    /// Get a shared slice at the given offset and length.
    ///
    /// Returns `None` if the range extends past the live bytes.
    pub fn slice(&self, offset: usize, len: usize) -> Option<&[u8]> {
        let end = offset.checked_add(len)?;
        if end > self.used {
            return None;
        }
        self.data.as_slice().get(offset..end)
    }

    /// Get a mutable slice at the given offset and length.
    ///
    /// Returns `None` if the range extends past the live bytes.
    pub fn slice_mut(&mut self, offset: usize, len: usize) -> Option<&mut [u8]> {
        let end = offset.checked_add(len)?;
        if end > self.used {
            return None;
        }
        self.data.as_mut_slice().get_mut(offset..end)
    }

    /// Reset the bump pointer to zero without deallocating.
    ///
    /// The backing memory keeps its contents.
    pub(crate) fn reset(&mut self) {
        self.used = 0;
    }

    /// Number of bytes currently handed out.
    pub fn used(&self) -> usize {
        self.used
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Remaining free capacity in bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.used
    }

    /// Base address of the backing buffer.
    pub fn base(&self) -> *const u8 {
        self.data.base()
    }

    /// Hand the backing memory back to `allocator`.
    pub(crate) fn release<A: RegionAllocator + ?Sized>(self, allocator: &A) {
        self.data.release(allocator);
    }
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region")
            .field("used", &self.used)
            .field("capacity", &self.capacity())
            .field("data", &self.base())
            .finish()
    }
}

/// Snapshot of one region's metadata, for inspection and debugging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionInfo {
    /// Position of the region in the chain (0 is the head).
    pub index: usize,
    /// Bytes handed out.
    pub used: usize,
    /// Total bytes.
    pub capacity: usize,
    /// Whether the arena's tail cursor currently points here.
    pub is_tail: bool,
    /// Base address of the backing buffer.
    pub base: *const u8,
}

impl RegionInfo {
    pub(crate) fn of(index: usize, region: &Region, is_tail: bool) -> Self {
        Self {
            index,
            used: region.used(),
            capacity: region.capacity(),
            is_tail,
            base: region.base(),
        }
    }
}

impl fmt::Display for RegionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Region #{}:{}",
            self.index + 1,
            if self.is_tail { " (tail)" } else { "" }
        )?;
        writeln!(f, "    used     = {}", self.used)?;
        writeln!(f, "    capacity = {}", self.capacity)?;
        write!(f, "    data     = {:?}", self.base)
    }
}
