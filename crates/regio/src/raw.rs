//! Low-level primitives for region backing memory.
//!
//! This is the only module in the crate that contains `unsafe` code. Every
//! `unsafe` block carries a `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::ptr::NonNull;

/// Alignment of every region buffer, matching what `malloc` guarantees on
/// common 64-bit targets. Offsets inside a region are not aligned.
pub const REGION_ALIGN: usize = 16;

/// Source of region backing memory.
///
/// Embedders implement this to redirect where regions come from (a pool,
/// a counting wrapper, a fault injector). The arena calls `allocate` once
/// per new region and `deallocate` once per region on free.
///
/// # Safety
///
/// The arena writes to and reads from every block it is given without
/// further checks, so an implementation must guarantee that a block
/// returned by [`allocate`](Self::allocate):
///
/// - is valid for reads and writes of `layout.size()` bytes,
/// - is aligned to `layout.align()`,
/// - is not accessed by anyone else until it is passed to
///   [`deallocate`](Self::deallocate).
///
/// Implementing the trait without `unsafe` is rejected:
///
/// ```compile_fail
/// use std::alloc::Layout;
/// use std::ptr::NonNull;
/// use regio::RegionAllocator;
///
/// struct Dangling;
///
/// impl RegionAllocator for Dangling {
///     fn allocate(&self, _: Layout) -> Option<NonNull<u8>> {
///         Some(NonNull::dangling())
///     }
///     unsafe fn deallocate(&self, _: NonNull<u8>, _: Layout) {}
/// }
/// ```
pub unsafe trait RegionAllocator {
    /// Allocate a block for `layout`, or `None` if memory is unavailable.
    ///
    /// The returned block may be uninitialised; the arena zero-fills it.
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Release a block previously returned by [`allocate`](Self::allocate).
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by `allocate` on this allocator with
    /// the same `layout`, and must not be used afterwards.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

// SAFETY: forwards to an allocator that upholds the contract itself.
unsafe impl<A: RegionAllocator + ?Sized> RegionAllocator for &A {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        (**self).allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded verbatim; the caller upholds the contract.
        unsafe { (**self).deallocate(ptr, layout) }
    }
}

/// The global Rust allocator (`std::alloc`).
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemAllocator;

// SAFETY: `std::alloc::alloc` returns blocks that satisfy `layout` and are
// owned by the caller; zero-sized requests get an aligned dangling pointer
// that is never dereferenced.
unsafe impl RegionAllocator for SystemAllocator {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        if layout.size() == 0 {
            return Some(dangling(layout));
        }
        // SAFETY: layout has non-zero size.
        NonNull::new(unsafe { alloc::alloc(layout) })
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() == 0 {
            return;
        }
        // SAFETY: caller guarantees ptr came from `allocate` with this layout.
        unsafe { alloc::dealloc(ptr.as_ptr(), layout) }
    }
}

fn dangling(layout: Layout) -> NonNull<u8> {
    // An aligned, non-null address that is never dereferenced for size 0.
    NonNull::new(layout.align() as *mut u8).unwrap_or(NonNull::dangling())
}

/// An owned, fully initialised byte buffer obtained from a [`RegionAllocator`].
///
/// The buffer does not free itself: it must be handed back with
/// [`release`](Self::release) to the allocator that produced it. Dropping it
/// without releasing leaks the memory but is otherwise sound.
pub(crate) struct RawBuffer {
    ptr: NonNull<u8>,
    layout: Layout,
}

// SAFETY: RawBuffer exclusively owns its block; nothing else aliases it.
unsafe impl Send for RawBuffer {}

impl RawBuffer {
    /// Allocate and zero-fill a buffer of `capacity` bytes.
    ///
    /// Returns `None` if the layout is not representable or the allocator
    /// is out of memory.
    pub(crate) fn new<A: RegionAllocator + ?Sized>(capacity: usize, allocator: &A) -> Option<Self> {
        let layout = Layout::from_size_align(capacity, REGION_ALIGN).ok()?;
        let ptr = allocator.allocate(layout)?;
        if capacity > 0 {
            // SAFETY: the `RegionAllocator` contract guarantees a writable,
            // exclusively owned block of `layout.size() == capacity` bytes.
            unsafe { ptr.as_ptr().write_bytes(0, capacity) };
        }
        Some(Self { ptr, layout })
    }

    /// Size of the buffer in bytes.
    pub(crate) fn len(&self) -> usize {
        self.layout.size()
    }

    /// Base address, for diagnostics only.
    pub(crate) fn base(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        // SAFETY: ptr is valid for len() initialised bytes (zero-filled in
        // `new`) and the returned borrow is tied to &self.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len()) }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: as above, and &mut self guarantees exclusivity.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len()) }
    }

    /// Return the memory to `allocator`.
    pub(crate) fn release<A: RegionAllocator + ?Sized>(self, allocator: &A) {
        // SAFETY: the buffer was produced by `allocator.allocate(self.layout)`
        // (the arena always pairs a buffer with the allocator that made it)
        // and `self` is consumed here.
        unsafe { allocator.deallocate(self.ptr, self.layout) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_zeroed_and_aligned() {
        let buf = RawBuffer::new(64, &SystemAllocator).unwrap();
        assert_eq!(buf.len(), 64);
        assert!(buf.as_slice().iter().all(|&b| b == 0));
        assert_eq!(buf.base() as usize % REGION_ALIGN, 0);
        buf.release(&SystemAllocator);
    }

    #[test]
    fn writes_are_visible_through_shared_slice() {
        let mut buf = RawBuffer::new(8, &SystemAllocator).unwrap();
        buf.as_mut_slice()[3] = 0xAB;
        assert_eq!(buf.as_slice()[3], 0xAB);
        buf.release(&SystemAllocator);
    }

    #[test]
    fn zero_sized_buffer_is_valid() {
        let buf = RawBuffer::new(0, &SystemAllocator).unwrap();
        assert!(buf.as_slice().is_empty());
        buf.release(&SystemAllocator);
    }

    /// Over-allocates from the system and hands out the aligned tail.
    struct Offsetting;

    const PAD: usize = REGION_ALIGN;

    // SAFETY: every block is a sub-range of a system block that is valid
    // for `PAD + size` bytes, and the offset keeps `REGION_ALIGN` alignment.
    unsafe impl RegionAllocator for Offsetting {
        fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
            let outer = Layout::from_size_align(layout.size() + PAD, layout.align()).ok()?;
            let base = SystemAllocator.allocate(outer)?;
            // SAFETY: base is valid for PAD + size bytes.
            NonNull::new(unsafe { base.as_ptr().add(PAD) })
        }

        unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
            let outer = Layout::from_size_align(layout.size() + PAD, layout.align())
                .expect("layout was valid when allocated");
            // SAFETY: reverses the offset applied in `allocate`.
            unsafe {
                let base = NonNull::new_unchecked(ptr.as_ptr().sub(PAD));
                SystemAllocator.deallocate(base, outer);
            }
        }
    }

    #[test]
    fn custom_allocator_blocks_are_used_as_given() {
        let mut buf = RawBuffer::new(32, &Offsetting).unwrap();
        assert_eq!(buf.base() as usize % REGION_ALIGN, 0);
        buf.as_mut_slice().fill(0x5A);
        assert!(buf.as_slice().iter().all(|&b| b == 0x5A));
        buf.release(&Offsetting);
    }

    #[test]
    fn unrepresentable_layout_returns_none() {
        assert!(RawBuffer::new(usize::MAX, &SystemAllocator).is_none());
    }
}
