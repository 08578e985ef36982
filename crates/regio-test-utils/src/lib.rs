//! Test allocators and fixtures for regio development.
//!
//! Provides [`RegionAllocator`] doubles that count calls
//! ([`CountingAllocator`]) or refuse memory on demand ([`FailingAllocator`]),
//! plus the canonical 400-byte scenario arena used across integration tests.

#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

use std::alloc::Layout;
use std::cell::{Cell, RefCell};
use std::ptr::NonNull;

use regio::{Arena, ArenaConfig, RegionAllocator, SystemAllocator};

/// Default region capacity used by the scenario fixtures.
pub const SCENARIO_REGION_CAPACITY: usize = 400;

/// Build an arena on `allocator` with the scenario region capacity.
pub fn scenario_arena<A: RegionAllocator>(allocator: A) -> Arena<A> {
    Arena::with_allocator(ArenaConfig::new(SCENARIO_REGION_CAPACITY), allocator)
}

/// `(used, capacity)` for every region, head first.
pub fn region_shape<A: RegionAllocator>(arena: &Arena<A>) -> Vec<(usize, usize)> {
    arena.regions().map(|r| (r.used, r.capacity)).collect()
}

/// Wraps [`SystemAllocator`] and records every call.
///
/// Use a shared reference (`&CountingAllocator`) as the arena's allocator to
/// keep inspecting the counters while the arena is alive.
#[derive(Default)]
pub struct CountingAllocator {
    allocations: Cell<usize>,
    deallocations: Cell<usize>,
    /// Sizes of the layouts passed to `allocate`, in call order.
    sizes: RefCell<Vec<usize>>,
}

impl CountingAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `allocate` calls.
    pub fn allocations(&self) -> usize {
        self.allocations.get()
    }

    /// Number of `deallocate` calls.
    pub fn deallocations(&self) -> usize {
        self.deallocations.get()
    }

    /// Blocks handed out and not yet returned.
    pub fn live(&self) -> usize {
        self.allocations() - self.deallocations()
    }

    /// Requested block sizes, in call order.
    pub fn sizes(&self) -> Vec<usize> {
        self.sizes.borrow().clone()
    }
}

// SAFETY: every block comes straight from `SystemAllocator`.
#[allow(unsafe_code)]
unsafe impl RegionAllocator for CountingAllocator {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        let ptr = SystemAllocator.allocate(layout)?;
        self.allocations.set(self.allocations.get() + 1);
        self.sizes.borrow_mut().push(layout.size());
        Some(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.deallocations.set(self.deallocations.get() + 1);
        // SAFETY: ptr came from SystemAllocator.allocate(layout) above.
        unsafe { SystemAllocator.deallocate(ptr, layout) }
    }
}

/// A [`CountingAllocator`] that refuses memory once a budget is spent.
///
/// `FailingAllocator::after(n)` grants the first `n` allocations and fails
/// every one after that until [`set_budget`](Self::set_budget) is called.
pub struct FailingAllocator {
    inner: CountingAllocator,
    budget: Cell<usize>,
    refused: Cell<usize>,
}

impl FailingAllocator {
    /// Grant `successes` allocations, then fail.
    pub fn after(successes: usize) -> Self {
        Self {
            inner: CountingAllocator::new(),
            budget: Cell::new(successes),
            refused: Cell::new(0),
        }
    }

    /// Fail every allocation.
    pub fn always() -> Self {
        Self::after(0)
    }

    /// Replace the remaining budget.
    pub fn set_budget(&self, successes: usize) {
        self.budget.set(successes);
    }

    /// Number of refused `allocate` calls.
    pub fn refused(&self) -> usize {
        self.refused.get()
    }

    /// The underlying counters.
    pub fn counts(&self) -> &CountingAllocator {
        &self.inner
    }
}

// SAFETY: every block comes from the wrapped `CountingAllocator`.
#[allow(unsafe_code)]
unsafe impl RegionAllocator for FailingAllocator {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        match self.budget.get() {
            0 => {
                self.refused.set(self.refused.get() + 1);
                None
            }
            n => {
                self.budget.set(n - 1);
                self.inner.allocate(layout)
            }
        }
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded to the allocator that produced ptr.
        unsafe { self.inner.deallocate(ptr, layout) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counting_allocator_tracks_lifecycle() {
        let counter = CountingAllocator::new();
        {
            let mut arena = scenario_arena(&counter);
            arena.alloc(10).unwrap();
            arena.alloc(1000).unwrap();
            assert_eq!(counter.allocations(), 2);
            assert_eq!(counter.live(), 2);
        }
        assert_eq!(counter.deallocations(), 2);
        assert_eq!(counter.sizes(), vec![400, 1000]);
    }

    #[test]
    fn failing_allocator_honours_budget() {
        let failing = FailingAllocator::after(1);
        let mut arena = scenario_arena(&failing);
        assert!(arena.alloc(400).is_ok());
        assert!(arena.alloc(1).is_err());
        assert_eq!(failing.refused(), 1);

        failing.set_budget(1);
        assert!(arena.alloc(1).is_ok());
        assert_eq!(failing.counts().allocations(), 2);
    }
}
