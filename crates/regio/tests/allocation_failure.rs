//! Integration test: behaviour when the backing allocator runs dry.
//!
//! A failed region allocation must leave the arena exactly as it was,
//! including the tail cursor, and the configured failure policy decides
//! whether the error is returned, reported, or turned into a panic.

use std::sync::atomic::{AtomicUsize, Ordering};

use regio::{Arena, ArenaConfig, ArenaError, FailurePolicy};
use regio_test_utils::{region_shape, scenario_arena, FailingAllocator};

#[test]
fn failure_on_empty_arena_leaves_it_empty() {
    let failing = FailingAllocator::always();
    let mut a = scenario_arena(&failing);
    let err = a.alloc(10).unwrap_err();
    assert_eq!(
        err,
        ArenaError::AllocationFailed {
            requested: 10,
            region_capacity: 400,
        }
    );
    assert!(a.is_empty());
    assert_eq!(a.tail_index(), None);
}

#[test]
fn failure_does_not_advance_tail() {
    let failing = FailingAllocator::after(2);
    let mut a = scenario_arena(&failing);
    a.alloc(300).unwrap(); // region 0, 100 free
    a.alloc(400).unwrap(); // region 1, full
    a.reset();
    a.alloc(350).unwrap(); // region 0, 50 free
    assert_eq!(a.tail_index(), Some(0));
    let before = region_shape(&a);

    // Neither region fits 500; the walk would pass both, then growth fails.
    assert!(a.alloc(500).is_err());
    assert_eq!(a.tail_index(), Some(0));
    assert_eq!(region_shape(&a), before);

    // The head's remaining space is still reachable.
    let h = a.alloc(50).unwrap();
    assert_eq!((h.region(), h.offset()), (0, 350));
}

#[test]
fn arena_recovers_once_memory_is_available() {
    let failing = FailingAllocator::always();
    let mut a = scenario_arena(&failing);
    assert!(a.alloc(1).is_err());
    failing.set_budget(1);
    let h = a.alloc(1).unwrap();
    assert_eq!((h.region(), h.offset()), (0, 0));
}

#[test]
fn zero_byte_alloc_only_fails_when_a_region_is_needed() {
    let failing = FailingAllocator::after(1);
    let mut a = scenario_arena(&failing);
    a.alloc(400).unwrap();
    // Full head still satisfies a zero-byte request.
    assert!(a.alloc(0).is_ok());
    assert_eq!(failing.refused(), 0);
}

#[test]
fn unrepresentable_request_is_an_allocation_failure() {
    let mut a = Arena::new(400);
    let err = a.alloc(usize::MAX).unwrap_err();
    assert!(matches!(err, ArenaError::AllocationFailed { requested, .. } if requested == usize::MAX));
    assert!(a.is_empty());
}

static HOOK_CALLS: AtomicUsize = AtomicUsize::new(0);

fn count_failures(err: &ArenaError) {
    assert!(matches!(err, ArenaError::AllocationFailed { .. }));
    HOOK_CALLS.fetch_add(1, Ordering::SeqCst);
}

#[test]
fn hook_policy_reports_then_propagates() {
    let failing = FailingAllocator::always();
    let config = ArenaConfig::new(400).with_failure_policy(FailurePolicy::Hook(count_failures));
    let mut a = Arena::with_allocator(config, &failing);
    assert!(a.alloc(1).is_err());
    assert!(a.alloc(1).is_err());
    assert_eq!(HOOK_CALLS.load(Ordering::SeqCst), 2);
}

#[test]
#[should_panic(expected = "region allocation failed")]
fn panic_policy_fails_fast() {
    let failing = FailingAllocator::always();
    let config = ArenaConfig::new(400).with_failure_policy(FailurePolicy::Panic);
    let mut a = Arena::with_allocator(config, &failing);
    let _ = a.alloc(1);
}
