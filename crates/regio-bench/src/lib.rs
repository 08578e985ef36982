//! Benchmark workloads and demo helpers for regio.
//!
//! Provides deterministic allocation workloads for benchmarking and
//! examples:
//!
//! - [`small_objects`]: many fixed-size allocations, the monotonic case
//! - [`mixed_sizes`]: a repeating small/medium/oversized pattern that
//!   exercises the tail walk and region growth
//! - [`run_workload`]: replay a workload against an arena
//! - [`dump_regions`]: render region metadata for inspection

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::fmt::Write as _;

use regio::{Arena, ArenaError, RegionAllocator};

/// `count` allocations of `size` bytes each.
pub fn small_objects(count: usize, size: usize) -> Vec<usize> {
    vec![size; count]
}

/// `count` allocations cycling through sizes relative to `region_capacity`.
///
/// The pattern mixes requests that pack into a region, requests that leave
/// awkward remainders, and requests larger than any default region.
pub fn mixed_sizes(count: usize, region_capacity: usize) -> Vec<usize> {
    let pattern = [
        16,
        region_capacity / 8,
        region_capacity / 3,
        0,
        region_capacity / 2 + 1,
        region_capacity * 2,
        64,
    ];
    pattern.iter().copied().cycle().take(count).collect()
}

/// Allocate every size in `sizes`, touching the first byte of each range.
///
/// Returns the total number of bytes requested.
pub fn run_workload<A: RegionAllocator>(
    arena: &mut Arena<A>,
    sizes: &[usize],
) -> Result<usize, ArenaError> {
    let mut total = 0;
    for &size in sizes {
        let bytes = arena.alloc_bytes(size)?;
        if let Some(first) = bytes.first_mut() {
            *first = 0xA5;
        }
        total += size;
    }
    Ok(total)
}

/// Render every region's metadata, head first, one block per region.
pub fn dump_regions<A: RegionAllocator>(arena: &Arena<A>) -> String {
    let mut out = String::new();
    if arena.is_empty() {
        out.push_str("(no regions)\n");
        return out;
    }
    for info in arena.regions() {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{info}");
    }
    out
}
