//! The region-chaining arena.
//!
//! An [`Arena`] owns a forward chain of [`Region`]s (stored as a `Vec`, head
//! at index 0) and a tail cursor into it. Allocation bumps the tail region;
//! when it is full the cursor walks forward, and when the chain is exhausted
//! a new region is appended.
//!
//! ```text
//! regions:  [ R0 | R1 | R2 | R3 ]
//!                       ^
//!                      tail     R0 and R1 are not considered again
//!                               until the next reset
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::handle::Allocation;
use crate::raw::{RegionAllocator, SystemAllocator};
use crate::region::{Region, RegionInfo};

/// Source of process-unique arena ids.
static NEXT_ARENA_ID: AtomicU64 = AtomicU64::new(1);

/// Region-based allocator with bulk reset and free.
///
/// Individual allocations are never freed. [`reset`](Self::reset) makes all
/// memory reusable without returning it to the system; [`free`](Self::free)
/// (and `Drop`) returns every region to the backing allocator.
///
/// All mutation goes through `&mut self`; the arena is not `Sync`.
pub struct Arena<A: RegionAllocator = SystemAllocator> {
    /// The region chain. Index 0 is the head.
    regions: Vec<Region>,
    /// Index of the first region considered for allocation.
    /// Meaningless while `regions` is empty.
    tail: usize,
    /// Process-unique id; stamps each [`Allocation`].
    id: u64,
    /// Bumped on every reset and free; stamps each [`Allocation`].
    generation: u64,
    config: ArenaConfig,
    allocator: A,
}

impl Arena {
    /// Create an empty arena whose new regions are at least
    /// `region_capacity` bytes. Zero means the library default.
    pub fn new(region_capacity: usize) -> Self {
        Self::with_config(ArenaConfig::new(region_capacity))
    }

    /// Alias for [`Arena::new`].
    pub fn create(region_capacity: usize) -> Self {
        Self::new(region_capacity)
    }

    /// Create an empty arena from a full configuration.
    pub fn with_config(config: ArenaConfig) -> Self {
        Self::with_allocator(config, SystemAllocator)
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<A: RegionAllocator> Arena<A> {
    /// Create an empty arena that obtains region memory from `allocator`.
    pub fn with_allocator(config: ArenaConfig, allocator: A) -> Self {
        Self {
            regions: Vec::new(),
            tail: 0,
            id: NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed),
            generation: 0,
            config,
            allocator,
        }
    }

    /// Allocate `bytes` bytes.
    ///
    /// Returns a handle to the range. Zero-byte requests always succeed and
    /// yield an empty range at the current cursor, which may coincide with
    /// the start of the next allocation.
    ///
    /// # Errors
    ///
    /// [`ArenaError::AllocationFailed`] if a new region is needed and the
    /// backing allocator cannot supply it. The arena is left unchanged.
    pub fn alloc(&mut self, bytes: usize) -> Result<Allocation, ArenaError> {
        let (region, offset) = self.place(bytes)?;
        if self.config.zero_on_alloc {
            if let Some(data) = self.regions[region].slice_mut(offset, bytes) {
                data.fill(0);
            }
        }
        Ok(Allocation::new(self.id, self.generation, region, offset, bytes))
    }

    /// Allocate `bytes` bytes and borrow them directly.
    ///
    /// The borrow ties the slice to the arena, so it cannot outlive the next
    /// [`reset`](Self::reset) or [`free`](Self::free).
    ///
    /// # Errors
    ///
    /// Same as [`alloc`](Self::alloc).
    pub fn alloc_bytes(&mut self, bytes: usize) -> Result<&mut [u8], ArenaError> {
        let handle = self.alloc(bytes)?;
        self.get_mut(handle)
    }

    /// Find (or create) the region for a `bytes`-byte request and bump it.
    ///
    /// Returns `(region_index, offset)`. The tail cursor is only committed
    /// once the allocation has succeeded.
    fn place(&mut self, bytes: usize) -> Result<(usize, usize), ArenaError> {
        let hit = self
            .regions
            .iter_mut()
            .enumerate()
            .skip(self.tail)
            .find_map(|(i, region)| match region.bump(bytes) {
                Some(offset) => Some((i, offset)),
                None => {
                    log::trace!(
                        "region {i} has {} bytes free, need {bytes}; advancing",
                        region.remaining()
                    );
                    None
                }
            });

        let (index, offset) = match hit {
            Some(found) => found,
            None => (self.grow(bytes)?, 0),
        };
        self.tail = index;
        Ok((index, offset))
    }

    /// Append a region that already holds the first `bytes` bytes and return
    /// its index.
    fn grow(&mut self, bytes: usize) -> Result<usize, ArenaError> {
        let floor = self.config.effective_region_capacity();
        match Region::with_first(bytes, floor, &self.allocator) {
            Some(region) => {
                let capacity = region.capacity();
                self.regions.push(region);
                let index = self.regions.len() - 1;
                log::debug!("created region {index} with capacity {capacity} bytes");
                Ok(index)
            }
            None => {
                let err = ArenaError::AllocationFailed {
                    requested: bytes,
                    region_capacity: bytes.max(floor),
                };
                log::warn!("{err}");
                Err(self.config.failure_policy.apply(err))
            }
        }
    }

    /// Resolve a handle to its bytes.
    ///
    /// # Errors
    ///
    /// [`ArenaError::OutOfBounds`] if the handle was issued by another arena
    /// or does not name a live range of this one; [`ArenaError::StaleHandle`]
    /// if this arena was reset or freed since the handle was issued.
    pub fn get(&self, handle: Allocation) -> Result<&[u8], ArenaError> {
        self.check_handle(handle)?;
        self.regions
            .get(handle.region)
            .and_then(|r| r.slice(handle.offset, handle.len))
            .ok_or_else(|| out_of_bounds(handle))
    }

    /// Resolve a handle to its bytes, mutably.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub fn get_mut(&mut self, handle: Allocation) -> Result<&mut [u8], ArenaError> {
        self.check_handle(handle)?;
        self.regions
            .get_mut(handle.region)
            .and_then(|r| r.slice_mut(handle.offset, handle.len))
            .ok_or_else(|| out_of_bounds(handle))
    }

    fn check_handle(&self, handle: Allocation) -> Result<(), ArenaError> {
        if handle.arena != self.id {
            return Err(out_of_bounds(handle));
        }
        if handle.generation != self.generation {
            return Err(ArenaError::StaleHandle {
                handle_generation: handle.generation,
                current_generation: self.generation,
            });
        }
        Ok(())
    }

    /// Mark every region empty and rewind the tail cursor to the head.
    ///
    /// No memory is returned to the allocator and buffer contents are left
    /// as they are. All outstanding handles become stale.
    pub fn reset(&mut self) {
        for region in &mut self.regions {
            region.reset();
        }
        self.tail = 0;
        self.generation += 1;
        log::debug!(
            "reset arena: {} regions, {} bytes retained",
            self.regions.len(),
            self.memory_bytes()
        );
    }

    /// Return every region to the backing allocator.
    ///
    /// The arena is empty afterwards and immediately reusable. Its
    /// configuration is kept. All outstanding handles become stale.
    pub fn free(&mut self) {
        if !self.regions.is_empty() {
            log::debug!(
                "freeing {} regions ({} bytes)",
                self.regions.len(),
                self.memory_bytes()
            );
        }
        for region in self.regions.drain(..) {
            region.release(&self.allocator);
        }
        self.tail = 0;
        self.generation += 1;
    }

    /// Whether the arena owns no regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Number of regions in the chain.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Index of the region the tail cursor points at, or `None` when empty.
    pub fn tail_index(&self) -> Option<usize> {
        if self.regions.is_empty() {
            None
        } else {
            Some(self.tail)
        }
    }

    /// The region at `index`, if any.
    pub fn region(&self, index: usize) -> Option<&Region> {
        self.regions.get(index)
    }

    /// Metadata for every region, head first.
    pub fn regions(&self) -> impl Iterator<Item = RegionInfo> + '_ {
        self.regions
            .iter()
            .enumerate()
            .map(move |(i, r)| RegionInfo::of(i, r, i == self.tail))
    }

    /// Current generation. Changes on every reset and free.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The arena's configuration.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// The backing allocator.
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    /// Total capacity of all regions in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.regions.iter().map(Region::capacity).sum()
    }

    /// Total bytes handed out across all regions since the last reset.
    pub fn total_used(&self) -> usize {
        self.regions.iter().map(Region::used).sum()
    }
}

fn out_of_bounds(handle: Allocation) -> ArenaError {
    ArenaError::OutOfBounds {
        region: handle.region,
        offset: handle.offset,
        len: handle.len,
    }
}

impl<A: RegionAllocator> Drop for Arena<A> {
    fn drop(&mut self) {
        self.free();
    }
}

impl<A: RegionAllocator> fmt::Debug for Arena<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("id", &self.id)
            .field("regions", &self.regions)
            .field("tail", &self.tail_index())
            .field("generation", &self.generation)
            .field("config", &self.config)
            .finish()
    }
}
