//! Region-based arena allocation.
//!
//! An [`Arena`] hands out byte ranges from preallocated regions and reclaims
//! them in bulk. It suits data with a shared lifetime (per request, per
//! frame, per parse tree) that would otherwise be freed piece by piece.
//!
//! # Architecture
//!
//! ```text
//! Arena
//! ├── ArenaConfig (default region capacity, zeroing, failure policy)
//! ├── RegionAllocator (pluggable backing memory, SystemAllocator default)
//! └── Region[] (head first; tail cursor marks where allocation resumes)
//!     └── RawBuffer (capacity bytes, bump cursor `used`)
//! ```
//!
//! # Lifecycle
//!
//! - **alloc:** bump the tail region; walk forward past full regions; append
//!   a new region of `max(bytes, region_capacity)` when the chain runs out.
//! - **reset:** every region's cursor goes back to zero and the tail returns
//!   to the head. No memory is released.
//! - **free:** every region goes back to the allocator. The configuration
//!   survives, so the arena can be reused immediately.
//!
//! Handles returned by [`Arena::alloc`] are stamped with the arena's
//! generation and are rejected once the arena is reset or freed.
//!
//! ```
//! use regio::Arena;
//!
//! let mut arena = Arena::new(400);
//! let greeting = arena.alloc(5).unwrap();
//! arena.get_mut(greeting).unwrap().copy_from_slice(b"hello");
//! assert_eq!(arena.get(greeting).unwrap(), b"hello");
//!
//! arena.reset();
//! assert!(arena.get(greeting).is_err());
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod arena;
pub mod config;
pub mod error;
pub mod handle;
pub mod raw;
pub mod region;

// Public re-exports for the primary API surface.
pub use arena::Arena;
pub use config::{ArenaConfig, FailurePolicy};
pub use error::ArenaError;
pub use handle::Allocation;
pub use raw::{RegionAllocator, SystemAllocator};
pub use region::{Region, RegionInfo};
