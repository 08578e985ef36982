//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The backing allocator could not supply memory for a new region.
    ///
    /// This is the only way [`Arena::alloc`](crate::Arena::alloc) can fail.
    /// The arena is left exactly as it was before the call.
    AllocationFailed {
        /// Number of bytes the caller asked for.
        requested: usize,
        /// Capacity of the region that could not be created.
        region_capacity: usize,
    },
    /// An [`Allocation`](crate::Allocation) issued before the most recent
    /// reset or free.
    StaleHandle {
        /// The generation encoded in the handle.
        handle_generation: u64,
        /// The arena's current generation.
        current_generation: u64,
    },
    /// A handle whose range does not lie inside a live region of this arena.
    OutOfBounds {
        /// Region index named by the handle.
        region: usize,
        /// Byte offset within that region.
        offset: usize,
        /// Length of the range in bytes.
        len: usize,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed {
                requested,
                region_capacity,
            } => {
                write!(
                    f,
                    "region allocation failed: requested {requested} bytes, region capacity {region_capacity} bytes"
                )
            }
            Self::StaleHandle {
                handle_generation,
                current_generation,
            } => {
                write!(
                    f,
                    "stale handle: generation {handle_generation}, current {current_generation}"
                )
            }
            Self::OutOfBounds {
                region,
                offset,
                len,
            } => {
                write!(
                    f,
                    "range out of bounds: region {region}, offset {offset}, len {len}"
                )
            }
        }
    }
}

impl Error for ArenaError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_sizes() {
        let err = ArenaError::AllocationFailed {
            requested: 9000,
            region_capacity: 9000,
        };
        let msg = err.to_string();
        assert!(msg.contains("9000 bytes"));
        assert!(msg.starts_with("region allocation failed"));
    }

    #[test]
    fn stale_handle_display() {
        let err = ArenaError::StaleHandle {
            handle_generation: 1,
            current_generation: 3,
        };
        assert_eq!(err.to_string(), "stale handle: generation 1, current 3");
    }
}
