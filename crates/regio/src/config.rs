//! Arena configuration parameters.

use std::fmt;

use crate::error::ArenaError;

/// What the arena does when the backing allocator cannot supply a region.
#[derive(Clone, Copy, Default)]
pub enum FailurePolicy {
    /// Return [`ArenaError::AllocationFailed`] to the caller.
    #[default]
    Propagate,
    /// Panic with the error message. Useful for fail-fast debugging.
    Panic,
    /// Call the embedder's hook with the error, then return it.
    Hook(fn(&ArenaError)),
}

impl fmt::Debug for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Propagate => f.write_str("Propagate"),
            Self::Panic => f.write_str("Panic"),
            Self::Hook(_) => f.write_str("Hook(..)"),
        }
    }
}

impl FailurePolicy {
    /// Apply the policy to a failed region allocation.
    ///
    /// Returns the error unchanged unless the policy panics.
    pub(crate) fn apply(self, err: ArenaError) -> ArenaError {
        match self {
            Self::Propagate => err,
            Self::Panic => panic!("{err}"),
            Self::Hook(hook) => {
                hook(&err);
                err
            }
        }
    }
}

/// Configuration for an [`Arena`](crate::Arena).
///
/// The configuration is part of the arena's state: it is preserved across
/// [`Arena::free`](crate::Arena::free), which only releases memory.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArenaConfig {
    /// Minimum capacity, in bytes, of every newly created region.
    ///
    /// Zero means "use [`ArenaConfig::DEFAULT_REGION_CAPACITY`]". A request
    /// larger than this still gets a region sized exactly for the request.
    pub region_capacity: usize,

    /// Zero-fill every byte range before handing it out.
    ///
    /// Regions are zero-filled once when created, so without this flag a
    /// range reused after [`Arena::reset`](crate::Arena::reset) holds
    /// whatever was written there before.
    pub zero_on_alloc: bool,

    /// Behaviour when the backing allocator fails.
    pub failure_policy: FailurePolicy,
}

impl ArenaConfig {
    /// Library-wide default region capacity: 8 KiB.
    pub const DEFAULT_REGION_CAPACITY: usize = 8 * 1024;

    /// Create a config with the given default region capacity.
    ///
    /// Uses default values for all other parameters.
    pub fn new(region_capacity: usize) -> Self {
        Self {
            region_capacity,
            ..Self::default()
        }
    }

    /// Builder-style setter for the `zero_on_alloc` field.
    pub fn with_zeroing(mut self, zero: bool) -> Self {
        self.zero_on_alloc = zero;
        self
    }

    /// Builder-style setter for the `failure_policy` field.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// The region capacity actually used when creating regions.
    pub fn effective_region_capacity(&self) -> usize {
        if self.region_capacity == 0 {
            Self::DEFAULT_REGION_CAPACITY
        } else {
            self.region_capacity
        }
    }
}
