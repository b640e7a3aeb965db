//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The platform refused to reserve storage for a new segment.
    AllocationFailed {
        /// Number of bytes requested for the segment.
        requested: usize,
    },
    /// Growing would exceed the configured byte budget.
    CapacityExceeded {
        /// Number of bytes requested for the new segment.
        requested: usize,
        /// Total capacity already reserved across all pools.
        capacity: usize,
    },
    /// The request does not fit the arena's slot index space.
    SlotOverflow {
        /// Number of slots requested.
        requested: usize,
    },
    /// Configuration values failed validation.
    InvalidConfig {
        /// Human-readable description of the invalid value.
        reason: String,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed { requested } => {
                write!(f, "arena allocation failed: could not reserve {requested} bytes")
            }
            Self::CapacityExceeded {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "arena capacity exceeded: requested {requested} bytes, capacity {capacity} bytes"
                )
            }
            Self::SlotOverflow { requested } => {
                write!(f, "slot overflow: {requested} slots do not fit a segment")
            }
            Self::InvalidConfig { reason } => write!(f, "invalid arena config: {reason}"),
        }
    }
}

impl Error for ArenaError {}

/// Failure of a fallible in-place construction via `Arena::make_with`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MakeError<E> {
    /// The arena could not provide storage.
    Alloc(ArenaError),
    /// The constructor itself failed. No storage was consumed.
    Construct(E),
}

impl<E: fmt::Display> fmt::Display for MakeError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alloc(err) => write!(f, "{err}"),
            Self::Construct(err) => write!(f, "construction failed: {err}"),
        }
    }
}

impl<E: Error + 'static> Error for MakeError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Alloc(err) => Some(err),
            Self::Construct(err) => Some(err),
        }
    }
}

impl<E> From<ArenaError> for MakeError<E> {
    fn from(err: ArenaError) -> Self {
        Self::Alloc(err)
    }
}
