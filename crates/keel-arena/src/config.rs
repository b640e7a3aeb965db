//! Arena configuration parameters.

use crate::error::ArenaError;

/// Configuration for the arena allocator.
///
/// Controls segment sizing, growth, and the optional byte budget.
/// Validated by [`Arena::with_config`](crate::Arena::with_config).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Capacity, in slots, of the first segment created for each type.
    ///
    /// Default: 64. Must be at least 1.
    pub initial_segment_slots: u32,

    /// Multiplier applied to the previous segment's capacity when a type's
    /// pool needs a new segment.
    ///
    /// Default: 2. Must be at least 2 so growth stays amortised O(1).
    pub growth_factor: u32,

    /// Upper bound on bytes reserved across all pools.
    ///
    /// Default: `None` (bounded only by the platform allocator).
    pub max_bytes: Option<usize>,
}

impl ArenaConfig {
    /// Default capacity of a type's first segment.
    pub const DEFAULT_INITIAL_SEGMENT_SLOTS: u32 = 64;

    /// Default segment growth multiplier.
    pub const DEFAULT_GROWTH_FACTOR: u32 = 2;

    /// Create a config with default values.
    pub fn new() -> Self {
        Self {
            initial_segment_slots: Self::DEFAULT_INITIAL_SEGMENT_SLOTS,
            growth_factor: Self::DEFAULT_GROWTH_FACTOR,
            max_bytes: None,
        }
    }

    /// Check every parameter against its documented range.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.initial_segment_slots == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "initial_segment_slots must be >= 1 (got 0)".to_string(),
            });
        }
        if self.growth_factor < 2 {
            return Err(ArenaError::InvalidConfig {
                reason: format!("growth_factor must be >= 2 (got {})", self.growth_factor),
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new()
    }
}
