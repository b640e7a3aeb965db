//! Allocation statistics for an arena.

/// Running counters kept by an [`Arena`](crate::Arena).
///
/// Counters accumulate across `clear()` calls; only `used_bytes` and the
/// live counts reset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArenaStats {
    /// Successful `make*` and non-empty `alloc_array` calls.
    pub allocations: u64,
    /// Slots handed out, counting each array element.
    pub slots_allocated: u64,
    /// Number of `clear()` calls.
    pub clears: u64,
    /// Bytes occupied by live allocations.
    pub used_bytes: usize,
    /// High-water mark of `used_bytes`.
    pub peak_used_bytes: usize,
}

impl ArenaStats {
    /// Record an allocation of `slots` slots totalling `bytes` bytes.
    pub fn record_alloc(&mut self, slots: usize, bytes: usize) {
        self.allocations += 1;
        self.slots_allocated += slots as u64;
        self.used_bytes += bytes;
        self.peak_used_bytes = self.peak_used_bytes.max(self.used_bytes);
    }

    /// Record a bulk reset.
    pub fn record_clear(&mut self) {
        self.clears += 1;
        self.used_bytes = 0;
    }

    /// Zero every counter, keeping `used_bytes` as the new baseline for
    /// occupancy and peak.
    pub fn reset(&mut self, used_bytes: usize) {
        *self = Self {
            used_bytes,
            peak_used_bytes: used_bytes,
            ..Self::default()
        };
    }
}
