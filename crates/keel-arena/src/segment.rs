//! Fixed-capacity segments and growable segment lists.
//!
//! A [`Segment`] is a contiguous run of 16-byte aligned slots with bump
//! allocation. Its backing storage is reserved once at creation and never
//! reallocated, so an object placed in a segment keeps its address until
//! the segment is reset.
//!
//! A [`SegmentList`] is the per-type pool: when the current segment is
//! full, it moves on to the next existing segment or appends a new one
//! whose capacity is at least double the previous one.

use std::any::type_name;

use smallvec::SmallVec;

use crate::error::ArenaError;

/// Minimum alignment of every slot, in bytes.
pub const ALIGN: usize = 16;

/// Storage cell for one arena value. The alignment attribute puts every
/// slot, and therefore every allocation, on an [`ALIGN`] boundary.
#[repr(align(16))]
pub(crate) struct Slot<T>(pub(crate) T);

/// Size in bytes of one slot holding a `T`.
pub fn slot_bytes<T>() -> usize {
    std::mem::size_of::<Slot<T>>()
}

/// Growth parameters and the byte budget shared by all pools of an arena.
#[derive(Clone, Debug)]
pub struct Budget {
    /// Capacity of a pool's first segment, in slots.
    pub initial_slots: u32,
    /// Multiplier applied to the previous segment's capacity.
    pub growth_factor: u32,
    /// Upper bound on `reserved_bytes`, if any.
    pub max_bytes: Option<usize>,
    /// Bytes reserved so far across all pools.
    pub reserved_bytes: usize,
}

/// A single fixed-capacity segment with bump allocation.
pub struct Segment<T> {
    /// Backing storage. Reserved to `capacity` at creation; never grows.
    slots: Vec<Slot<T>>,
    /// Number of slots this segment may hold.
    capacity: usize,
}

impl<T> Segment<T> {
    /// Create an empty segment able to hold `capacity` slots.
    ///
    /// Returns `ArenaError::AllocationFailed` if the platform cannot
    /// reserve the storage.
    pub fn new(capacity: usize) -> Result<Self, ArenaError> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| ArenaError::AllocationFailed {
                requested: capacity.saturating_mul(slot_bytes::<T>()),
            })?;
        Ok(Self { slots, capacity })
    }

    /// Whether `len` more slots fit without exceeding capacity.
    pub fn fits(&self, len: usize) -> bool {
        len <= self.remaining()
    }

    /// Bump-allocate one slot per item in `values`, returning the offset
    /// of the first.
    ///
    /// The caller must have checked [`Segment::fits`] for the number of
    /// items produced.
    pub fn fill<I: IntoIterator<Item = T>>(&mut self, values: I) -> u32 {
        let offset = self.slots.len() as u32;
        self.slots.extend(values.into_iter().map(Slot));
        debug_assert!(self.slots.len() <= self.capacity);
        offset
    }

    /// The value at `offset`, if allocated.
    pub fn get(&self, offset: u32) -> Option<&T> {
        self.slots.get(offset as usize).map(|slot| &slot.0)
    }

    /// Mutable access to the value at `offset`, if allocated.
    pub fn get_mut(&mut self, offset: u32) -> Option<&mut T> {
        self.slots.get_mut(offset as usize).map(|slot| &mut slot.0)
    }

    pub(crate) fn slots(&self, offset: u32, len: u32) -> Option<&[Slot<T>]> {
        let start = offset as usize;
        let end = start.checked_add(len as usize)?;
        self.slots.get(start..end)
    }

    pub(crate) fn slots_mut(&mut self, offset: u32, len: u32) -> Option<&mut [Slot<T>]> {
        let start = offset as usize;
        let end = start.checked_add(len as usize)?;
        self.slots.get_mut(start..end)
    }

    /// Drop every value and rewind the bump pointer to zero.
    ///
    /// Values are dropped in allocation order. The backing storage is kept.
    pub fn reset(&mut self) {
        self.slots.clear();
    }

    /// Number of slots currently allocated.
    pub fn used(&self) -> usize {
        self.slots.len()
    }

    /// Total capacity in slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Remaining free capacity in slots.
    pub fn remaining(&self) -> usize {
        self.capacity - self.slots.len()
    }

    /// Bytes occupied by allocated slots.
    pub fn used_bytes(&self) -> usize {
        self.slots.len() * slot_bytes::<T>()
    }

    /// Bytes reserved for this segment.
    pub fn memory_bytes(&self) -> usize {
        self.capacity * slot_bytes::<T>()
    }
}

/// A growable list of [`Segment`]s holding values of one type.
///
/// Allocations never span segments: a request that does not fit the
/// current segment is placed entirely in a later one.
pub struct SegmentList<T> {
    segments: SmallVec<[Segment<T>; 4]>,
    /// Index of the segment currently being filled.
    current: usize,
}

impl<T> SegmentList<T> {
    /// Create an empty list. The first segment is reserved on first use.
    pub fn new() -> Self {
        Self {
            segments: SmallVec::new(),
            current: 0,
        }
    }

    /// Bump-allocate one slot per item in `values` (`len` items), growing
    /// into a new segment if needed.
    ///
    /// Returns `Ok((segment_index, offset))`. `values` is not consumed on
    /// error.
    pub fn alloc<I: IntoIterator<Item = T>>(
        &mut self,
        len: usize,
        values: I,
        budget: &mut Budget,
    ) -> Result<(u16, u32), ArenaError> {
        if len > u32::MAX as usize {
            return Err(ArenaError::SlotOverflow { requested: len });
        }
        let index = self.segment_with_room(len, budget)?;
        let segment = &mut self.segments[index];
        let before = segment.used();
        let offset = segment.fill(values);
        debug_assert_eq!(segment.used() - before, len);
        Ok((index as u16, offset))
    }

    /// Find (or create) the segment that will receive `len` slots and make
    /// it current.
    fn segment_with_room(&mut self, len: usize, budget: &mut Budget) -> Result<usize, ArenaError> {
        while self.current < self.segments.len() {
            if self.segments[self.current].fits(len) {
                return Ok(self.current);
            }
            if self.current + 1 == self.segments.len() {
                break;
            }
            // Reuse a segment kept from an earlier generation.
            self.current += 1;
        }
        self.grow(len, budget)
    }

    fn grow(&mut self, len: usize, budget: &mut Budget) -> Result<usize, ArenaError> {
        if self.segments.len() > u16::MAX as usize {
            return Err(ArenaError::SlotOverflow { requested: len });
        }

        let initial = budget.initial_slots.max(1) as usize;
        let doubled = match self.segments.last() {
            Some(last) => last.capacity().saturating_mul(budget.growth_factor as usize),
            None => initial,
        };
        let mut capacity = doubled.max(len).min(u32::MAX as usize);

        let slot = slot_bytes::<T>();
        let mut bytes = capacity
            .checked_mul(slot)
            .ok_or(ArenaError::SlotOverflow { requested: len })?;

        if let Some(max) = budget.max_bytes {
            if budget.reserved_bytes.saturating_add(bytes) > max {
                // Fall back to an exact fit before giving up.
                let exact = len.max(1);
                let exact_bytes = exact * slot;
                if budget.reserved_bytes.saturating_add(exact_bytes) > max {
                    tracing::warn!(
                        ty = type_name::<T>(),
                        requested = bytes,
                        reserved = budget.reserved_bytes,
                        max,
                        "arena byte budget exhausted"
                    );
                    return Err(ArenaError::CapacityExceeded {
                        requested: bytes,
                        capacity: budget.reserved_bytes,
                    });
                }
                capacity = exact;
                bytes = exact_bytes;
            }
        }

        let segment = Segment::new(capacity).inspect_err(|err| {
            tracing::warn!(ty = type_name::<T>(), %err, "segment reservation failed");
        })?;
        budget.reserved_bytes += bytes;
        self.segments.push(segment);
        self.current = self.segments.len() - 1;

        tracing::debug!(
            ty = type_name::<T>(),
            segment = self.current,
            capacity,
            bytes,
            reserved = budget.reserved_bytes,
            "arena pool grew"
        );
        Ok(self.current)
    }

    /// The value at (`segment_index`, `offset`), if allocated.
    pub fn get(&self, segment_index: u16, offset: u32) -> Option<&T> {
        self.segments.get(segment_index as usize)?.get(offset)
    }

    /// Mutable access to the value at (`segment_index`, `offset`).
    pub fn get_mut(&mut self, segment_index: u16, offset: u32) -> Option<&mut T> {
        self.segments.get_mut(segment_index as usize)?.get_mut(offset)
    }

    pub(crate) fn slots(&self, segment_index: u16, offset: u32, len: u32) -> Option<&[Slot<T>]> {
        self.segments.get(segment_index as usize)?.slots(offset, len)
    }

    pub(crate) fn slots_mut(
        &mut self,
        segment_index: u16,
        offset: u32,
        len: u32,
    ) -> Option<&mut [Slot<T>]> {
        self.segments
            .get_mut(segment_index as usize)?
            .slots_mut(offset, len)
    }

    /// Iterate over every allocated value with its (segment, offset).
    pub fn iter(&self) -> impl Iterator<Item = (u16, u32, &T)> + '_ {
        self.segments.iter().enumerate().flat_map(|(index, segment)| {
            segment
                .slots
                .iter()
                .enumerate()
                .map(move |(offset, slot)| (index as u16, offset as u32, &slot.0))
        })
    }

    /// Reset every segment without releasing storage.
    ///
    /// After reset, allocations start from the beginning of segment 0.
    pub fn reset(&mut self) {
        for segment in &mut self.segments {
            segment.reset();
        }
        self.current = 0;
    }

    /// Number of segments reserved.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Total allocated slots across all segments.
    pub fn total_used(&self) -> usize {
        self.segments.iter().map(Segment::used).sum()
    }

    /// Bytes occupied by allocated slots.
    pub fn used_bytes(&self) -> usize {
        self.segments.iter().map(Segment::used_bytes).sum()
    }

    /// Bytes reserved across all segments.
    pub fn memory_bytes(&self) -> usize {
        self.segments.iter().map(Segment::memory_bytes).sum()
    }
}

impl<T> Default for SegmentList<T> {
    fn default() -> Self {
        Self::new()
    }
}
