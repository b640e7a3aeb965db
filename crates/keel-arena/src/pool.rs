//! Type-erased per-type pools.
//!
//! An [`Arena`](crate::Arena) stores each element type in its own
//! [`SegmentList`], boxed behind [`ErasedPool`] so pools of different
//! types can live in one map and be reset together.

use std::any::{type_name, Any};

use crate::segment::{slot_bytes, SegmentList};

/// Operations the arena performs on pools without knowing their type.
pub(crate) trait ErasedPool {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// Drop every value and rewind, keeping reserved storage.
    fn reset(&mut self);
    fn used_slots(&self) -> usize;
    fn used_bytes(&self) -> usize;
    fn memory_bytes(&self) -> usize;
    fn segment_count(&self) -> usize;
    fn type_name(&self) -> &'static str;
}

/// The pool for values of type `T`.
pub(crate) struct Pool<T> {
    pub(crate) segments: SegmentList<T>,
}

impl<T> Pool<T> {
    pub(crate) fn new() -> Self {
        Self {
            segments: SegmentList::new(),
        }
    }
}

impl<T: 'static> ErasedPool for Pool<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn reset(&mut self) {
        self.segments.reset();
    }

    fn used_slots(&self) -> usize {
        self.segments.total_used()
    }

    fn used_bytes(&self) -> usize {
        self.segments.total_used() * slot_bytes::<T>()
    }

    fn memory_bytes(&self) -> usize {
        self.segments.memory_bytes()
    }

    fn segment_count(&self) -> usize {
        self.segments.segment_count()
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }
}
