//! Borrowed views over contiguous arena arrays.

use std::ops::{Index, IndexMut};

use crate::segment::Slot;

/// Shared view of an array allocated with `Arena::alloc_array`.
pub struct ArrayRef<'a, T> {
    slots: &'a [Slot<T>],
}

impl<'a, T> ArrayRef<'a, T> {
    pub(crate) fn new(slots: &'a [Slot<T>]) -> Self {
        Self { slots }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The element at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&'a T> {
        self.slots.get(index).map(|slot| &slot.0)
    }

    /// Iterate over the elements in order.
    pub fn iter(&self) -> impl Iterator<Item = &'a T> + 'a {
        self.slots.iter().map(|slot| &slot.0)
    }
}

impl<T> Index<usize> for ArrayRef<'_, T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.slots[index].0
    }
}

/// Mutable view of an array allocated with `Arena::alloc_array`.
pub struct ArrayMut<'a, T> {
    slots: &'a mut [Slot<T>],
}

impl<'a, T> ArrayMut<'a, T> {
    pub(crate) fn new(slots: &'a mut [Slot<T>]) -> Self {
        Self { slots }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The element at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).map(|slot| &slot.0)
    }

    /// Mutable access to the element at `index`, if in range.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).map(|slot| &mut slot.0)
    }

    /// Iterate over the elements in order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.slots.iter().map(|slot| &slot.0)
    }

    /// Iterate mutably over the elements in order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.slots.iter_mut().map(|slot| &mut slot.0)
    }
}

impl<T> Index<usize> for ArrayMut<'_, T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.slots[index].0
    }
}

impl<T> IndexMut<usize> for ArrayMut<'_, T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.slots[index].0
    }
}
