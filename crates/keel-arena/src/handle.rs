//! Typed handles into an [`Arena`](crate::Arena).
//!
//! A [`Handle`] encodes the location of one object: the arena that issued
//! it, the generation it was issued under, and a (segment, offset) pair
//! within that type's pool. The generation allows O(1) staleness checks
//! without per-slot bookkeeping.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use keel_core::{ArenaId, Generation};

/// Handle to a single `T` allocated from an arena.
///
/// `Copy` regardless of `T`. Resolving it through the arena yields the
/// object only while the arena is still in the generation the handle was
/// issued under.
#[must_use]
pub struct Handle<T> {
    pub(crate) arena: ArenaId,
    pub(crate) generation: Generation,
    pub(crate) segment: u16,
    pub(crate) offset: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub(crate) fn new(arena: ArenaId, generation: Generation, segment: u16, offset: u32) -> Self {
        Self {
            arena,
            generation,
            segment,
            offset,
            _marker: PhantomData,
        }
    }

    /// The arena that issued this handle.
    pub fn arena(&self) -> ArenaId {
        self.arena
    }

    /// The generation this handle belongs to.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Index of the segment within the type's pool.
    pub fn segment(&self) -> u16 {
        self.segment
    }

    /// Slot offset within the segment.
    pub fn offset(&self) -> u32 {
        self.offset
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.arena == other.arena
            && self.generation == other.generation
            && self.segment == other.segment
            && self.offset == other.offset
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.arena.hash(state);
        self.generation.hash(state);
        self.segment.hash(state);
        self.offset.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("arena", &self.arena)
            .field("generation", &self.generation)
            .field("segment", &self.segment)
            .field("offset", &self.offset)
            .finish()
    }
}

impl<T> fmt::Display for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Handle(arena={}, gen={}, seg={}, off={})",
            self.arena, self.generation, self.segment, self.offset
        )
    }
}

/// Handle to `len` contiguous `T` slots allocated from an arena.
///
/// A zero-length handle is valid and resolves to an empty view for as long
/// as its generation is current.
#[must_use]
pub struct ArrayHandle<T> {
    pub(crate) first: Handle<T>,
    pub(crate) len: u32,
}

impl<T> ArrayHandle<T> {
    pub(crate) fn new(first: Handle<T>, len: u32) -> Self {
        Self { first, len }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Whether this is a zero-length allocation.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The generation this handle belongs to.
    pub fn generation(&self) -> Generation {
        self.first.generation
    }

    /// The arena that issued this handle.
    pub fn arena(&self) -> ArenaId {
        self.first.arena
    }

    /// Handle to the element at `index`, or `None` if out of range.
    pub fn element(&self, index: usize) -> Option<Handle<T>> {
        if index >= self.len() {
            return None;
        }
        Some(Handle::new(
            self.first.arena,
            self.first.generation,
            self.first.segment,
            self.first.offset + index as u32,
        ))
    }
}

impl<T> Clone for ArrayHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArrayHandle<T> {}

impl<T> PartialEq for ArrayHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.first == other.first && self.len == other.len
    }
}

impl<T> Eq for ArrayHandle<T> {}

impl<T> Hash for ArrayHandle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.first.hash(state);
        self.len.hash(state);
    }
}

impl<T> fmt::Debug for ArrayHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayHandle")
            .field("first", &self.first)
            .field("len", &self.len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct NotCopy;

    #[test]
    fn handle_accessors() {
        let arena = ArenaId::next();
        let h: Handle<NotCopy> = Handle::new(arena, Generation(3), 1, 42);
        let copy = h;
        assert_eq!(h.arena(), arena);
        assert_eq!(copy.generation(), Generation(3));
        assert_eq!(h.segment(), 1);
        assert_eq!(h.offset(), 42);
    }

    #[test]
    fn handles_hash_by_location() {
        let arena = ArenaId::next();
        let a: Handle<NotCopy> = Handle::new(arena, Generation(0), 0, 1);
        let b: Handle<NotCopy> = Handle::new(arena, Generation(0), 0, 1);
        let c: Handle<NotCopy> = Handle::new(arena, Generation(1), 0, 1);
        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn array_element_bounds() {
        let arena = ArenaId::next();
        let first: Handle<u8> = Handle::new(arena, Generation(0), 2, 10);
        let array = ArrayHandle::new(first, 3);
        assert_eq!(array.len(), 3);
        assert_eq!(array.element(2).map(|h| h.offset()), Some(12));
        assert!(array.element(3).is_none());
    }

    #[test]
    fn empty_array_handle() {
        let first: Handle<u8> = Handle::new(ArenaId::next(), Generation(0), 0, 0);
        let array = ArrayHandle::new(first, 0);
        assert!(array.is_empty());
        assert!(array.element(0).is_none());
    }
}
