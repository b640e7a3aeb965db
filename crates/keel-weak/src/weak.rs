//! Weak references to arena objects.
//!
//! A [`WeakRef`] pairs a [`Handle`] (where the object lives) with a
//! [`DestructionFlag`] (whether it still lives). Access goes through the
//! arena and succeeds only if all of the following hold:
//!
//! - the flag is present and unset,
//! - the handle resolves in the arena (same arena, current generation),
//! - the resolved object owns the very flag cell this reference holds.
//!
//! The last check means an unrelated object that later occupies the same
//! slot is never mistaken for the original: it carries a fresh flag cell.

use std::fmt;
use std::hash::{Hash, Hasher};

use keel_arena::{Arena, Handle};
use keel_core::{Destructible, DestructionFlag};

/// Non-owning reference to a `T` allocated in an [`Arena`].
///
/// Equality and hashing use the (handle, flag cell) identity pair. Both
/// stay fixed after the target is destroyed, so a dead `WeakRef` can
/// still be found and removed from a hash map.
pub struct WeakRef<T> {
    target: Option<(Handle<T>, DestructionFlag)>,
}

impl<T> WeakRef<T> {
    /// A reference to no object. Always dead.
    pub fn null() -> Self {
        Self { target: None }
    }

    /// Flag-only pre-check: `false` means the target is certainly dead.
    ///
    /// `true` only means the flag is unset. The slot may since hold a
    /// different object (for example after `std::mem::replace` through
    /// `Arena::get_mut`), so use [`WeakRef::is_alive`] for the real answer.
    pub fn may_be_alive(&self) -> bool {
        match &self.target {
            Some((_, flag)) => !flag.is_set(),
            None => false,
        }
    }

    /// Whether this reference has no target at all (null or nullified).
    pub fn is_null(&self) -> bool {
        self.target.is_none()
    }

    /// Forget the target, independent of whether it is still alive.
    pub fn nullify(&mut self) {
        self.target = None;
    }

    /// Whether both references observe the same object's flag cell.
    ///
    /// Null references are never pointer-equal, not even to each other.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.target, &other.target) {
            (Some((_, a)), Some((_, b))) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// The handle this reference was built from, if not nullified.
    pub fn handle(&self) -> Option<Handle<T>> {
        self.target.as_ref().map(|(handle, _)| *handle)
    }
}

impl<T: Destructible + 'static> WeakRef<T> {
    /// Build a reference from a handle and the object it resolves to.
    ///
    /// `object` must be the value `handle` resolves to; `get` verifies
    /// this and reports a mismatched reference as dead.
    pub fn from_parts(handle: Handle<T>, object: &T) -> Self {
        Self {
            target: Some((handle, object.liveness().flag())),
        }
    }

    /// Whether the target is alive. Always equal to `self.get(arena).is_some()`.
    pub fn is_alive(&self, arena: &Arena) -> bool {
        self.get(arena).is_some()
    }

    /// The target, if it is still alive.
    pub fn get<'a>(&self, arena: &'a Arena) -> Option<&'a T> {
        let (handle, flag) = self.target.as_ref()?;
        if flag.is_set() {
            return None;
        }
        let object = arena.get(*handle)?;
        flag.observes(object.liveness()).then_some(object)
    }

    /// Mutable access to the target, if it is still alive.
    pub fn get_mut<'a>(&self, arena: &'a mut Arena) -> Option<&'a mut T> {
        let (handle, flag) = self.target.as_ref()?;
        if flag.is_set() {
            return None;
        }
        let object = arena.get_mut(*handle)?;
        if flag.observes(object.liveness()) {
            Some(object)
        } else {
            None
        }
    }
}

/// Build a [`WeakRef`] to the object behind `handle`.
///
/// A handle that no longer resolves yields a null reference. An object
/// that resolves but is already marked destroyed yields a dead reference
/// that still compares equal to earlier references to it.
pub fn weak_ref<T: Destructible + 'static>(arena: &Arena, handle: Handle<T>) -> WeakRef<T> {
    match arena.get(handle) {
        Some(object) => WeakRef::from_parts(handle, object),
        None => WeakRef::null(),
    }
}

/// Arena extension for building weak references.
pub trait Downgrade {
    /// Build a [`WeakRef`] to the object behind `handle`. See [`weak_ref`].
    fn weak_ref<T: Destructible + 'static>(&self, handle: Handle<T>) -> WeakRef<T>;
}

impl Downgrade for Arena {
    fn weak_ref<T: Destructible + 'static>(&self, handle: Handle<T>) -> WeakRef<T> {
        weak_ref(self, handle)
    }
}

impl<T> Default for WeakRef<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> Clone for WeakRef<T> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
        }
    }
}

impl<T> PartialEq for WeakRef<T> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.target, &other.target) {
            (None, None) => true,
            (Some((h1, f1)), Some((h2, f2))) => h1 == h2 && f1.ptr_eq(f2),
            _ => false,
        }
    }
}

impl<T> Eq for WeakRef<T> {}

impl<T> Hash for WeakRef<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.target {
            None => state.write_u8(0),
            Some((handle, flag)) => {
                state.write_u8(1);
                handle.hash(state);
                flag.addr().hash(state);
            }
        }
    }
}

impl<T> fmt::Debug for WeakRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            None => f.write_str("WeakRef(null)"),
            Some((handle, flag)) => f
                .debug_struct("WeakRef")
                .field("handle", handle)
                .field("alive", &!flag.is_set())
                .finish(),
        }
    }
}
