//! Destruction flags and the [`Destructible`] capability.
//!
//! Every weakly referenceable object owns a [`LivenessToken`]. The token
//! holds a boolean cell that lives on its own heap allocation, so the cell
//! stays readable after the object that owned it is gone. Weak references
//! keep a read-only [`DestructionFlag`] to that cell and consult it before
//! every access.
//!
//! The flag starts `false` and flips to `true` exactly once: either when
//! the owner calls [`LivenessToken::mark_destroyed`] at the start of its
//! teardown, or when the token itself is dropped along with its object.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// The destruction flag owned by a weakly referenceable object.
///
/// Not `Clone`: a token belongs to exactly one object. Share liveness
/// through [`LivenessToken::flag`] instead.
pub struct LivenessToken {
    cell: Rc<Cell<bool>>,
}

impl LivenessToken {
    /// Create a fresh token in the alive state.
    pub fn new() -> Self {
        Self {
            cell: Rc::new(Cell::new(false)),
        }
    }

    /// Whether the owning object has begun teardown.
    pub fn is_destroyed(&self) -> bool {
        self.cell.get()
    }

    /// Flip the flag to destroyed.
    ///
    /// Returns `true` if this call performed the transition and `false` if
    /// the flag was already set. The transition is irreversible.
    pub fn mark_destroyed(&self) -> bool {
        !self.cell.replace(true)
    }

    /// A read-only view of the flag cell for weak holders.
    pub fn flag(&self) -> DestructionFlag {
        DestructionFlag {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl Default for LivenessToken {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LivenessToken {
    fn drop(&mut self) {
        self.cell.set(true);
    }
}

impl fmt::Debug for LivenessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LivenessToken")
            .field("destroyed", &self.cell.get())
            .finish()
    }
}

/// Shared, read-only access to a [`LivenessToken`]'s cell.
///
/// Holding a `DestructionFlag` keeps the cell allocated, so its address
/// is a stable identity for as long as the flag is held, even after the
/// owning object is destroyed.
#[derive(Clone)]
pub struct DestructionFlag {
    cell: Rc<Cell<bool>>,
}

impl DestructionFlag {
    /// Whether the owning object has been destroyed.
    pub fn is_set(&self) -> bool {
        self.cell.get()
    }

    /// Whether two flags observe the same cell.
    pub fn ptr_eq(&self, other: &DestructionFlag) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }

    /// Whether this flag observes the cell owned by `token`.
    pub fn observes(&self, token: &LivenessToken) -> bool {
        Rc::ptr_eq(&self.cell, &token.cell)
    }

    /// Address of the cell, usable as an identity key.
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.cell) as usize
    }
}

impl fmt::Debug for DestructionFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DestructionFlag")
            .field("set", &self.cell.get())
            .finish()
    }
}

/// A type that can be weakly referenced.
///
/// Implementors own a [`LivenessToken`] created with the object and return
/// it here. The token must not be swapped out for the object's lifetime.
///
/// ```
/// use keel_core::{Destructible, LivenessToken};
///
/// struct Label {
///     text: String,
///     liveness: LivenessToken,
/// }
///
/// impl Destructible for Label {
///     fn liveness(&self) -> &LivenessToken {
///         &self.liveness
///     }
/// }
///
/// let label = Label { text: "ok".into(), liveness: LivenessToken::new() };
/// assert!(!label.liveness().is_destroyed());
/// ```
pub trait Destructible {
    /// The destruction flag owned by this object.
    fn liveness(&self) -> &LivenessToken;
}

impl Destructible for LivenessToken {
    fn liveness(&self) -> &LivenessToken {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_token_is_alive() {
        let token = LivenessToken::new();
        assert!(!token.is_destroyed());
        assert!(!token.flag().is_set());
    }

    #[test]
    fn mark_destroyed_flips_once() {
        let token = LivenessToken::new();
        assert!(token.mark_destroyed());
        assert!(!token.mark_destroyed());
        assert!(token.is_destroyed());
    }

    #[test]
    fn flag_outlives_token() {
        let token = LivenessToken::new();
        let flag = token.flag();
        assert!(!flag.is_set());
        drop(token);
        assert!(flag.is_set());
    }

    #[test]
    fn flags_from_same_token_share_identity() {
        let token = LivenessToken::new();
        let a = token.flag();
        let b = token.flag();
        assert!(a.ptr_eq(&b));
        assert_eq!(a.addr(), b.addr());
        assert!(a.observes(&token));

        let other = LivenessToken::new();
        assert!(!a.ptr_eq(&other.flag()));
        assert!(!a.observes(&other));
    }

    #[test]
    fn flag_address_is_stable_across_destruction() {
        let token = LivenessToken::new();
        let flag = token.flag();
        let before = flag.addr();
        drop(token);
        assert_eq!(flag.addr(), before);
    }
}
