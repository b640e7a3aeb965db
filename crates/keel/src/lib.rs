//! Keel: arena allocation and weak references for UI widget trees.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Keel sub-crates. For most users, adding `keel` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use keel::prelude::*;
//!
//! struct Widget {
//!     name: String,
//!     liveness: LivenessToken,
//! }
//!
//! impl Destructible for Widget {
//!     fn liveness(&self) -> &LivenessToken {
//!         &self.liveness
//!     }
//! }
//!
//! let mut arena = Arena::new();
//! let root = arena
//!     .make(Widget { name: "root".into(), liveness: LivenessToken::new() })
//!     .unwrap();
//!
//! // A focus tracker observes the widget without owning it.
//! let focus: WeakRef<Widget> = arena.weak_ref(root);
//! assert_eq!(focus.get(&arena).unwrap().name, "root");
//!
//! // Tearing the tree down invalidates every observer.
//! arena.clear();
//! assert!(!focus.is_alive(&arena));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `keel-core` | `ArenaId`, `Generation`, `LivenessToken`, `Destructible` |
//! | [`arena`] | `keel-arena` | `Arena`, handles, array views, config, errors, stats |
//! | [`weak`] | `keel-weak` | `WeakRef`, `weak_ref`, `WeakKeyMap` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Identifiers and liveness primitives (`keel-core`).
pub use keel_core as types;

/// Generation-tagged bump arena (`keel-arena`).
///
/// [`arena::Arena`] is the allocator; [`arena::Handle`] and
/// [`arena::ArrayHandle`] address the values it holds.
pub use keel_arena as arena;

/// Weak references and weakly keyed maps (`keel-weak`).
pub use keel_weak as weak;

/// Common imports for typical Keel usage.
///
/// ```rust
/// use keel::prelude::*;
/// ```
pub mod prelude {
    pub use keel_arena::{Arena, ArenaConfig, ArenaError, ArrayHandle, Handle, MakeError};
    pub use keel_core::{Destructible, LivenessToken};
    pub use keel_weak::{weak_ref, Downgrade, WeakKeyMap, WeakRef};
}
