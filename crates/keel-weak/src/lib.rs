//! Non-owning weak references to Keel arena objects.
//!
//! Any type implementing [`Destructible`](keel_core::Destructible) can be
//! referenced weakly. A [`WeakRef`] never extends its target's lifetime
//! and never reads a destroyed target: it checks the target's destruction
//! flag, then the arena generation, before every access.
//!
//! ```
//! use keel_arena::Arena;
//! use keel_core::{Destructible, LivenessToken};
//! use keel_weak::{weak_ref, WeakKeyMap};
//!
//! struct Button {
//!     label: &'static str,
//!     liveness: LivenessToken,
//! }
//!
//! impl Destructible for Button {
//!     fn liveness(&self) -> &LivenessToken {
//!         &self.liveness
//!     }
//! }
//!
//! let mut arena = Arena::new();
//! let ok = arena.make(Button { label: "OK", liveness: LivenessToken::new() }).unwrap();
//!
//! let focus = weak_ref(&arena, ok);
//! assert_eq!(focus.get(&arena).map(|b| b.label), Some("OK"));
//!
//! let mut hover_state = WeakKeyMap::new();
//! hover_state.insert(focus.clone(), true);
//!
//! arena.clear();
//! assert!(focus.get(&arena).is_none());
//! assert_eq!(hover_state.purge_dead(&arena), 1);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod map;
pub mod weak;

pub use map::WeakKeyMap;
pub use weak::{weak_ref, Downgrade, WeakRef};
