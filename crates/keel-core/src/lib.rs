//! Core types for the Keel memory-ownership layer.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the identifiers shared by the arena and weak-reference crates and the
//! destruction-flag capability that makes a type weakly referenceable.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod id;
pub mod liveness;

pub use id::{ArenaId, Generation};
pub use liveness::{Destructible, DestructionFlag, LivenessToken};
