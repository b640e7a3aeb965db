//! Generation-tagged bump allocation for Keel widget trees.
//!
//! Provides an [`Arena`] that allocates long-lived objects cheaply and
//! releases them in bulk. Objects are never freed individually; the owner
//! calls [`Arena::clear`] to reset everything at once.
//!
//! # Architecture
//!
//! ```text
//! Arena (orchestrator, ArenaId + Generation)
//! ├── Budget (growth factor, byte limit, bytes reserved)
//! ├── ArenaStats (allocation counters)
//! └── IndexMap<TypeId, Box<dyn ErasedPool>>
//!     └── Pool<T> → SegmentList<T> → Segment<T>[] (fixed-capacity, 16-byte slots)
//! ```
//!
//! # Address stability
//!
//! A segment's storage is reserved once and never reallocated. Growth
//! appends a new segment instead, so objects keep their addresses until
//! the next `clear()`.
//!
//! # Staleness
//!
//! Every [`Handle`] carries the issuing arena's id and generation. `clear()`
//! advances the generation, so handles from before the reset resolve to
//! `None` even when a new object now occupies the same slot.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod array;
pub mod config;
pub mod error;
pub mod handle;
mod pool;
pub mod segment;
pub mod stats;

// Public re-exports for the primary API surface.
pub use arena::Arena;
pub use array::{ArrayMut, ArrayRef};
pub use config::ArenaConfig;
pub use error::{ArenaError, MakeError};
pub use handle::{ArrayHandle, Handle};
pub use segment::ALIGN;
pub use stats::ArenaStats;
