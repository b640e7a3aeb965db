//! Test fixtures for Keel development.
//!
//! Provides a weakly referenceable widget node ([`Node`]) and a drop
//! counter ([`DropCounter`]) for checking when an arena releases values.
//! Depends only on `keel-core` so every other crate can use it from its
//! unit tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{DropCounter, DropToken, Node};
