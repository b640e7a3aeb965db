//! Reusable fixtures.
//!
//! - [`Node`]: a widget-tree node that owns a [`LivenessToken`].
//! - [`DropCounter`]: counts drops of the [`DropToken`]s it hands out.

use std::cell::Cell;
use std::rc::Rc;

use keel_core::{Destructible, LivenessToken};

/// Minimal widget node: a name, a depth, and a destruction flag.
#[derive(Debug)]
pub struct Node {
    pub name: String,
    pub depth: u32,
    pub liveness: LivenessToken,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self::at_depth(name, 0)
    }

    pub fn at_depth(name: impl Into<String>, depth: u32) -> Self {
        Self {
            name: name.into(),
            depth,
            liveness: LivenessToken::new(),
        }
    }

    /// Explicit teardown: marks the node destroyed without dropping it.
    pub fn teardown(&self) {
        self.liveness.mark_destroyed();
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("")
    }
}

impl Destructible for Node {
    fn liveness(&self) -> &LivenessToken {
        &self.liveness
    }
}

/// Counts how many of its tokens have been dropped.
#[derive(Clone, Default)]
pub struct DropCounter {
    dropped: Rc<Cell<usize>>,
}

impl DropCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new token that bumps this counter when dropped.
    pub fn token(&self) -> DropToken {
        DropToken {
            dropped: Rc::clone(&self.dropped),
        }
    }

    pub fn dropped(&self) -> usize {
        self.dropped.get()
    }
}

pub struct DropToken {
    dropped: Rc<Cell<usize>>,
}

impl Drop for DropToken {
    fn drop(&mut self) {
        self.dropped.set(self.dropped.get() + 1);
    }
}
