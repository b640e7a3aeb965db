//! Benchmark profiles and utilities for the Keel memory layer.
//!
//! Provides a widget-tree node type and tree builders shared by the
//! benchmarks and examples:
//!
//! - [`build_tree`]: breadth-first tree of [`TreeNode`]s with a fixed fanout
//! - [`reference_tree`]: 4-level, fanout-8 tree (4681 nodes)

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use keel_arena::{Arena, ArenaError, Handle};
use keel_core::{Destructible, LivenessToken};

/// A widget-tree node with a back-reference to its parent.
#[derive(Debug)]
pub struct TreeNode {
    /// Distance from the root.
    pub depth: u32,
    /// Parent node; `None` for the root.
    pub parent: Option<Handle<TreeNode>>,
    /// Destruction flag.
    pub liveness: LivenessToken,
}

impl Destructible for TreeNode {
    fn liveness(&self) -> &LivenessToken {
        &self.liveness
    }
}

/// Allocate a tree of `depth` levels below the root, each node having
/// `fanout` children. Returns every handle in breadth-first order.
pub fn build_tree(
    arena: &mut Arena,
    depth: u32,
    fanout: usize,
) -> Result<Vec<Handle<TreeNode>>, ArenaError> {
    let root = arena.make(TreeNode {
        depth: 0,
        parent: None,
        liveness: LivenessToken::new(),
    })?;
    let mut nodes = vec![root];
    let mut level_start = 0;

    for level in 1..=depth {
        let level_end = nodes.len();
        for parent_index in level_start..level_end {
            let parent = nodes[parent_index];
            for _ in 0..fanout {
                nodes.push(arena.make(TreeNode {
                    depth: level,
                    parent: Some(parent),
                    liveness: LivenessToken::new(),
                })?);
            }
        }
        level_start = level_end;
    }
    Ok(nodes)
}

/// The reference profile: 4 levels below the root, fanout 8.
pub fn reference_tree(arena: &mut Arena) -> Result<Vec<Handle<TreeNode>>, ArenaError> {
    build_tree(arena, 4, 8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_tree_node_count() {
        let mut arena = Arena::new();
        let nodes = reference_tree(&mut arena).unwrap();
        assert_eq!(nodes.len(), 1 + 8 + 64 + 512 + 4096);
        assert_eq!(arena.len(), nodes.len());
    }

    #[test]
    fn parents_are_one_level_up() {
        let mut arena = Arena::new();
        let nodes = build_tree(&mut arena, 2, 3).unwrap();
        for h in &nodes[1..] {
            let node = arena.get(*h).unwrap();
            let parent = arena.get(node.parent.unwrap()).unwrap();
            assert_eq!(parent.depth + 1, node.depth);
        }
    }
}
