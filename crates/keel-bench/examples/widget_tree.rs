//! Widget-tree rebuild loop example.
//!
//! Demonstrates: build tree → hand out weak references to observers →
//! tear down part of the tree → purge observer caches → clear and rebuild.
//!
//! Run with `RUST_LOG=info,keel_arena=debug` to see per-frame events,
//! segment growth and resets.

use keel_arena::Arena;
use keel_bench::{build_tree, TreeNode};
use keel_weak::{weak_ref, Downgrade, WeakKeyMap, WeakRef};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Keel Widget Tree Example ===\n");

    let mut arena = Arena::new();
    let mut focus: WeakRef<TreeNode> = WeakRef::null();
    let mut hover_cache: WeakKeyMap<TreeNode, u32> = WeakKeyMap::new();

    for frame in 0..3 {
        arena.clear();
        println!(
            "Frame {frame}: focus alive before rebuild = {}",
            focus.is_alive(&arena)
        );

        let nodes = build_tree(&mut arena, 3, 4).unwrap();
        println!(
            "  built {} nodes, {} bytes used / {} reserved in {} segments",
            nodes.len(),
            arena.used_bytes(),
            arena.capacity_bytes(),
            arena.segment_count(),
        );

        // Observers hold weak references only.
        focus = arena.weak_ref(nodes[nodes.len() - 1]);
        for (i, h) in nodes.iter().enumerate().take(16) {
            hover_cache.insert(weak_ref(&arena, *h), i as u32);
        }

        // Collapse the first subtree: every node whose parent is node 1.
        let collapsed: Vec<_> = arena
            .iter::<TreeNode>()
            .filter(|(_, node)| node.parent == Some(nodes[1]))
            .map(|(h, _)| h)
            .collect();
        for h in &collapsed {
            if let Some(node) = arena.get(*h) {
                node.liveness.mark_destroyed();
            }
        }

        let purged = hover_cache.purge_dead(&arena);
        println!(
            "  collapsed {} nodes, purged {purged} dead cache entries, {} remain",
            collapsed.len(),
            hover_cache.len(),
        );

        tracing::info!(
            frame,
            generation = %arena.generation(),
            collapsed = collapsed.len(),
            purged,
            "frame rebuilt"
        );

        if let Some(node) = focus.get(&arena) {
            println!("  focused node depth = {}", node.depth);
        }
    }

    let stats = arena.stats();
    println!(
        "\nDone: {} allocations, {} clears, peak {} bytes",
        stats.allocations, stats.clears, stats.peak_used_bytes
    );
}
