//! End-to-end lifetime scenarios: arena-allocated widgets observed through
//! weak references by components that do not own them.

use keel_arena::{Arena, ArenaConfig, Handle};
use keel_test_utils::Node;
use keel_weak::{weak_ref, Downgrade, WeakKeyMap, WeakRef};
use proptest::prelude::*;

#[test]
fn purging_half_dead_map_keeps_odd_entries() {
    let mut arena = Arena::new();
    let handles: Vec<Handle<Node>> = (0..100)
        .map(|i| arena.make(Node::new(format!("node-{i}"))).unwrap())
        .collect();

    let mut map = WeakKeyMap::new();
    for (i, h) in handles.iter().enumerate() {
        map.insert(weak_ref(&arena, *h), i);
    }

    for h in handles.iter().step_by(2) {
        arena.get(*h).unwrap().teardown();
    }

    assert_eq!(map.purge_dead(&arena), 50);
    assert_eq!(map.len(), 50);
    for (key, value) in map.iter() {
        assert_eq!(value % 2, 1);
        let node = key.get(&arena).unwrap();
        assert_eq!(node.name, format!("node-{value}"));
    }
}

#[test]
fn references_survive_arena_growth() {
    let mut arena = Arena::with_config(ArenaConfig {
        initial_segment_slots: 2,
        ..ArenaConfig::new()
    })
    .unwrap();
    let first = arena.make(Node::new("first")).unwrap();
    let w = arena.weak_ref(first);

    for i in 0..500 {
        arena.make(Node::new(format!("filler-{i}"))).unwrap();
    }
    assert!(arena.segment_count() > 1);
    assert_eq!(w.get(&arena).map(|n| n.name.as_str()), Some("first"));
}

#[test]
fn rebuild_cycle_invalidates_previous_frame() {
    let mut arena = Arena::new();
    let mut focus: WeakRef<Node> = WeakRef::null();

    for frame in 0..3 {
        arena.clear();
        let root = arena.make(Node::at_depth(format!("root-{frame}"), 0)).unwrap();
        let child = arena.make(Node::at_depth(format!("child-{frame}"), 1)).unwrap();

        if frame > 0 {
            assert!(focus.get(&arena).is_none(), "focus leaked across rebuild");
        }
        assert!(arena.get(root).is_some());
        focus = weak_ref(&arena, child);
        assert_eq!(focus.get(&arena).unwrap().depth, 1);
    }
}

#[test]
fn array_of_weak_refs_starts_null() {
    let mut arena = Arena::new();
    let target = arena.make(Node::new("target")).unwrap();
    let slots = arena.alloc_array::<WeakRef<Node>>(4).unwrap();
    let w = weak_ref(&arena, target);
    {
        let view = arena.array(slots).unwrap();
        assert!(view.iter().all(WeakRef::is_null));
    }
    arena.array_mut(slots).unwrap()[2] = w.clone();
    let view = arena.array(slots).unwrap();
    assert_eq!(view[2], w);
    assert!(view[2].is_alive(&arena));
}

proptest! {
    #[test]
    fn prop_destroyed_set_matches_dead_refs(
        destroyed in proptest::collection::vec(any::<bool>(), 1..200),
    ) {
        let mut arena = Arena::new();
        let handles: Vec<_> = destroyed
            .iter()
            .map(|_| arena.make(Node::default()).unwrap())
            .collect();
        let refs: Vec<_> = handles.iter().map(|h| weak_ref(&arena, *h)).collect();

        for (h, kill) in handles.iter().zip(&destroyed) {
            if *kill {
                arena.get(*h).unwrap().teardown();
            }
        }

        for (w, kill) in refs.iter().zip(&destroyed) {
            prop_assert_eq!(w.is_alive(&arena), !*kill);
            prop_assert_eq!(w.may_be_alive(), !*kill);
            prop_assert_eq!(w.get(&arena).is_some(), !*kill);
        }

        let mut map: WeakKeyMap<Node, usize> =
            refs.iter().cloned().enumerate().map(|(i, w)| (w, i)).collect();
        let dead = destroyed.iter().filter(|d| **d).count();
        prop_assert_eq!(map.purge_dead(&arena), dead);
        prop_assert_eq!(map.len(), destroyed.len() - dead);
    }

    #[test]
    fn prop_identity_is_stable_across_clear(count in 1usize..64) {
        use std::collections::HashSet;

        let mut arena = Arena::new();
        let refs: Vec<_> = (0..count)
            .map(|_| {
                let h = arena.make(Node::default()).unwrap();
                weak_ref(&arena, h)
            })
            .collect();
        let set: HashSet<_> = refs.iter().cloned().collect();
        prop_assert_eq!(set.len(), count);

        arena.clear();
        for w in &refs {
            prop_assert!(!w.is_alive(&arena));
            prop_assert!(set.contains(w));
        }
    }
}
