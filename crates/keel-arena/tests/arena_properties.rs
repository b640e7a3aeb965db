//! Property tests for arena allocation, reset, and growth.

use keel_arena::{Arena, ArenaConfig, Handle, ALIGN};
use keel_test_utils::DropCounter;
use proptest::prelude::*;

fn arena_with_initial(slots: u32) -> Arena {
    Arena::with_config(ArenaConfig {
        initial_segment_slots: slots,
        ..ArenaConfig::new()
    })
    .unwrap()
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Bounds {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

proptest! {
    #[test]
    fn prop_allocations_never_overlap(
        initial in 1u32..16,
        values in proptest::collection::vec(any::<u64>(), 1..300),
    ) {
        let mut arena = arena_with_initial(initial);
        let handles: Vec<Handle<u64>> = values.iter().map(|v| arena.make(*v).unwrap()).collect();

        let mut addrs: Vec<usize> = handles
            .iter()
            .map(|h| arena.get(*h).unwrap() as *const u64 as usize)
            .collect();
        for addr in &addrs {
            prop_assert_eq!(addr % ALIGN, 0);
        }
        addrs.sort_unstable();
        for pair in addrs.windows(2) {
            prop_assert!(pair[1] - pair[0] >= std::mem::size_of::<u64>());
        }

        // Contents written before any growth are intact afterwards.
        for (h, v) in handles.iter().zip(&values) {
            prop_assert_eq!(arena.get(*h), Some(v));
        }
    }

    #[test]
    fn prop_clear_keeps_capacity(
        first in 1usize..200,
        second in 1usize..200,
    ) {
        let mut arena = arena_with_initial(8);
        for i in 0..first {
            arena.make(i as u32).unwrap();
        }
        let capacity = arena.capacity_bytes();
        prop_assert!(arena.used_bytes() <= capacity);

        arena.clear();
        prop_assert_eq!(arena.capacity_bytes(), capacity);
        prop_assert_eq!(arena.used_bytes(), 0);

        for i in 0..second {
            arena.make(i as u32).unwrap();
        }
        prop_assert!(arena.used_bytes() <= arena.capacity_bytes());
        if second <= first {
            prop_assert_eq!(arena.capacity_bytes(), capacity);
        }
    }

    #[test]
    fn prop_arrays_are_default_and_disjoint(
        sizes in proptest::collection::vec(0usize..40, 1..20),
    ) {
        let mut arena = arena_with_initial(4);
        let arrays: Vec<_> = sizes
            .iter()
            .map(|n| arena.alloc_array::<Bounds>(*n).unwrap())
            .collect();

        for (i, h) in arrays.iter().enumerate() {
            let mut view = arena.array_mut(*h).unwrap();
            prop_assert!(view.iter().all(|b| *b == Bounds::default()));
            for b in view.iter_mut() {
                b.x = i as f32;
            }
        }
        for (i, h) in arrays.iter().enumerate() {
            let view = arena.array(*h).unwrap();
            prop_assert_eq!(view.len(), sizes[i]);
            prop_assert!(view.iter().all(|b| b.x == i as f32));
        }
    }
}

#[test]
fn dropping_arena_drops_every_value() {
    let counter = DropCounter::new();
    {
        let mut arena = arena_with_initial(2);
        for _ in 0..10 {
            arena.make(counter.token()).unwrap();
        }
        assert_eq!(counter.dropped(), 0);
    }
    assert_eq!(counter.dropped(), 10);
}

#[test]
fn handles_from_every_prior_generation_stay_dead() {
    let mut arena = Arena::new();
    let mut stale = Vec::new();
    for round in 0..5u32 {
        stale.push(arena.make(round).unwrap());
        arena.clear();
        let fresh = arena.make(round + 100).unwrap();
        for old in &stale {
            assert!(arena.get(*old).is_none());
        }
        assert_eq!(arena.get(fresh), Some(&(round + 100)));
    }
    assert_eq!(arena.stats().clears, 5);
}
