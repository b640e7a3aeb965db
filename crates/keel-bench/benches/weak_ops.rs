//! Criterion micro-benchmarks for weak-reference access and map purging.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use keel_arena::Arena;
use keel_bench::reference_tree;
use keel_weak::{weak_ref, WeakKeyMap, WeakRef};

/// Benchmark: `WeakRef::get` over every node of a live reference tree.
fn bench_weak_get(c: &mut Criterion) {
    let mut arena = Arena::new();
    let nodes = reference_tree(&mut arena).unwrap();
    let refs: Vec<WeakRef<_>> = nodes.iter().map(|h| weak_ref(&arena, *h)).collect();

    c.bench_function("weak_get", |b| {
        b.iter(|| {
            let live = refs.iter().filter(|w| w.get(&arena).is_some()).count();
            black_box(live);
        });
    });
}

/// Benchmark: Purge a map where every other key is dead.
fn bench_purge_half_dead(c: &mut Criterion) {
    c.bench_function("purge_half_dead", |b| {
        b.iter(|| {
            let mut arena = Arena::new();
            let nodes = reference_tree(&mut arena).unwrap();
            let mut map = WeakKeyMap::with_capacity(nodes.len());
            for (i, h) in nodes.iter().enumerate() {
                map.insert(weak_ref(&arena, *h), i);
            }
            for h in nodes.iter().step_by(2) {
                if let Some(node) = arena.get(*h) {
                    node.liveness.mark_destroyed();
                }
            }
            black_box(map.purge_dead(&arena));
        });
    });
}

criterion_group!(benches, bench_weak_get, bench_purge_half_dead);
criterion_main!(benches);
