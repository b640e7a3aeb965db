//! Hash map keyed by weak references.
//!
//! Components that cache per-widget state (focus trackers, event-dispatch
//! caches) key it by [`WeakRef`]. Dead keys are removed in bulk with
//! [`WeakKeyMap::purge_dead`], which uses the same liveness test as
//! [`WeakRef::get`].

use indexmap::IndexMap;
use keel_arena::Arena;
use keel_core::Destructible;

use crate::weak::WeakRef;

/// Insertion-ordered map from [`WeakRef<T>`] to `V`.
pub struct WeakKeyMap<T, V> {
    entries: IndexMap<WeakRef<T>, V>,
}

impl<T, V> WeakKeyMap<T, V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Create an empty map with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Insert a value, returning the previous value for an equal key.
    pub fn insert(&mut self, key: WeakRef<T>, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    /// The value stored for `key`, dead or alive.
    pub fn get(&self, key: &WeakRef<T>) -> Option<&V> {
        self.entries.get(key)
    }

    /// Mutable access to the value stored for `key`.
    pub fn get_mut(&mut self, key: &WeakRef<T>) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    /// Remove `key`, preserving the order of the remaining entries.
    ///
    /// Works for dead keys too: identity does not depend on the target.
    pub fn remove(&mut self, key: &WeakRef<T>) -> Option<V> {
        self.entries.shift_remove(key)
    }

    /// Whether an entry exists for `key`.
    pub fn contains_key(&self, key: &WeakRef<T>) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries, dead ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&WeakRef<T>, &V)> {
        self.entries.iter()
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T: Destructible + 'static, V> WeakKeyMap<T, V> {
    /// Remove every entry whose key no longer resolves in `arena`.
    ///
    /// Afterwards `iter_live(arena)` yields every remaining entry.
    /// Returns the number of entries removed.
    pub fn purge_dead(&mut self, arena: &Arena) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.is_alive(arena));
        let removed = before - self.entries.len();
        tracing::trace!(removed, remaining = self.entries.len(), "purged dead weak keys");
        removed
    }

    /// Iterate over entries whose target is alive, resolved through `arena`.
    pub fn iter_live<'a>(&'a self, arena: &'a Arena) -> impl Iterator<Item = (&'a T, &'a V)> + 'a {
        self.entries
            .iter()
            .filter_map(move |(key, value)| key.get(arena).map(|object| (object, value)))
    }
}

impl<T, V> Default for WeakKeyMap<T, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, V> FromIterator<(WeakRef<T>, V)> for WeakKeyMap<T, V> {
    fn from_iter<I: IntoIterator<Item = (WeakRef<T>, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weak::weak_ref;
    use keel_test_utils::Node;

    #[test]
    fn purge_removes_only_dead_keys() {
        let mut arena = Arena::new();
        let a = arena.make(Node::new("a")).unwrap();
        let b = arena.make(Node::new("b")).unwrap();

        let mut map = WeakKeyMap::new();
        map.insert(weak_ref(&arena, a), 1);
        map.insert(weak_ref(&arena, b), 2);

        arena.get(a).unwrap().teardown();
        assert_eq!(map.purge_dead(&arena), 1);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&weak_ref(&arena, b)), Some(&2));
        assert_eq!(map.purge_dead(&arena), 0);
    }

    #[test]
    fn dead_key_can_be_removed_by_identity() {
        let mut arena = Arena::new();
        let h = arena.make(Node::new("x")).unwrap();
        let key = weak_ref(&arena, h);

        let mut map = WeakKeyMap::new();
        map.insert(key.clone(), "cached");
        arena.clear();

        assert!(map.contains_key(&key));
        assert_eq!(map.remove(&key), Some("cached"));
        assert!(map.is_empty());
    }

    #[test]
    fn insert_with_equal_key_replaces() {
        let mut arena = Arena::new();
        let h = arena.make(Node::new("x")).unwrap();
        let mut map = WeakKeyMap::new();
        assert_eq!(map.insert(weak_ref(&arena, h), 1), None);
        assert_eq!(map.insert(weak_ref(&arena, h), 2), Some(1));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn iter_live_skips_dead_entries() {
        let mut arena = Arena::new();
        let handles: Vec<_> = (0..4)
            .map(|i| arena.make(Node::new(format!("n{i}"))).unwrap())
            .collect();
        let map: WeakKeyMap<Node, usize> = handles
            .iter()
            .enumerate()
            .map(|(i, h)| (weak_ref(&arena, *h), i))
            .collect();

        arena.get(handles[1]).unwrap().teardown();
        let live: Vec<_> = map
            .iter_live(&arena)
            .map(|(node, i)| (node.name.as_str(), *i))
            .collect();
        assert_eq!(live, vec![("n0", 0), ("n2", 2), ("n3", 3)]);
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn purge_agrees_with_iter_live_after_replace() {
        let mut arena = Arena::new();
        let a = arena.make(Node::new("a")).unwrap();
        let b = arena.make(Node::new("b")).unwrap();
        let mut map = WeakKeyMap::new();
        map.insert(weak_ref(&arena, a), 1);
        map.insert(weak_ref(&arena, b), 2);

        let _detached = std::mem::replace(arena.get_mut(a).unwrap(), Node::new("a2"));
        assert_eq!(map.purge_dead(&arena), 1);
        assert_eq!(map.len(), map.iter_live(&arena).count());
    }
}
