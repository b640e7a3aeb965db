//! The generation-tagged bump arena.
//!
//! [`Arena`] is the allocator the widget-tree builder owns. It keeps one
//! [`SegmentList`](crate::segment::SegmentList) per element type and hands
//! out [`Handle`]s tagged with its [`ArenaId`] and current [`Generation`].
//!
//! The lifecycle is:
//! 1. `make` / `make_default` / `make_with` / `alloc_array` bump-allocate
//!    values and return handles.
//! 2. Handles resolve through `get` / `get_mut` / `array` / `array_mut`.
//! 3. `clear()` drops every value, keeps all reserved storage, and advances
//!    the generation so that every handle issued before it resolves to
//!    `None` from then on.

use std::any::TypeId;
use std::fmt;
use std::iter;

use indexmap::IndexMap;
use keel_core::{ArenaId, Generation};

use crate::array::{ArrayMut, ArrayRef};
use crate::config::ArenaConfig;
use crate::error::{ArenaError, MakeError};
use crate::handle::{ArrayHandle, Handle};
use crate::pool::{ErasedPool, Pool};
use crate::segment::{slot_bytes, Budget};
use crate::stats::ArenaStats;

/// Bump arena for long-lived objects of any `'static` type.
///
/// # Example
///
/// ```
/// use keel_arena::Arena;
///
/// let mut arena = Arena::new();
/// let title = arena.make(String::from("Preferences")).unwrap();
/// let count = arena.make_default::<u32>().unwrap();
///
/// assert_eq!(arena.get(title).map(String::as_str), Some("Preferences"));
/// assert_eq!(arena.get(count), Some(&0));
///
/// arena.clear();
/// assert!(arena.get(title).is_none());
/// ```
pub struct Arena {
    id: ArenaId,
    generation: Generation,
    /// One pool per element type, in first-use order.
    pools: IndexMap<TypeId, Box<dyn ErasedPool>>,
    budget: Budget,
    config: ArenaConfig,
    stats: ArenaStats,
}

impl Arena {
    /// Create an arena with the default configuration.
    pub fn new() -> Self {
        Self::build(ArenaConfig::new())
    }

    /// Create an arena with a custom configuration.
    ///
    /// Returns `ArenaError::InvalidConfig` if `config` fails validation.
    pub fn with_config(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ArenaConfig) -> Self {
        let budget = Budget {
            initial_slots: config.initial_segment_slots,
            growth_factor: config.growth_factor,
            max_bytes: config.max_bytes,
            reserved_bytes: 0,
        };
        Self {
            id: ArenaId::next(),
            generation: Generation::FIRST,
            pools: IndexMap::new(),
            budget,
            config,
            stats: ArenaStats::default(),
        }
    }

    /// Move `value` into a fresh slot.
    ///
    /// Grows the type's pool if the current segment is full. The only
    /// failures are storage failures; see [`ArenaError`].
    pub fn make<T: 'static>(&mut self, value: T) -> Result<Handle<T>, ArenaError> {
        let (segment, offset) = self.alloc_slots(1, iter::once(value))?;
        Ok(Handle::new(self.id, self.generation, segment, offset))
    }

    /// Allocate a default-initialised `T`.
    pub fn make_default<T: Default + 'static>(&mut self) -> Result<Handle<T>, ArenaError> {
        self.make(T::default())
    }

    /// Run a fallible constructor and place its result in the arena.
    ///
    /// A constructor failure is returned as [`MakeError::Construct`] and
    /// consumes no storage.
    pub fn make_with<T, E, F>(&mut self, ctor: F) -> Result<Handle<T>, MakeError<E>>
    where
        T: 'static,
        F: FnOnce() -> Result<T, E>,
    {
        let value = ctor().map_err(MakeError::Construct)?;
        Ok(self.make(value)?)
    }

    /// Allocate `count` contiguous default-initialised slots.
    ///
    /// For arrays of references use an optional element type such as
    /// `Option<Handle<U>>`, whose default is "no object". A `count` of zero
    /// returns an empty handle without touching any pool.
    pub fn alloc_array<T: Default + 'static>(
        &mut self,
        count: usize,
    ) -> Result<ArrayHandle<T>, ArenaError> {
        if count == 0 {
            return Ok(ArrayHandle::new(
                Handle::new(self.id, self.generation, 0, 0),
                0,
            ));
        }
        let values = iter::repeat_with(T::default).take(count);
        let (segment, offset) = self.alloc_slots(count, values)?;
        Ok(ArrayHandle::new(
            Handle::new(self.id, self.generation, segment, offset),
            count as u32,
        ))
    }

    fn alloc_slots<T, I>(&mut self, len: usize, values: I) -> Result<(u16, u32), ArenaError>
    where
        T: 'static,
        I: IntoIterator<Item = T>,
    {
        let type_id = TypeId::of::<T>();
        let location = match self.pools.get_mut(&type_id) {
            Some(pool) => pool
                .as_any_mut()
                .downcast_mut::<Pool<T>>()
                .expect("pools are keyed by TypeId::of::<T>()")
                .segments
                .alloc(len, values, &mut self.budget)?,
            None => {
                // Register the pool only once it holds something.
                let mut pool = Pool::<T>::new();
                let location = pool.segments.alloc(len, values, &mut self.budget)?;
                self.pools.insert(type_id, Box::new(pool));
                location
            }
        };
        self.stats.record_alloc(len, len * slot_bytes::<T>());
        Ok(location)
    }

    fn issued_here(&self, arena: ArenaId, generation: Generation) -> bool {
        arena == self.id && generation == self.generation
    }

    fn pool<T: 'static>(&self) -> Option<&Pool<T>> {
        self.pools
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<Pool<T>>()
    }

    fn pool_mut<T: 'static>(&mut self) -> Option<&mut Pool<T>> {
        self.pools
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<Pool<T>>()
    }

    /// Resolve a handle.
    ///
    /// Returns `None` if the handle was issued by another arena or before
    /// the most recent `clear()`.
    pub fn get<T: 'static>(&self, handle: Handle<T>) -> Option<&T> {
        if !self.issued_here(handle.arena, handle.generation) {
            return None;
        }
        self.pool::<T>()?.segments.get(handle.segment, handle.offset)
    }

    /// Resolve a handle mutably.
    pub fn get_mut<T: 'static>(&mut self, handle: Handle<T>) -> Option<&mut T> {
        if !self.issued_here(handle.arena, handle.generation) {
            return None;
        }
        self.pool_mut::<T>()?
            .segments
            .get_mut(handle.segment, handle.offset)
    }

    /// Whether `handle` currently resolves.
    pub fn contains<T: 'static>(&self, handle: Handle<T>) -> bool {
        self.get(handle).is_some()
    }

    /// Resolve an array handle to a shared view.
    pub fn array<T: 'static>(&self, handle: ArrayHandle<T>) -> Option<ArrayRef<'_, T>> {
        let first = handle.first;
        if !self.issued_here(first.arena, first.generation) {
            return None;
        }
        if handle.is_empty() {
            return Some(ArrayRef::new(&[]));
        }
        self.pool::<T>()?
            .segments
            .slots(first.segment, first.offset, handle.len)
            .map(ArrayRef::new)
    }

    /// Resolve an array handle to a mutable view.
    pub fn array_mut<T: 'static>(&mut self, handle: ArrayHandle<T>) -> Option<ArrayMut<'_, T>> {
        let first = handle.first;
        if !self.issued_here(first.arena, first.generation) {
            return None;
        }
        if handle.is_empty() {
            return Some(ArrayMut::new(&mut []));
        }
        self.pool_mut::<T>()?
            .segments
            .slots_mut(first.segment, first.offset, handle.len)
            .map(ArrayMut::new)
    }

    /// Iterate over every live `T` (array elements included) with its handle.
    pub fn iter<T: 'static>(&self) -> impl Iterator<Item = (Handle<T>, &T)> + '_ {
        let (id, generation) = (self.id, self.generation);
        self.pool::<T>()
            .into_iter()
            .flat_map(|pool| pool.segments.iter())
            .map(move |(segment, offset, value)| {
                (Handle::new(id, generation, segment, offset), value)
            })
    }

    /// Drop every value and rewind all pools, keeping reserved storage.
    ///
    /// Values are dropped pool by pool in allocation order; any
    /// [`LivenessToken`](keel_core::LivenessToken) they own flips to
    /// destroyed. Every handle issued before this call stops resolving.
    pub fn clear(&mut self) {
        let released = self.used_bytes();
        for pool in self.pools.values_mut() {
            pool.reset();
        }

        match self.generation.next() {
            Some(next) => self.generation = next,
            None => {
                // Generations exhausted: take a fresh identity so no old
                // handle can ever match again.
                self.id = ArenaId::next();
                self.generation = Generation::FIRST;
                tracing::debug!(arena = %self.id, "arena generation counter wrapped; new arena id");
            }
        }
        self.stats.record_clear();

        tracing::debug!(
            arena = %self.id,
            generation = %self.generation,
            released,
            reserved = self.budget.reserved_bytes,
            "arena cleared"
        );
    }

    /// This arena's identity.
    pub fn id(&self) -> ArenaId {
        self.id
    }

    /// The current generation.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The configuration this arena was built with.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Bytes occupied by live allocations (length-used).
    pub fn used_bytes(&self) -> usize {
        self.pools.values().map(|pool| pool.used_bytes()).sum()
    }

    /// Bytes reserved across all pools. Never shrinks.
    pub fn capacity_bytes(&self) -> usize {
        self.budget.reserved_bytes
    }

    /// Number of live slots across all types.
    pub fn len(&self) -> usize {
        self.pools.values().map(|pool| pool.used_slots()).sum()
    }

    /// Whether no slot is currently allocated.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of distinct element types that have a pool.
    pub fn type_count(&self) -> usize {
        self.pools.len()
    }

    /// Number of segments reserved across all pools.
    pub fn segment_count(&self) -> usize {
        self.pools.values().map(|pool| pool.segment_count()).sum()
    }

    /// Allocation counters.
    pub fn stats(&self) -> &ArenaStats {
        &self.stats
    }

    /// Zero the allocation counters. Live allocations stay in place and
    /// become the new occupancy baseline.
    pub fn reset_stats(&mut self) {
        let used = self.used_bytes();
        self.stats.reset(used);
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types: Vec<&'static str> = self.pools.values().map(|pool| pool.type_name()).collect();
        f.debug_struct("Arena")
            .field("id", &self.id)
            .field("generation", &self.generation)
            .field("types", &types)
            .field("used_bytes", &self.used_bytes())
            .field("capacity_bytes", &self.capacity_bytes())
            .finish()
    }
}
