//! Bounded object pools for transient entities
//!
//! Projectiles, dust motes, pickups and particles are spawned and despawned
//! constantly. Each type gets an `EntityPool` sized once at startup and never
//! resized:
//! - `acquire` reuses a free slot, or over-allocates a transient slot when the
//!   free list is empty (bursts must never break gameplay)
//! - `release` puts the slot back on the free list while it has room, and
//!   retires it otherwise
//! - handles carry a generation, so a handle used after release is rejected
//!   instead of aliasing whatever reused the slot

use std::fmt;
use std::marker::PhantomData;

/// Handle to a live pooled entity
pub struct PoolHandle<T> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PoolHandle<T> {
    fn new(index: usize, generation: u32) -> Self {
        Self {
            index: index as u32,
            generation,
            _marker: PhantomData,
        }
    }

    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

// Manual impls: derives would needlessly require `T: Clone` etc.
impl<T> Clone for PoolHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PoolHandle<T> {}

impl<T> PartialEq for PoolHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for PoolHandle<T> {}

impl<T> fmt::Debug for PoolHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PoolHandle({}v{})", self.index, self.generation)
    }
}

/// Lifetime counters, useful for tuning capacities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub acquired: u64,
    pub released: u64,
    /// Acquires served by a transient slot because the free list was empty
    pub overflowed: u64,
    /// Releases that were ignored (stale or double release)
    pub rejected: u64,
}

#[derive(Debug, Clone)]
struct Slot<T> {
    value: T,
    generation: u32,
    live: bool,
}

/// A bounded free list over preallocated slots
#[derive(Debug, Clone)]
pub struct EntityPool<T> {
    slots: Vec<Slot<T>>,
    /// Indices ready for reuse. Never longer than `capacity`.
    free: Vec<usize>,
    /// Slots released while the free list was full; reused only for overflow
    retired: Vec<usize>,
    capacity: usize,
    next_generation: u32,
    stats: PoolStats,
}

impl<T: Default> EntityPool<T> {
    /// Create a pool with `capacity` preallocated slots
    pub fn new(capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|_| Slot {
                value: T::default(),
                generation: 0,
                live: false,
            })
            .collect();
        Self {
            slots,
            free: (0..capacity).rev().collect(),
            retired: Vec::new(),
            capacity,
            next_generation: 1,
            stats: PoolStats::default(),
        }
    }
}

impl<T> EntityPool<T> {
    /// Take a slot and initialize it with `value`
    pub fn acquire(&mut self, value: T) -> PoolHandle<T> {
        let generation = self.next_generation;
        self.next_generation = self.next_generation.wrapping_add(1).max(1);
        self.stats.acquired += 1;

        let index = if let Some(index) = self.free.pop() {
            index
        } else {
            self.stats.overflowed += 1;
            log::debug!(
                "pool of {} exhausted, allocating transient slot",
                self.capacity
            );
            match self.retired.pop() {
                Some(index) => index,
                None => {
                    self.slots.push(Slot {
                        value,
                        generation,
                        live: true,
                    });
                    return PoolHandle::new(self.slots.len() - 1, generation);
                }
            }
        };

        let slot = &mut self.slots[index];
        slot.value = value;
        slot.generation = generation;
        slot.live = true;
        PoolHandle::new(index, generation)
    }

    /// Return a handle's slot. Returns false for stale or repeated releases.
    ///
    /// Slots beyond what the free list holds are retired rather than freed,
    /// so after a burst the slot vector stays at the peak live count and is
    /// reused by later overflow.
    pub fn release(&mut self, handle: PoolHandle<T>) -> bool {
        let index = handle.index();
        let Some(slot) = self.slots.get_mut(index) else {
            self.stats.rejected += 1;
            return false;
        };
        if !slot.live || slot.generation != handle.generation {
            self.stats.rejected += 1;
            return false;
        }

        slot.live = false;
        self.stats.released += 1;
        if self.free.len() < self.capacity {
            self.free.push(index);
        } else {
            self.retired.push(index);
        }
        true
    }

    /// Whether the handle still refers to a live entity
    pub fn is_live(&self, handle: PoolHandle<T>) -> bool {
        self.get(handle).is_some()
    }

    pub fn get(&self, handle: PoolHandle<T>) -> Option<&T> {
        self.slots
            .get(handle.index())
            .filter(|s| s.live && s.generation == handle.generation)
            .map(|s| &s.value)
    }

    pub fn get_mut(&mut self, handle: PoolHandle<T>) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index())
            .filter(|s| s.live && s.generation == handle.generation)
            .map(|s| &mut s.value)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Preallocated plus overflow slots; never shrinks
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.live).count()
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }
}

/// A pool plus the ordered collection that owns its live handles.
///
/// The handle list is the single source of truth for what is live; anything
/// removed from it is released exactly once, here.
#[derive(Debug, Clone)]
pub struct PooledList<T> {
    pool: EntityPool<T>,
    live: Vec<PoolHandle<T>>,
}

impl<T: Default> PooledList<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            pool: EntityPool::new(capacity),
            live: Vec::with_capacity(capacity),
        }
    }
}

impl<T> PooledList<T> {
    /// Acquire a slot for `value` and track it
    pub fn spawn(&mut self, value: T) -> PoolHandle<T> {
        let handle = self.pool.acquire(value);
        self.live.push(handle);
        handle
    }

    /// Remove a specific entity. Returns false if it was not live.
    pub fn despawn(&mut self, handle: PoolHandle<T>) -> bool {
        let Some(pos) = self.live.iter().position(|h| *h == handle) else {
            return false;
        };
        self.live.remove(pos);
        self.pool.release(handle)
    }

    /// Keep entities for which `f` returns true; release the rest.
    /// Returns how many were removed.
    pub fn retain_mut<F>(&mut self, mut f: F) -> usize
    where
        F: FnMut(&mut T) -> bool,
    {
        let Self { pool, live } = self;
        let mut removed = 0;
        live.retain(|&handle| {
            let keep = pool.get_mut(handle).is_some_and(&mut f);
            if !keep {
                pool.release(handle);
                removed += 1;
            }
            keep
        });
        removed
    }

    /// Release everything
    pub fn clear(&mut self) {
        for handle in self.live.drain(..) {
            self.pool.release(handle);
        }
    }

    pub fn get(&self, handle: PoolHandle<T>) -> Option<&T> {
        self.pool.get(handle)
    }

    pub fn get_mut(&mut self, handle: PoolHandle<T>) -> Option<&mut T> {
        self.pool.get_mut(handle)
    }

    pub fn handles(&self) -> &[PoolHandle<T>] {
        &self.live
    }

    /// Live entities in spawn order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.live.iter().filter_map(|h| self.pool.get(*h))
    }

    /// Live entities, mutably, in spawn order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        let order: Vec<usize> = self.live.iter().map(PoolHandle::index).collect();
        let mut by_slot: Vec<Option<&mut T>> = self
            .pool
            .slots
            .iter_mut()
            .map(|s| s.live.then_some(&mut s.value))
            .collect();
        order
            .into_iter()
            .filter_map(move |i| by_slot.get_mut(i).and_then(Option::take))
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn pool(&self) -> &EntityPool<T> {
        &self.pool
    }
}
