// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounded, eviction-tolerant position → item cache.

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::error::ConfigError;
use crate::types::{ItemId, ViewType};

/// A materialized item as stored in the [`PositionCache`].
#[derive(Clone, Debug)]
pub struct CachedItem<V> {
    /// Identity handed to the container.
    pub id: ItemId,
    /// Type the item was created for.
    pub view_type: ViewType,
    /// The renderable.
    pub view: V,
}

#[derive(Debug)]
struct Entry<V> {
    item: CachedItem<V>,
    last_used: u64,
}

/// Mapping from logical position to the item currently materialized there.
///
/// The cache is the single source of truth for "what is on screen", but it is
/// forgetful:
/// - the container may evict any entry at any time (window changes, full
///   invalidation), so [`get`](Self::get) and [`position_of`](Self::position_of)
///   must always be treated as possibly stale;
/// - it is bounded, and inserting into a full cache evicts the least recently
///   used entry and hands it back to the caller, who must detach it.
///
/// A position never maps to more than one item; inserting over an occupied
/// position displaces the previous item.
///
/// ```rust
/// use understory_pager::PositionCache;
///
/// let mut cache: PositionCache<&str> = PositionCache::new(2);
/// assert!(cache.get(0).is_none());
/// ```
#[derive(Debug)]
pub struct PositionCache<V> {
    entries: HashMap<usize, Entry<V>>,
    capacity: usize,
    clock: u64,
}

impl<V> PositionCache<V> {
    /// Creates an empty cache holding at most `capacity` items.
    ///
    /// A zero capacity is clamped to one; use [`try_new`](Self::try_new) to
    /// reject it instead.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "PositionCache capacity must be at least 1");
        Self {
            entries: HashMap::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
            clock: 0,
        }
    }

    /// Creates an empty cache, rejecting a zero capacity.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(Self::new(capacity))
    }

    /// Maximum number of live entries.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Stores `item` at `position`.
    ///
    /// Returns the item this displaced, with its position: either the previous
    /// occupant of `position`, or the least recently used entry when the cache
    /// was full. The caller owns the displaced item and is responsible for
    /// detaching it from the container.
    pub fn put(&mut self, position: usize, item: CachedItem<V>) -> Option<(usize, CachedItem<V>)> {
        let last_used = self.tick();
        let entry = Entry { item, last_used };
        if let Some(previous) = self.entries.insert(position, entry) {
            return Some((position, previous.item));
        }
        if self.entries.len() <= self.capacity {
            return None;
        }
        let victim = self
            .entries
            .iter()
            .filter(|(pos, _)| **pos != position)
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(pos, _)| *pos)?;
        log::trace!("position cache full, evicting position {victim}");
        self.entries
            .remove(&victim)
            .map(|entry| (victim, entry.item))
    }

    /// Returns the item at `position`, if still cached.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&CachedItem<V>> {
        self.entries.get(&position).map(|entry| &entry.item)
    }

    /// Mutable variant of [`get`](Self::get).
    pub fn get_mut(&mut self, position: usize) -> Option<&mut CachedItem<V>> {
        self.entries.get_mut(&position).map(|entry| &mut entry.item)
    }

    /// Marks `position` as recently used. Returns `false` if it is not cached.
    pub fn touch(&mut self, position: usize) -> bool {
        let now = self.tick();
        match self.entries.get_mut(&position) {
            Some(entry) => {
                entry.last_used = now;
                true
            }
            None => false,
        }
    }

    /// Removes and returns the item at `position`. Absent positions are a no-op.
    pub fn remove(&mut self, position: usize) -> Option<CachedItem<V>> {
        self.entries.remove(&position).map(|entry| entry.item)
    }

    /// Finds the position currently holding `id`.
    ///
    /// Linear in the number of live entries.
    #[must_use]
    pub fn position_of(&self, id: ItemId) -> Option<usize> {
        self.entries
            .iter()
            .find(|(_, entry)| entry.item.id == id)
            .map(|(pos, _)| *pos)
    }

    /// Returns the cached item with identity `id`, if any.
    #[must_use]
    pub fn find(&self, id: ItemId) -> Option<&CachedItem<V>> {
        self.entries
            .values()
            .map(|entry| &entry.item)
            .find(|item| item.id == id)
    }

    /// Mutable variant of [`find`](Self::find).
    pub fn find_mut(&mut self, id: ItemId) -> Option<&mut CachedItem<V>> {
        self.entries
            .values_mut()
            .map(|entry| &mut entry.item)
            .find(|item| item.id == id)
    }

    /// Iterates over cached positions in no particular order.
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.keys().copied()
    }

    /// Removes every entry whose position fails `keep`, returning the removed items.
    pub fn evict_where(
        &mut self,
        mut keep: impl FnMut(usize) -> bool,
    ) -> Vec<(usize, CachedItem<V>)> {
        let doomed: Vec<usize> = self
            .entries
            .keys()
            .copied()
            .filter(|pos| !keep(*pos))
            .collect();
        doomed
            .into_iter()
            .filter_map(|pos| self.entries.remove(&pos).map(|entry| (pos, entry.item)))
            .collect()
    }

    /// Removes and returns every entry.
    pub fn drain(&mut self) -> Vec<(usize, CachedItem<V>)> {
        self.entries
            .drain()
            .map(|(pos, entry)| (pos, entry.item))
            .collect()
    }
}
