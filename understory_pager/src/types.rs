// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types shared by the cache, the adapter, and the discard protocol.

/// Identifier for a materialized item.
///
/// Identifiers are handed out from a monotonic counter and are never reused, so a
/// stale `ItemId` can never alias a newer item. The renderable itself stays owned
/// by the [`PositionCache`](crate::PositionCache); containers refer to it by id.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ItemId(pub(crate) u64);

impl ItemId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw counter value, mostly useful for logging.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// View type tag used to decide whether a cached item can be rebound.
///
/// Single-type pagers never override [`ItemSource::view_type`](crate::ItemSource::view_type)
/// and every item carries [`ViewType::UNTYPED`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ViewType(pub i32);

impl ViewType {
    /// Sentinel for pagers with a single item type.
    pub const UNTYPED: Self = Self(-1);
}

impl Default for ViewType {
    fn default() -> Self {
        Self::UNTYPED
    }
}

/// Coarse state of the discard protocol, as seen by input handling.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AnimationState {
    /// No discard cycle is in flight.
    Idle,
    /// The discarded item is animating out (or a swipe release is settling).
    Discarding,
    /// Neighbors are sliding into the vacated slot, or the finish notification is
    /// waiting for the next tick.
    ///
    /// A cycle also passes through this state when no collapse runs at all:
    /// when the discarded item was evicted during its out-animation, or when it
    /// had no neighbor to slide in. Input stays blocked until the finish is
    /// delivered.
    Collapsing,
}

impl AnimationState {
    /// Returns `true` for every state except [`AnimationState::Idle`].
    #[must_use]
    pub const fn is_busy(self) -> bool {
        !matches!(self, Self::Idle)
    }
}
