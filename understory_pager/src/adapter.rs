// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Item lifecycle: materialize, recycle, and window maintenance.

use core::time::Duration;

use crate::cache::{CachedItem, PositionCache};
use crate::discard::{DiscardFinished, Phase};
use crate::error::ConfigError;
use crate::host::{ItemSource, PagerContainer};
use crate::schedule::TaskQueue;
use crate::types::{ItemId, ViewType};
use crate::window::PageWindow;

/// Out-animation used by [`PagerAdapter::discard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardStyle {
    /// Slide up by the item's height with accelerating easing.
    SlideUp {
        /// Running time of the slide.
        duration: Duration,
    },
    /// Fade opacity from its current value to zero with linear easing.
    Fade {
        /// Running time of the fade.
        duration: Duration,
    },
}

impl DiscardStyle {
    /// Slide up over 400ms.
    pub const SLIDE_UP: Self = Self::SlideUp {
        duration: Duration::from_millis(400),
    };

    /// Fade out over 300ms.
    pub const FADE: Self = Self::Fade {
        duration: Duration::from_millis(300),
    };
}

impl Default for DiscardStyle {
    fn default() -> Self {
        Self::SLIDE_UP
    }
}

/// Settings for a [`PagerAdapter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerConfig {
    /// Pages kept materialized on each side of the current page.
    ///
    /// The far neighbor of a collapse is two pages away, so values below 2
    /// silently skip the far-neighbor follow-through.
    pub offscreen_limit: usize,
    /// Maximum number of items held by the position cache.
    pub cache_capacity: usize,
    /// Out-animation used by [`PagerAdapter::discard`].
    pub discard_style: DiscardStyle,
    /// Running time of the neighbor slide-in.
    pub collapse_duration: Duration,
}

impl PagerConfig {
    /// Validates the settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        let window = PageWindow::new(self.offscreen_limit).span();
        if window > self.cache_capacity {
            return Err(ConfigError::WindowExceedsCapacity {
                window,
                capacity: self.cache_capacity,
            });
        }
        Ok(())
    }
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            offscreen_limit: 2,
            cache_capacity: 5,
            discard_style: DiscardStyle::default(),
            collapse_duration: Duration::from_millis(400),
        }
    }
}

/// Position-indexed item recycler for a paged container, with an animated
/// discard protocol.
///
/// The container drives [`materialize`](Self::materialize) and
/// [`recycle`](Self::recycle) (or lets the adapter do its own windowing with
/// [`sync_window`](Self::sync_window)). The discard protocol lives in the
/// `discard` half of this type: [`discard`](Self::discard),
/// [`on_animation_end`](Self::on_animation_end), and
/// [`run_deferred`](Self::run_deferred).
pub struct PagerAdapter<S: ItemSource> {
    pub(crate) source: S,
    pub(crate) cache: PositionCache<S::View>,
    pub(crate) window: PageWindow,
    pub(crate) config: PagerConfig,
    pub(crate) phase: Phase,
    pub(crate) tasks: TaskQueue<DiscardFinished>,
    next_item: u64,
    pub(crate) next_token: u64,
}

impl<S: ItemSource> core::fmt::Debug for PagerAdapter<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PagerAdapter")
            .field("count", &self.source.count())
            .field("cached", &self.cache.len())
            .field("window", &self.window)
            .field("config", &self.config)
            .field("phase", &self.phase)
            .field("pending", &self.tasks.len())
            .finish_non_exhaustive()
    }
}

impl<S: ItemSource> PagerAdapter<S> {
    /// Creates an adapter over `source`.
    ///
    /// Invalid settings are corrected (capacity grown to fit the window) and
    /// flagged in debug builds; use [`try_new`](Self::try_new) to reject them.
    #[must_use]
    pub fn new(source: S, config: PagerConfig) -> Self {
        debug_assert!(
            config.validate().is_ok(),
            "invalid PagerConfig: {config:?}"
        );
        let window = PageWindow::new(config.offscreen_limit);
        let capacity = config.cache_capacity.max(window.span());
        Self {
            source,
            cache: PositionCache::new(capacity),
            window,
            config,
            phase: Phase::Idle,
            tasks: TaskQueue::new(),
            next_item: 0,
            next_token: 0,
        }
    }

    /// Creates an adapter, rejecting invalid settings.
    pub fn try_new(source: S, config: PagerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(source, config))
    }

    /// The data source.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the data source.
    ///
    /// Structural changes (insertions, removals) invalidate every cached
    /// position; follow them with [`invalidate`](Self::invalidate).
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Current settings.
    #[must_use]
    pub const fn config(&self) -> &PagerConfig {
        &self.config
    }

    /// The position cache, read-only.
    #[must_use]
    pub const fn cache(&self) -> &PositionCache<S::View> {
        &self.cache
    }

    /// The page window used by [`sync_window`](Self::sync_window).
    #[must_use]
    pub const fn window(&self) -> PageWindow {
        self.window
    }

    /// Number of items in the data source.
    #[must_use]
    pub fn count(&self) -> usize {
        self.source.count()
    }

    /// View type of the item at `position`.
    #[must_use]
    pub fn view_type(&self, position: usize) -> ViewType {
        self.source.view_type(position)
    }

    fn allocate_id(&mut self) -> ItemId {
        self.next_item += 1;
        ItemId::new(self.next_item)
    }

    /// Produces the item for `position` and attaches it to `container`.
    ///
    /// A cached item is rebound when its view type still matches. A cached
    /// item of a different type, or one locked by an in-flight discard, is
    /// detached and replaced by a freshly created one.
    ///
    /// Returns `None` if `position` is outside the data source.
    pub fn materialize<C>(&mut self, container: &mut C, position: usize) -> Option<ItemId>
    where
        C: PagerContainer<S::View>,
    {
        if position >= self.source.count() {
            return None;
        }
        let view_type = self.source.view_type(position);
        let locked = self.phase.locked_item();

        let stale = self
            .cache
            .get(position)
            .map(|cached| cached.view_type != view_type || Some(cached.id) == locked);
        if stale == Some(true) {
            if let Some(old) = self.cache.remove(position) {
                log::trace!("tearing down stale item {} at {position}", old.id.get());
                container.detach(old.id, &old.view);
            }
        }

        let fresh = !self.cache.touch(position);
        if !fresh {
            log::trace!("reusing cached item at {position}");
        } else {
            let view = self.source.create_view(position, view_type);
            let id = self.allocate_id();
            log::trace!("created item {} at {position}", id.get());
            let item = CachedItem {
                id,
                view_type,
                view,
            };
            if let Some((evicted_at, evicted)) = self.cache.put(position, item) {
                log::trace!("evicted item {} at {evicted_at}", evicted.id.get());
                container.detach(evicted.id, &evicted.view);
            }
        }

        let cached = self.cache.get_mut(position)?;
        self.source.bind_view(&mut cached.view, position);
        if fresh {
            container.attach(cached.id, &cached.view);
        }
        Some(cached.id)
    }

    /// Detaches `item` from `container` and evicts it from the cache.
    ///
    /// Items the cache no longer holds are ignored. Returns `true` if
    /// something was detached.
    pub fn recycle<C>(&mut self, container: &mut C, position: usize, item: ItemId) -> bool
    where
        C: PagerContainer<S::View>,
    {
        let at = match self.cache.get(position) {
            Some(cached) if cached.id == item => Some(position),
            _ => self.cache.position_of(item),
        };
        let removed = at.and_then(|pos| Some((pos, self.cache.remove(pos)?)));
        let Some((at, removed)) = removed else {
            log::trace!("recycle of uncached item {} ignored", item.get());
            return false;
        };
        log::trace!("recycled item {} at {at}", item.get());
        container.detach(removed.id, &removed.view);
        true
    }

    /// Recycles cached items outside the window around the container's current
    /// page and materializes the missing ones inside it.
    pub fn sync_window<C>(&mut self, container: &mut C)
    where
        C: PagerContainer<S::View>,
    {
        let range = self
            .window
            .range(container.current_index(), self.source.count());
        for (position, item) in self.cache.evict_where(|pos| range.contains(&pos)) {
            log::trace!("item {} at {position} left the window", item.id.get());
            container.detach(item.id, &item.view);
        }
        for position in range {
            if self.cache.get(position).is_none() {
                self.materialize(container, position);
            }
        }
    }

    /// Detaches every cached item and asks the container to rebuild.
    ///
    /// Positions are re-derived from scratch on the next materialize.
    pub fn invalidate<C>(&mut self, container: &mut C)
    where
        C: PagerContainer<S::View>,
    {
        for (_, item) in self.cache.drain() {
            container.detach(item.id, &item.view);
        }
        container.request_full_invalidate();
    }

    /// Item cached at `position`.
    #[must_use]
    pub fn item_at(&self, position: usize) -> Option<ItemId> {
        self.cache.get(position).map(|cached| cached.id)
    }

    /// View cached at `position`.
    #[must_use]
    pub fn view_at(&self, position: usize) -> Option<&S::View> {
        self.cache.get(position).map(|cached| &cached.view)
    }

    /// View of `item`, if still cached.
    #[must_use]
    pub fn view(&self, item: ItemId) -> Option<&S::View> {
        self.cache.find(item).map(|cached| &cached.view)
    }

    /// Mutable view of `item`, if still cached.
    pub fn view_mut(&mut self, item: ItemId) -> Option<&mut S::View> {
        self.cache.find_mut(item).map(|cached| &mut cached.view)
    }

    /// Position of `item`, if still cached. Possibly stale; see [`PositionCache`].
    #[must_use]
    pub fn position_of(&self, item: ItemId) -> Option<usize> {
        self.cache.position_of(item)
    }
}
