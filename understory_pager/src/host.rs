// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Traits implemented by the host: renderables, the data source, and the container.

use kurbo::{Point, Rect, Vec2};

use crate::types::{ItemId, ViewType};

/// A renderable item as seen by the pager.
///
/// Geometry is in the container's coordinate space. [`bounds`](Self::bounds) is
/// the laid-out frame; translation is applied on top of it by animations and
/// gestures.
pub trait ItemView {
    /// Laid-out frame, without translation.
    fn bounds(&self) -> Rect;

    /// Current translation.
    fn translation(&self) -> Vec2;

    /// Sets the translation.
    fn set_translation(&mut self, translation: Vec2);

    /// Current opacity in `[0, 1]`.
    fn alpha(&self) -> f64 {
        1.0
    }

    /// Sets the opacity. Views that cannot fade may ignore this.
    fn set_alpha(&mut self, alpha: f64) {
        let _ = alpha;
    }

    /// Top-left corner as currently drawn (frame origin plus translation).
    fn screen_origin(&self) -> Point {
        self.bounds().origin() + self.translation()
    }
}

/// Data source and renderer factory behind a [`PagerAdapter`](crate::PagerAdapter).
///
/// The source owns the ordered sequence of domain items. The adapter asks it
/// for views and binds data into them; the source never sees the cache.
pub trait ItemSource {
    /// Renderable produced by [`create_view`](Self::create_view).
    type View: ItemView;

    /// Number of items in the backing sequence.
    fn count(&self) -> usize;

    /// Type of the item at `position`.
    ///
    /// Override this for multi-type pagers. A cached item whose type no longer
    /// matches is torn down rather than rebound.
    fn view_type(&self, position: usize) -> ViewType {
        let _ = position;
        ViewType::UNTYPED
    }

    /// Creates a fresh, unbound view of `view_type` for `position`.
    fn create_view(&mut self, position: usize, view_type: ViewType) -> Self::View;

    /// Binds the data at `position` into `view`.
    fn bind_view(&mut self, view: &mut Self::View, position: usize);

    /// Removes the element at `position` from the backing sequence.
    fn remove_at(&mut self, position: usize);

    /// Called exactly once per discard cycle, after every animation has
    /// finished and on the tick after the last one.
    ///
    /// `position` is `None` when the discarded item was evicted before its
    /// position could be resolved; in that case nothing may be removed by
    /// index. The adapter requests a full invalidate right after this returns,
    /// in both cases.
    ///
    /// The default removes the element at `position` when it is known.
    fn on_discard_finished(&mut self, position: Option<usize>, item: ItemId) {
        let _ = item;
        if let Some(position) = position {
            self.remove_at(position);
        }
    }
}

/// The paging container the adapter feeds.
pub trait PagerContainer<V> {
    /// Index of the page currently shown.
    fn current_index(&self) -> usize;

    /// Adds a materialized item to the container.
    ///
    /// Called once per item, when it is created; rebinding a cached item does
    /// not attach it again.
    fn attach(&mut self, item: ItemId, view: &V);

    /// Removes an item from the container.
    fn detach(&mut self, item: ItemId, view: &V);

    /// Drops every page and re-queries the adapter from scratch.
    ///
    /// Positions are not stable across removals, so after this call every
    /// cached position must be treated as unknown until materialized again.
    fn request_full_invalidate(&mut self);
}
