// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The discard protocol: animate an item out, slide its neighbors into the
//! vacated slot, then notify the data source on the next tick.
//!
//! ## Sequence
//!
//! 1. [`PagerAdapter::discard`] starts the out-animation (see
//!    [`DiscardStyle`](crate::DiscardStyle)) and marks the adapter busy.
//! 2. When it ends, the item's position is looked up again. If the container
//!    already evicted it, the cycle finishes with `None`.
//! 3. The neighbor is the cached item at `position + 1`, or failing that
//!    `position - 1`. Without one the cycle finishes with `position`.
//!    The far neighbor (`position ± 2`, same side) follows along cosmetically.
//! 4. The neighbor slides horizontally by `discarded.x - neighbor.x`. When
//!    that animation ends the cycle finishes with `position`.
//! 5. Finishing posts a [`DiscardFinished`] task. [`PagerAdapter::run_deferred`]
//!    delivers it on the next tick: busy is cleared,
//!    [`ItemSource::on_discard_finished`] runs, and the container is asked
//!    for a full rebuild.
//!
//! Exactly one cycle may be in flight per adapter. There is no cancel; the
//! container recycling the item mid-cycle is handled by step 2.

use smallvec::SmallVec;

use crate::adapter::{DiscardStyle, PagerAdapter};
use crate::animation::{AnimatedProperty, Animation, AnimationToken, Animator, Easing};
use crate::host::{ItemSource, ItemView, PagerContainer};
use crate::types::{AnimationState, ItemId};

/// Completion record of one discard cycle, delivered on the tick after the
/// last animation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscardFinished {
    /// Position the item was resolved to, or `None` if it had been evicted.
    pub position: Option<usize>,
    /// The discarded item.
    pub item: ItemId,
}

/// What happens once the out-animation ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AfterOut {
    Collapse,
    Settle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Phase {
    Idle,
    Discarding {
        item: ItemId,
        token: AnimationToken,
        then: AfterOut,
    },
    Collapsing {
        item: ItemId,
        position: usize,
        token: AnimationToken,
    },
    Finishing {
        item: ItemId,
    },
}

impl Phase {
    /// Item that must not be rebound until the cycle completes.
    pub(crate) fn locked_item(&self) -> Option<ItemId> {
        match *self {
            Self::Idle => None,
            Self::Discarding { item, .. }
            | Self::Collapsing { item, .. }
            | Self::Finishing { item } => Some(item),
        }
    }

    /// `Finishing` reports as [`AnimationState::Collapsing`] on every path,
    /// including the ones that never slid a neighbor.
    fn state(&self) -> AnimationState {
        match self {
            Self::Idle => AnimationState::Idle,
            Self::Discarding { .. } => AnimationState::Discarding,
            Self::Collapsing { .. } | Self::Finishing { .. } => AnimationState::Collapsing,
        }
    }
}

impl<S: ItemSource> PagerAdapter<S> {
    /// Coarse protocol state.
    #[must_use]
    pub fn animation_state(&self) -> AnimationState {
        self.phase.state()
    }

    /// Returns `true` while a discard cycle (or swipe release) is in flight.
    ///
    /// Input handling should absorb events while this is set.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.animation_state().is_busy()
    }

    fn next_token(&mut self) -> AnimationToken {
        self.next_token += 1;
        AnimationToken(self.next_token)
    }

    /// Starts a discard cycle for `item` using the configured
    /// [`DiscardStyle`].
    ///
    /// Returns `false`, leaving everything untouched, if `item` is not cached
    /// or another cycle is in flight.
    pub fn discard<A: Animator + ?Sized>(&mut self, item: ItemId, animator: &mut A) -> bool {
        let Some(view) = self.view(item) else {
            log::debug!("discard of uncached item {} rejected", item.get());
            return false;
        };
        let animation = match self.config.discard_style {
            DiscardStyle::SlideUp { duration } => {
                let from = view.translation().y;
                Animation::new(
                    AnimatedProperty::TranslationY,
                    from,
                    from - view.bounds().height(),
                    duration,
                    Easing::Accelerate,
                )
            }
            DiscardStyle::Fade { duration } => Animation::new(
                AnimatedProperty::Alpha,
                view.alpha(),
                0.0,
                duration,
                Easing::Linear,
            ),
        };
        self.begin_out(item, animation, AfterOut::Collapse, animator)
    }

    /// Discards whatever item is cached at `position`.
    pub fn discard_at<A: Animator + ?Sized>(&mut self, position: usize, animator: &mut A) -> bool {
        match self.item_at(position) {
            Some(item) => self.discard(item, animator),
            None => false,
        }
    }

    /// Starts a discard cycle with a caller-supplied out-animation.
    ///
    /// Gesture handlers use this to throw an item off screen from wherever the
    /// pointer left it. Rejections follow [`discard`](Self::discard).
    pub fn dismiss_with<A: Animator + ?Sized>(
        &mut self,
        item: ItemId,
        animation: Animation,
        animator: &mut A,
    ) -> bool {
        self.begin_out(item, animation, AfterOut::Collapse, animator)
    }

    /// Runs a settling animation on `item` (for example a swipe snapping back)
    /// while holding the busy flag. No data is touched when it ends.
    pub fn settle_with<A: Animator + ?Sized>(
        &mut self,
        item: ItemId,
        animation: Animation,
        animator: &mut A,
    ) -> bool {
        self.begin_out(item, animation, AfterOut::Settle, animator)
    }

    fn begin_out<A: Animator + ?Sized>(
        &mut self,
        item: ItemId,
        animation: Animation,
        then: AfterOut,
        animator: &mut A,
    ) -> bool {
        if self.is_busy() {
            log::debug!("item {} rejected: adapter busy", item.get());
            return false;
        }
        if self.cache.find(item).is_none() {
            return false;
        }
        let token = self.next_token();
        log::debug!("item {} animating out ({then:?})", item.get());
        self.phase = Phase::Discarding { item, token, then };
        animator.start(item, animation, token);
        true
    }

    /// Enters the protocol at the collapse step for an item the host already
    /// animated out itself.
    ///
    /// Returns `true` if a neighbor collapse animation started. When the item
    /// cannot be resolved or has no neighbor, the cycle still completes (the
    /// finish is posted for the next tick) and this returns `false`. Rejected
    /// outright, with no finish, while busy.
    pub fn collapse_around<A: Animator + ?Sized>(
        &mut self,
        item: ItemId,
        animator: &mut A,
    ) -> bool {
        if self.is_busy() {
            log::debug!("collapse around {} rejected: adapter busy", item.get());
            return false;
        }
        self.begin_collapse(item, animator)
    }

    fn begin_collapse<A: Animator + ?Sized>(&mut self, item: ItemId, animator: &mut A) -> bool {
        let Some(position) = self.cache.position_of(item) else {
            log::debug!("item {} was evicted before its position resolved", item.get());
            self.finish(None, item);
            return false;
        };

        let right = position
            .checked_add(1)
            .and_then(|p| self.item_at(p))
            .map(|n| (n, position.checked_add(2).and_then(|p| self.item_at(p))));
        let left = || {
            position.checked_sub(1).and_then(|p| self.item_at(p)).map(|n| {
                (n, position.checked_sub(2).and_then(|p| self.item_at(p)))
            })
        };
        let Some((neighbor, far)) = right.or_else(left) else {
            log::debug!("item {} at {position} has no neighbor to collapse", item.get());
            self.finish(Some(position), item);
            return false;
        };

        let delta = self
            .view(item)
            .zip(self.view(neighbor))
            .map(|(discarded, next)| discarded.screen_origin().x - next.screen_origin().x);
        let Some(delta) = delta else {
            self.finish(Some(position), item);
            return false;
        };
        let duration = self.config.collapse_duration;
        let slide = |view: &S::View| {
            let from = view.translation().x;
            Animation::new(
                AnimatedProperty::TranslationX,
                from,
                from + delta,
                duration,
                Easing::Linear,
            )
        };

        // The near neighbor always comes first.
        let mut moves: SmallVec<[(ItemId, Animation); 2]> = SmallVec::new();
        for target in core::iter::once(neighbor).chain(far) {
            if let Some(view) = self.view(target) {
                moves.push((target, slide(view)));
            }
        }

        let token = self.next_token();
        log::debug!(
            "collapsing around {position}: neighbor {} slides by {delta}",
            neighbor.get()
        );
        self.phase = Phase::Collapsing {
            item,
            position,
            token,
        };
        for (index, (target, animation)) in moves.into_iter().enumerate() {
            // Only the near neighbor's completion advances the protocol.
            let token = if index == 0 { token } else { self.next_token() };
            animator.start(target, animation, token);
        }
        true
    }

    fn finish(&mut self, position: Option<usize>, item: ItemId) {
        self.phase = Phase::Finishing { item };
        self.tasks.post(DiscardFinished { position, item });
    }

    /// Reports that the animation started with `token` has ended.
    ///
    /// Returns `true` if this advanced the protocol. Completions of cosmetic
    /// animations (the far neighbor) and of unknown tokens are ignored.
    pub fn on_animation_end<A: Animator + ?Sized>(
        &mut self,
        token: AnimationToken,
        animator: &mut A,
    ) -> bool {
        match self.phase {
            Phase::Discarding {
                item,
                token: expected,
                then,
            } if expected == token => {
                match then {
                    AfterOut::Collapse => {
                        self.phase = Phase::Idle;
                        self.begin_collapse(item, animator);
                    }
                    AfterOut::Settle => {
                        log::debug!("item {} settled", item.get());
                        self.phase = Phase::Idle;
                    }
                }
                true
            }
            Phase::Collapsing {
                item,
                position,
                token: expected,
            } if expected == token => {
                log::debug!("collapse around {position} done, finishing next tick");
                self.finish(Some(position), item);
                true
            }
            _ => {
                log::trace!("ignoring completion of animation {token:?}");
                false
            }
        }
    }

    /// Runs work deferred to this tick: delivers finished discard cycles.
    ///
    /// For each one the busy flag is cleared,
    /// [`ItemSource::on_discard_finished`] is invoked, and the adapter
    /// invalidates `container` so every position is re-derived. Returns the
    /// number of cycles delivered.
    pub fn run_deferred<C>(&mut self, container: &mut C) -> usize
    where
        C: PagerContainer<S::View>,
    {
        let mut delivered = 0;
        while let Some(done) = self.tasks.pop() {
            log::debug!(
                "discard of item {} finished at {:?}",
                done.item.get(),
                done.position
            );
            self.phase = Phase::Idle;
            self.source.on_discard_finished(done.position, done.item);
            self.invalidate(container);
            delivered += 1;
        }
        delivered
    }

    /// Returns `true` if a finished cycle is waiting for [`run_deferred`](Self::run_deferred).
    #[must_use]
    pub fn has_deferred(&self) -> bool {
        !self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;
    use core::time::Duration;

    use crate::adapter::{DiscardStyle, PagerAdapter, PagerConfig};
    use crate::animation::AnimatedProperty;
    use crate::host::{ItemView, PagerContainer};
    use crate::testing::{Deck, Recorder, Strip, finish_all};
    use crate::types::AnimationState;

    fn pager(count: u32, current: usize) -> (PagerAdapter<Deck>, Strip) {
        let mut adapter = PagerAdapter::new(Deck::new(count), PagerConfig::default());
        let mut strip = Strip {
            current,
            ..Strip::default()
        };
        adapter.sync_window(&mut strip);
        (adapter, strip)
    }

    #[test]
    fn discard_slides_right_neighbor_and_far_neighbor_into_place() {
        let (mut adapter, mut strip) = pager(30, 5);
        let mut recorder = Recorder::default();
        let discarded = adapter.item_at(5).unwrap();
        let neighbor = adapter.item_at(6).unwrap();
        let far = adapter.item_at(7).unwrap();
        let expected = adapter.view_at(5).unwrap().screen_origin().x
            - adapter.view_at(6).unwrap().screen_origin().x;

        assert!(adapter.discard(discarded, &mut recorder));
        assert_eq!(adapter.animation_state(), AnimationState::Discarding);
        let out = recorder.started[0].1;
        assert_eq!(out.property, AnimatedProperty::TranslationY);
        assert_eq!(out.to, -Deck::PAGE_HEIGHT);
        assert_eq!(out.duration, Duration::from_millis(400));

        finish_all(&mut adapter, &mut recorder);
        assert_eq!(adapter.animation_state(), AnimationState::Collapsing);
        let neighbor_x = adapter.view(neighbor).unwrap().translation().x;
        let far_x = adapter.view(far).unwrap().translation().x;
        assert_eq!(neighbor_x, expected);
        assert_eq!(neighbor_x, -Deck::PAGE_WIDTH);
        assert_eq!(far_x, expected);

        // Nothing is delivered until the next tick.
        assert!(adapter.source().finished.is_empty());
        assert!(adapter.is_busy());
        assert_eq!(adapter.run_deferred(&mut strip), 1);
        assert!(!adapter.is_busy());
        assert_eq!(adapter.source().finished, [(Some(5), discarded)]);

        // Position 5 now holds what used to be at 6.
        assert_eq!(adapter.count(), 29);
        assert_eq!(strip.invalidations, 1);
        adapter.sync_window(&mut strip);
        assert_eq!(adapter.view_at(5).map(|card| card.value), Some(6));
    }

    #[test]
    fn last_item_collapses_from_the_left() {
        let (mut adapter, _strip) = pager(10, 9);
        let mut recorder = Recorder::default();
        let left = adapter.item_at(8).unwrap();
        let far_left = adapter.item_at(7).unwrap();

        adapter.discard_at(9, &mut recorder);
        finish_all(&mut adapter, &mut recorder);

        assert_eq!(
            adapter.view(left).unwrap().translation().x,
            Deck::PAGE_WIDTH
        );
        assert_eq!(
            adapter.view(far_left).unwrap().translation().x,
            Deck::PAGE_WIDTH
        );
    }

    #[test]
    fn near_neighbor_without_far_neighbor_collapses_alone() {
        let (mut adapter, mut strip) = pager(30, 28);
        let mut recorder = Recorder::default();
        let discarded = adapter.item_at(28).unwrap();
        let neighbor = adapter.item_at(29).unwrap();

        assert!(adapter.discard_at(28, &mut recorder));
        finish_all(&mut adapter, &mut recorder);

        let slides: Vec<_> = recorder
            .history
            .iter()
            .filter(|(_, animation, _)| animation.property == AnimatedProperty::TranslationX)
            .map(|(item, _, _)| *item)
            .collect();
        assert_eq!(slides, [neighbor]);
        assert_eq!(
            adapter.view(neighbor).unwrap().translation().x,
            -Deck::PAGE_WIDTH
        );

        assert_eq!(adapter.run_deferred(&mut strip), 1);
        assert_eq!(adapter.source().finished, [(Some(28), discarded)]);
        assert_eq!(adapter.count(), 29);
    }

    #[test]
    fn single_item_finishes_without_collapse() {
        let (mut adapter, mut strip) = pager(1, 0);
        let mut recorder = Recorder::default();
        let only = adapter.item_at(0).unwrap();

        assert!(adapter.discard(only, &mut recorder));
        finish_all(&mut adapter, &mut recorder);

        // Only the out-animation ever ran.
        assert_eq!(recorder.history.len(), 1);
        assert!(adapter.is_busy());
        adapter.run_deferred(&mut strip);
        assert_eq!(adapter.source().finished, [(Some(0), only)]);
        assert_eq!(adapter.count(), 0);
    }

    #[test]
    fn eviction_during_out_animation_finishes_with_no_position() {
        let (mut adapter, mut strip) = pager(30, 5);
        let mut recorder = Recorder::default();
        let doomed = adapter.item_at(5).unwrap();

        adapter.discard(doomed, &mut recorder);
        assert!(adapter.recycle(&mut strip, 5, doomed));
        finish_all(&mut adapter, &mut recorder);
        // No collapse ran, but the pending finish still reports as collapsing.
        assert_eq!(recorder.history.len(), 1);
        assert_eq!(adapter.animation_state(), AnimationState::Collapsing);
        adapter.run_deferred(&mut strip);
        assert_eq!(adapter.animation_state(), AnimationState::Idle);

        assert_eq!(adapter.source().finished, [(None, doomed)]);
        // Nothing was removed by index, but a rebuild was still requested.
        assert_eq!(adapter.count(), 30);
        assert_eq!(strip.invalidations, 1);
    }

    #[test]
    fn second_discard_is_rejected_while_busy() {
        let (mut adapter, mut strip) = pager(30, 5);
        let mut recorder = Recorder::default();
        let first = adapter.item_at(5).unwrap();
        let second = adapter.item_at(6).unwrap();

        assert!(adapter.discard(first, &mut recorder));
        assert!(!adapter.discard(second, &mut recorder));
        assert_eq!(recorder.started.len(), 1);
        assert_eq!(adapter.view(second).unwrap().translation().y, 0.0);

        finish_all(&mut adapter, &mut recorder);
        // Still busy while the finish waits for the next tick.
        assert!(!adapter.collapse_around(second, &mut recorder));
        adapter.run_deferred(&mut strip);
        adapter.sync_window(&mut strip);
        assert!(adapter.discard_at(5, &mut recorder));
    }

    #[test]
    fn uncached_items_are_rejected() {
        let (mut adapter, _strip) = pager(30, 0);
        let mut recorder = Recorder::default();
        assert!(!adapter.discard_at(20, &mut recorder));
        assert!(!adapter.is_busy());
        assert!(recorder.started.is_empty());
    }

    #[test]
    fn fade_style_animates_alpha() {
        let config = PagerConfig {
            discard_style: DiscardStyle::FADE,
            ..PagerConfig::default()
        };
        let mut adapter = PagerAdapter::new(Deck::new(5), config);
        let mut strip = Strip::default();
        adapter.sync_window(&mut strip);
        let mut recorder = Recorder::default();

        adapter.discard_at(0, &mut recorder);
        let out = recorder.started[0].1;
        assert_eq!(out.property, AnimatedProperty::Alpha);
        assert_eq!(out.duration, Duration::from_millis(300));
        finish_all(&mut adapter, &mut recorder);
        adapter.run_deferred(&mut strip);
        assert_eq!(adapter.count(), 4);
    }

    #[test]
    fn stale_and_cosmetic_completions_are_ignored() {
        let (mut adapter, _strip) = pager(30, 5);
        let mut recorder = Recorder::default();
        adapter.discard_at(5, &mut recorder);
        let out_token = recorder.started[0].2;
        finish_all(&mut adapter, &mut recorder);
        // A duplicate completion after the protocol moved on does nothing.
        assert!(!adapter.on_animation_end(out_token, &mut recorder));
        let cosmetic: Vec<_> = recorder.history.iter().skip(2).map(|(_, _, t)| *t).collect();
        for token in cosmetic {
            assert!(!adapter.on_animation_end(token, &mut recorder));
        }
        assert!(adapter.has_deferred());
    }

    #[test]
    fn collapse_around_enters_at_the_neighbor_step() {
        let (mut adapter, mut strip) = pager(30, 0);
        let mut recorder = Recorder::default();
        let item = adapter.item_at(0).unwrap();

        assert!(adapter.collapse_around(item, &mut recorder));
        assert_eq!(adapter.animation_state(), AnimationState::Collapsing);
        assert_eq!(recorder.started[0].1.property, AnimatedProperty::TranslationX);
        finish_all(&mut adapter, &mut recorder);
        adapter.run_deferred(&mut strip);
        assert_eq!(adapter.source().finished, [(Some(0), item)]);
        assert_eq!(strip.current_index(), 0);
    }

    #[test]
    fn in_flight_item_is_never_rebound() {
        let (mut adapter, mut strip) = pager(30, 5);
        let mut recorder = Recorder::default();
        let doomed = adapter.item_at(5).unwrap();

        adapter.discard(doomed, &mut recorder);
        let replacement = adapter.materialize(&mut strip, 5).unwrap();
        assert_ne!(replacement, doomed);
        finish_all(&mut adapter, &mut recorder);
        adapter.run_deferred(&mut strip);
        assert_eq!(adapter.source().finished, [(None, doomed)]);
    }

    #[test]
    fn settle_holds_busy_without_touching_data() {
        let (mut adapter, mut strip) = pager(30, 5);
        let mut recorder = Recorder::default();
        let item = adapter.item_at(5).unwrap();
        let animation = crate::animation::Animation::new(
            AnimatedProperty::TranslationY,
            40.0,
            0.0,
            Duration::from_millis(400),
            crate::animation::Easing::Accelerate,
        );

        assert!(adapter.settle_with(item, animation, &mut recorder));
        assert!(adapter.is_busy());
        finish_all(&mut adapter, &mut recorder);
        assert!(!adapter.is_busy());
        assert_eq!(adapter.run_deferred(&mut strip), 0);
        assert_eq!(adapter.count(), 30);
    }
}
