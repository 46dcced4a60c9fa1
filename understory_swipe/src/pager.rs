// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Routes raw pointer events between a [`SwipeClassifier`] and the paging
//! container, driving a [`PagerAdapter`] from the outcome.

use kurbo::{Point, Vec2};
use understory_pager::{
    Animator, ConfigError, ItemId, ItemSource, ItemView, PagerAdapter, PagerContainer,
};

use crate::classifier::{SwipeClassifier, SwipeConfig, SwipeMove, SwipeRelease};

/// Phase of a pointer event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    /// The pointer went down.
    Down,
    /// The pointer moved while down.
    Move,
    /// The pointer was released.
    Up,
    /// The platform took the pointer away.
    Cancel,
}

/// A single-pointer input sample.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// What happened.
    pub phase: PointerPhase,
    /// Pointer position in container coordinates.
    pub position: Point,
    /// Monotonic timestamp in milliseconds.
    pub time_ms: u64,
}

impl PointerEvent {
    /// Creates an event.
    #[must_use]
    pub const fn new(phase: PointerPhase, position: Point, time_ms: u64) -> Self {
        Self {
            phase,
            position,
            time_ms,
        }
    }
}

/// Where an event should go after [`SwipePager::handle`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// The swipe used the event; the container must not see it.
    Consumed,
    /// Forward the event to the container's own paging.
    Forward,
}

/// Swipe-to-dismiss front end for a [`PagerAdapter`].
///
/// Gestures always act on the item at the container's current index. While
/// the adapter is busy (a discard cycle or a swipe release animating) every
/// event is absorbed, so neither the swipe nor the container can start a
/// second interaction.
#[derive(Clone, Debug)]
pub struct SwipePager {
    classifier: SwipeClassifier,
    viewport_height: f64,
    tracked: Option<ItemId>,
}

impl SwipePager {
    /// Creates a swipe front end for a container `viewport_height` tall.
    ///
    /// Fails if the height is not finite and positive, or if `config` does not
    /// pass [`SwipeConfig::validate`].
    pub fn try_new(viewport_height: f64, config: SwipeConfig) -> Result<Self, ConfigError> {
        check_viewport(viewport_height)?;
        config.validate()?;
        Ok(Self {
            classifier: SwipeClassifier::with_config(config),
            viewport_height,
            tracked: None,
        })
    }

    /// Updates the viewport height after a resize.
    pub fn set_viewport_height(&mut self, viewport_height: f64) -> Result<(), ConfigError> {
        check_viewport(viewport_height)?;
        self.viewport_height = viewport_height;
        Ok(())
    }

    /// Current viewport height.
    #[must_use]
    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    /// The underlying classifier.
    #[must_use]
    pub fn classifier(&self) -> &SwipeClassifier {
        &self.classifier
    }

    /// Item the current gesture acts on.
    #[must_use]
    pub fn tracked_item(&self) -> Option<ItemId> {
        self.tracked
    }

    /// Feeds one pointer event and reports whether the container should see it.
    pub fn handle<S, C, A>(
        &mut self,
        event: PointerEvent,
        adapter: &mut PagerAdapter<S>,
        container: &C,
        animator: &mut A,
    ) -> Dispatch
    where
        S: ItemSource,
        C: PagerContainer<S::View> + ?Sized,
        A: Animator + ?Sized,
    {
        if adapter.is_busy() {
            if self.classifier.is_tracking() {
                log::debug!("pager busy, abandoning swipe");
                self.classifier.reset();
                self.tracked = None;
            }
            return Dispatch::Consumed;
        }

        match event.phase {
            PointerPhase::Down => {
                self.tracked = adapter.item_at(container.current_index());
                match self.tracked.and_then(|item| adapter.view(item)) {
                    Some(view) => {
                        let initial = view.translation().y;
                        self.classifier.on_down(event.position, event.time_ms, initial);
                    }
                    None => self.classifier.reset(),
                }
                Dispatch::Forward
            }
            PointerPhase::Move => match self.classifier.on_move(event.position, event.time_ms) {
                SwipeMove::PassThrough => Dispatch::Forward,
                SwipeMove::Hold => Dispatch::Consumed,
                SwipeMove::Track { translation_y } => {
                    if let Some(view) = self.tracked.and_then(|item| adapter.view_mut(item)) {
                        let x = view.translation().x;
                        view.set_translation(Vec2::new(x, translation_y));
                    }
                    Dispatch::Consumed
                }
            },
            PointerPhase::Up => {
                let tracked = self.tracked.take();
                let Some((item, view)) =
                    tracked.and_then(|item| adapter.view(item).map(|view| (item, view)))
                else {
                    self.classifier.reset();
                    return Dispatch::Forward;
                };
                let release = self.classifier.on_up(
                    event.position,
                    event.time_ms,
                    view.translation().y,
                    view.bounds(),
                    self.viewport_height,
                );
                Self::resolve(item, release, adapter, animator)
            }
            PointerPhase::Cancel => {
                let tracked = self.tracked.take();
                let translation_y = tracked
                    .and_then(|item| adapter.view(item))
                    .map_or(0.0, |view| view.translation().y);
                let release = self.classifier.on_cancel(translation_y);
                match tracked {
                    Some(item) => Self::resolve(item, release, adapter, animator),
                    None => Dispatch::Forward,
                }
            }
        }
    }

    fn resolve<S, A>(
        item: ItemId,
        release: SwipeRelease,
        adapter: &mut PagerAdapter<S>,
        animator: &mut A,
    ) -> Dispatch
    where
        S: ItemSource,
        A: Animator + ?Sized,
    {
        match release {
            SwipeRelease::PassThrough => Dispatch::Forward,
            SwipeRelease::Rest => Dispatch::Consumed,
            SwipeRelease::SnapBack(animation) => {
                adapter.settle_with(item, animation, animator);
                Dispatch::Consumed
            }
            SwipeRelease::Commit(animation) | SwipeRelease::Fling(animation) => {
                adapter.dismiss_with(item, animation, animator);
                Dispatch::Consumed
            }
        }
    }
}

fn check_viewport(height: f64) -> Result<(), ConfigError> {
    if height.is_finite() && height > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidViewport(height))
    }
}
