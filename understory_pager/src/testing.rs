// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test host: a deck of numbered cards laid out left to right, a container
//! that records attach/detach, and an animator that completes on demand.

use alloc::vec::Vec;

use kurbo::{Rect, Vec2};

use crate::adapter::PagerAdapter;
use crate::animation::{Animation, AnimationToken, Animator};
use crate::host::{ItemSource, ItemView, PagerContainer};
use crate::types::{ItemId, ViewType};

#[derive(Debug, Clone)]
pub(crate) struct Card {
    pub(crate) bounds: Rect,
    pub(crate) translation: Vec2,
    pub(crate) alpha: f64,
    pub(crate) value: u32,
}

impl ItemView for Card {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn translation(&self) -> Vec2 {
        self.translation
    }

    fn set_translation(&mut self, translation: Vec2) {
        self.translation = translation;
    }

    fn alpha(&self) -> f64 {
        self.alpha
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }
}

#[derive(Debug, Default)]
pub(crate) struct Deck {
    pub(crate) values: Vec<u32>,
    pub(crate) multi_type: bool,
    pub(crate) created: usize,
    pub(crate) finished: Vec<(Option<usize>, ItemId)>,
}

impl Deck {
    pub(crate) const PAGE_WIDTH: f64 = 300.0;
    pub(crate) const PAGE_HEIGHT: f64 = 500.0;

    pub(crate) fn new(count: u32) -> Self {
        Self {
            values: (0..count).collect(),
            ..Self::default()
        }
    }

    pub(crate) fn multi_type(count: u32) -> Self {
        Self {
            multi_type: true,
            ..Self::new(count)
        }
    }

    fn slot(position: usize) -> Rect {
        let x = position as f64 * Self::PAGE_WIDTH;
        Rect::new(x, 0.0, x + Self::PAGE_WIDTH, Self::PAGE_HEIGHT)
    }
}

impl ItemSource for Deck {
    type View = Card;

    fn count(&self) -> usize {
        self.values.len()
    }

    fn view_type(&self, position: usize) -> ViewType {
        if self.multi_type {
            ViewType((self.values[position] % 3) as i32)
        } else {
            ViewType::UNTYPED
        }
    }

    fn create_view(&mut self, position: usize, _view_type: ViewType) -> Card {
        self.created += 1;
        Card {
            bounds: Self::slot(position),
            translation: Vec2::ZERO,
            alpha: 1.0,
            value: u32::MAX,
        }
    }

    fn bind_view(&mut self, view: &mut Card, position: usize) {
        view.bounds = Self::slot(position);
        view.value = self.values[position];
    }

    fn remove_at(&mut self, position: usize) {
        self.values.remove(position);
    }

    fn on_discard_finished(&mut self, position: Option<usize>, item: ItemId) {
        self.finished.push((position, item));
        if let Some(position) = position {
            self.remove_at(position);
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Strip {
    pub(crate) current: usize,
    pub(crate) attached: Vec<ItemId>,
    pub(crate) detached: Vec<ItemId>,
    pub(crate) invalidations: usize,
}

impl PagerContainer<Card> for Strip {
    fn current_index(&self) -> usize {
        self.current
    }

    fn attach(&mut self, item: ItemId, _view: &Card) {
        self.attached.push(item);
    }

    fn detach(&mut self, item: ItemId, _view: &Card) {
        self.attached.retain(|id| *id != item);
        self.detached.push(item);
    }

    fn request_full_invalidate(&mut self) {
        self.invalidations += 1;
    }
}

#[derive(Debug, Default)]
pub(crate) struct Recorder {
    /// Animations started and not yet completed.
    pub(crate) started: Vec<(ItemId, Animation, AnimationToken)>,
    /// Every animation ever started.
    pub(crate) history: Vec<(ItemId, Animation, AnimationToken)>,
}

impl Animator for Recorder {
    fn start(&mut self, item: ItemId, animation: Animation, token: AnimationToken) {
        self.started.push((item, animation, token));
        self.history.push((item, animation, token));
    }
}

/// Completes every pending animation, including ones started by completions,
/// writing final values into views that are still cached.
pub(crate) fn finish_all(adapter: &mut PagerAdapter<Deck>, recorder: &mut Recorder) {
    while !recorder.started.is_empty() {
        let batch: Vec<_> = recorder.started.drain(..).collect();
        for (item, animation, token) in batch {
            if let Some(view) = adapter.view_mut(item) {
                animation.property.apply(view, animation.to);
            }
            adapter.on_animation_end(token, recorder);
        }
    }
}
