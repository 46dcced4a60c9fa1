// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animation capability used by the discard protocol.
//!
//! This crate never interpolates anything on its own. It describes an animation
//! ("move property P from A to B over D with easing E"), hands it to the host's
//! [`Animator`] together with an [`AnimationToken`], and waits for the host to
//! report completion through
//! [`PagerAdapter::on_animation_end`](crate::PagerAdapter::on_animation_end).
//!
//! Values are absolute: a translation animation ends with the property set to
//! [`Animation::to`], and the host is expected to leave it there ("fill after").

use core::time::Duration;

use kurbo::Vec2;

use crate::host::ItemView;
use crate::types::ItemId;

/// Interpolation curve applied to linear progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant speed.
    #[default]
    Linear,
    /// Starts slow and speeds up (`t²`).
    Accelerate,
    /// Starts fast and slows down (`1 - (1 - t)²`).
    Decelerate,
}

impl Easing {
    /// Maps linear progress in `[0, 1]` to eased progress in `[0, 1]`.
    #[must_use]
    pub fn transform(self, fraction: f64) -> f64 {
        let t = fraction.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Accelerate => t * t,
            Self::Decelerate => {
                let inv = 1.0 - t;
                1.0 - inv * inv
            }
        }
    }
}

/// Item property an [`Animation`] drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatedProperty {
    /// Horizontal translation, in the container's coordinate space.
    TranslationX,
    /// Vertical translation, in the container's coordinate space.
    TranslationY,
    /// Opacity in `[0, 1]`.
    Alpha,
}

impl AnimatedProperty {
    /// Writes `value` into the matching property of `view`.
    pub fn apply<V: ItemView + ?Sized>(self, view: &mut V, value: f64) {
        match self {
            Self::TranslationX => {
                let t = view.translation();
                view.set_translation(Vec2::new(value, t.y));
            }
            Self::TranslationY => {
                let t = view.translation();
                view.set_translation(Vec2::new(t.x, value));
            }
            Self::Alpha => view.set_alpha(value),
        }
    }

    /// Reads the current value of the matching property of `view`.
    #[must_use]
    pub fn read<V: ItemView + ?Sized>(self, view: &V) -> f64 {
        match self {
            Self::TranslationX => view.translation().x,
            Self::TranslationY => view.translation().y,
            Self::Alpha => view.alpha(),
        }
    }
}

/// Description of a single-property tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    /// Property being animated.
    pub property: AnimatedProperty,
    /// Start value.
    pub from: f64,
    /// End value; the property keeps it after completion.
    pub to: f64,
    /// Total running time.
    pub duration: Duration,
    /// Interpolation curve.
    pub easing: Easing,
}

impl Animation {
    /// Creates an animation of `property` from `from` to `to`.
    #[must_use]
    pub const fn new(
        property: AnimatedProperty,
        from: f64,
        to: f64,
        duration: Duration,
        easing: Easing,
    ) -> Self {
        Self {
            property,
            from,
            to,
            duration,
            easing,
        }
    }

    /// Value of the property `elapsed` after the animation started.
    ///
    /// Zero-length animations jump straight to [`to`](Self::to).
    #[must_use]
    pub fn value_at(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() || elapsed >= self.duration {
            return self.to;
        }
        let fraction = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from + (self.to - self.from) * self.easing.transform(fraction)
    }

    /// Returns `true` once `elapsed` covers the whole animation.
    #[must_use]
    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}

/// Ticket identifying one started animation.
///
/// Tokens are unique per [`PagerAdapter`](crate::PagerAdapter). Completions for
/// tokens the protocol is not waiting on are ignored.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct AnimationToken(pub(crate) u64);

/// Host capability that runs animations on items.
///
/// Implementations typically store the request, advance it from their frame
/// clock, apply values to the item's view, and call
/// [`PagerAdapter::on_animation_end`](crate::PagerAdapter::on_animation_end)
/// with `token` once it finishes. Completion must be reported asynchronously,
/// never from inside `start`.
pub trait Animator {
    /// Starts `animation` on `item`.
    fn start(&mut self, item: ItemId, animation: Animation, token: AnimationToken);
}
