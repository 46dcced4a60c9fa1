// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertical swipe classification for a single pointer.
//!
//! [`SwipeClassifier`] consumes down/move/up samples and decides, per move,
//! whether the drag belongs to the swipe (vertical) or to the container's own
//! horizontal paging, and on release whether the item is flung away, dropped
//! off screen, or snapped back.
//!
//! ## Rules
//!
//! 1. The angle of a drag is measured from the vertical axis, so 0° is a
//!    straight vertical drag and 90° a horizontal one.
//! 2. Moves inside the touch slop are not classified.
//! 3. A move whose total displacement is steeper than
//!    [`SwipeConfig::max_angle_degrees`] passes through, unless the gesture
//!    was already captured, in which case it is held without moving the item.
//! 4. On release a fling wins when the translation, velocity angle, and
//!    vertical speed all clear their thresholds. Otherwise a translation
//!    beyond the drop barrier commits, and anything else snaps back.
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_swipe::{SwipeClassifier, SwipeMove, SwipeRelease};
//!
//! let mut swipe = SwipeClassifier::new();
//! let page = Rect::new(0.0, 0.0, 300.0, 500.0);
//!
//! swipe.on_down(Point::new(150.0, 300.0), 0, 0.0);
//! let step = swipe.on_move(Point::new(152.0, 170.0), 400);
//! assert_eq!(step, SwipeMove::Track { translation_y: -130.0 });
//!
//! // Slow release past the 20% drop barrier.
//! let release = swipe.on_up(Point::new(152.0, 170.0), 800, -130.0, page, 500.0);
//! let SwipeRelease::Commit(animation) = release else { panic!("expected a commit") };
//! assert_eq!(animation.to, -500.0);
//! ```

use core::time::Duration;

use kurbo::{Point, Rect};
use understory_pager::{AnimatedProperty, Animation, ConfigError, Easing};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::velocity::VelocityTracker;

/// Thresholds for [`SwipeClassifier`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipeConfig {
    /// Widest angle from vertical, in degrees, still treated as a swipe.
    pub max_angle_degrees: f64,
    /// Fraction of the viewport height a release must exceed to commit.
    pub drop_barrier_fraction: f64,
    /// Minimum absolute translation, in px, before a fling is considered.
    pub fling_min_translation: f64,
    /// Minimum vertical speed, in px/s, for a fling.
    pub fling_min_velocity: f64,
    /// Flings travel at most this many viewport heights.
    pub fling_distance_factor: f64,
    /// Duration of commit and snap-back animations.
    pub release_duration: Duration,
    /// Upper bound on a fling's duration.
    pub max_fling_duration: Duration,
    /// Measured velocities are clamped to this, in px/s.
    pub max_velocity: f64,
    /// Distance, in px, the pointer must travel before a move is classified.
    pub touch_slop: f64,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            max_angle_degrees: 30.0,
            drop_barrier_fraction: 0.2,
            fling_min_translation: 150.0,
            fling_min_velocity: 500.0,
            fling_distance_factor: 2.0,
            release_duration: Duration::from_millis(400),
            max_fling_duration: Duration::from_millis(400),
            max_velocity: 8000.0,
            touch_slop: 8.0,
        }
    }
}

impl SwipeConfig {
    /// Checks that every threshold can be used as a threshold.
    ///
    /// Distances, velocities, and fractions must be finite and non-negative,
    /// the angle limit must lie within `[0, 90]` degrees, and the fling
    /// distance factor must be positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=90.0).contains(&self.max_angle_degrees) {
            return Err(ConfigError::InvalidAngle(self.max_angle_degrees));
        }
        let thresholds = [
            ("drop_barrier_fraction", self.drop_barrier_fraction),
            ("fling_min_translation", self.fling_min_translation),
            ("fling_min_velocity", self.fling_min_velocity),
            ("max_velocity", self.max_velocity),
            ("touch_slop", self.touch_slop),
        ];
        for (name, value) in thresholds {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }
        let factor = self.fling_distance_factor;
        if !(factor.is_finite() && factor > 0.0) {
            return Err(ConfigError::InvalidFactor {
                name: "fling_distance_factor",
                value: factor,
            });
        }
        Ok(())
    }
}

/// Outcome of a pointer move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SwipeMove {
    /// Not a swipe (yet); the container should see this move.
    PassThrough,
    /// Captured: place the item at this vertical translation.
    Track {
        /// Absolute translation, gesture start plus vertical displacement.
        translation_y: f64,
    },
    /// Captured, but this move strays past the angle limit. Absorb it and
    /// leave the item where it is.
    Hold,
}

/// Outcome of a pointer release.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SwipeRelease {
    /// The gesture was never captured.
    PassThrough,
    /// Captured, but the item already rests at zero.
    Rest,
    /// Return the item to zero translation.
    SnapBack(Animation),
    /// Drop the item off screen, then collapse its neighbors.
    Commit(Animation),
    /// Throw the item off screen in the direction of travel, then collapse.
    Fling(Animation),
}

impl SwipeRelease {
    /// The animation to run, if any.
    #[must_use]
    pub fn animation(&self) -> Option<Animation> {
        match *self {
            Self::SnapBack(a) | Self::Commit(a) | Self::Fling(a) => Some(a),
            Self::PassThrough | Self::Rest => None,
        }
    }

    /// Returns `true` if the release removes the item.
    #[must_use]
    pub fn removes_item(&self) -> bool {
        matches!(self, Self::Commit(_) | Self::Fling(_))
    }
}

#[derive(Clone, Debug)]
struct Gesture {
    down: Point,
    initial_translation_y: f64,
    scrolling: bool,
    x: VelocityTracker,
    y: VelocityTracker,
}

/// Single-pointer vertical swipe classifier.
#[derive(Clone, Debug, Default)]
pub struct SwipeClassifier {
    /// Active thresholds.
    pub config: SwipeConfig,
    gesture: Option<Gesture>,
}

impl SwipeClassifier {
    /// Creates a classifier with the default thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a classifier with custom thresholds.
    ///
    /// Invalid thresholds are flagged in debug builds; validate them up front
    /// with [`SwipeConfig::validate`].
    #[must_use]
    pub fn with_config(config: SwipeConfig) -> Self {
        debug_assert!(
            config.validate().is_ok(),
            "invalid SwipeConfig: {config:?}"
        );
        Self {
            config,
            gesture: None,
        }
    }

    /// Returns `true` between a down and the matching up or cancel.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.gesture.is_some()
    }

    /// Returns `true` once the current gesture was captured as a swipe.
    #[must_use]
    pub fn is_scrolling(&self) -> bool {
        self.gesture.as_ref().is_some_and(|g| g.scrolling)
    }

    /// Starts a gesture. `initial_translation_y` is the item's translation
    /// right now, so a drag can pick up an item mid-animation.
    pub fn on_down(&mut self, position: Point, time_ms: u64, initial_translation_y: f64) {
        let mut gesture = Gesture {
            down: position,
            initial_translation_y,
            scrolling: false,
            x: VelocityTracker::new(),
            y: VelocityTracker::new(),
        };
        gesture.x.add(time_ms, position.x);
        gesture.y.add(time_ms, position.y);
        self.gesture = Some(gesture);
    }

    /// Classifies a move of the active pointer.
    pub fn on_move(&mut self, position: Point, time_ms: u64) -> SwipeMove {
        let max_angle = self.config.max_angle_degrees;
        let slop = self.config.touch_slop;
        let Some(gesture) = self.gesture.as_mut() else {
            return SwipeMove::PassThrough;
        };
        gesture.x.add(time_ms, position.x);
        gesture.y.add(time_ms, position.y);

        let delta = position - gesture.down;
        if !gesture.scrolling && delta.hypot() < slop {
            return SwipeMove::PassThrough;
        }
        if angle_from_vertical(delta.x, delta.y) > max_angle {
            return if gesture.scrolling {
                SwipeMove::Hold
            } else {
                SwipeMove::PassThrough
            };
        }
        if !gesture.scrolling {
            log::trace!("swipe captured at {:.1} px", delta.y);
        }
        gesture.scrolling = true;
        SwipeMove::Track {
            translation_y: gesture.initial_translation_y + delta.y,
        }
    }

    /// Resolves a release.
    ///
    /// `translation_y` is the item's translation now, `item_bounds` its
    /// untranslated frame, and `viewport_height` the container's height.
    pub fn on_up(
        &mut self,
        position: Point,
        time_ms: u64,
        translation_y: f64,
        item_bounds: Rect,
        viewport_height: f64,
    ) -> SwipeRelease {
        let Some(mut gesture) = self.gesture.take() else {
            return SwipeRelease::PassThrough;
        };
        if !gesture.scrolling {
            return SwipeRelease::PassThrough;
        }
        gesture.x.add(time_ms, position.x);
        gesture.y.add(time_ms, position.y);
        let vx = gesture.x.velocity_clamped(self.config.max_velocity);
        let vy = gesture.y.velocity_clamped(self.config.max_velocity);

        if let Some(fling) = self.fling(translation_y, vx, vy, item_bounds, viewport_height) {
            return SwipeRelease::Fling(fling);
        }
        self.settle(translation_y, item_bounds, viewport_height)
    }

    /// Forgets the current gesture without resolving it.
    pub fn reset(&mut self) {
        self.gesture = None;
    }

    /// Abandons the gesture. A captured item that is displaced snaps back.
    pub fn on_cancel(&mut self, translation_y: f64) -> SwipeRelease {
        match self.gesture.take() {
            Some(g) if g.scrolling => self.snap_back(translation_y),
            _ => SwipeRelease::PassThrough,
        }
    }

    fn fling(
        &self,
        translation_y: f64,
        vx: f64,
        vy: f64,
        item_bounds: Rect,
        viewport_height: f64,
    ) -> Option<Animation> {
        let c = &self.config;
        if translation_y.abs() <= c.fling_min_translation
            || angle_from_vertical(vx, vy) > c.max_angle_degrees
            || vy.abs() <= c.fling_min_velocity
        {
            return None;
        }
        let reach = c.fling_distance_factor * viewport_height;
        let target = offscreen_target(vy < 0.0, item_bounds, viewport_height)
            .max(-reach)
            .min(reach);
        let delta = target - translation_y;
        let secs = (delta / vy).abs();
        let duration = if secs < c.max_fling_duration.as_secs_f64() {
            Duration::from_secs_f64(secs)
        } else {
            c.max_fling_duration
        };
        log::debug!("fling at {vy:.0} px/s to {target:.1} over {duration:?}");
        Some(Animation::new(
            AnimatedProperty::TranslationY,
            translation_y,
            target,
            duration,
            Easing::Decelerate,
        ))
    }

    fn settle(&self, translation_y: f64, item_bounds: Rect, viewport_height: f64) -> SwipeRelease {
        let barrier = self.config.drop_barrier_fraction * viewport_height;
        if translation_y.abs() > barrier {
            let target = offscreen_target(translation_y < 0.0, item_bounds, viewport_height);
            log::debug!("swipe past drop barrier {barrier:.1}, dropping to {target:.1}");
            return SwipeRelease::Commit(Animation::new(
                AnimatedProperty::TranslationY,
                translation_y,
                target,
                self.config.release_duration,
                Easing::Accelerate,
            ));
        }
        self.snap_back(translation_y)
    }

    fn snap_back(&self, translation_y: f64) -> SwipeRelease {
        if translation_y == 0.0 {
            return SwipeRelease::Rest;
        }
        SwipeRelease::SnapBack(Animation::new(
            AnimatedProperty::TranslationY,
            translation_y,
            0.0,
            self.config.release_duration,
            Easing::Accelerate,
        ))
    }
}

/// Angle of `(dx, dy)` from the vertical axis in degrees, in `[0, 90]`.
fn angle_from_vertical(dx: f64, dy: f64) -> f64 {
    dx.abs().atan2(dy.abs()) * (180.0 / core::f64::consts::PI)
}

/// Translation that moves an item laid out at `bounds` fully out of a
/// viewport of `viewport_height`.
fn offscreen_target(upward: bool, bounds: Rect, viewport_height: f64) -> f64 {
    if upward {
        -bounds.y1
    } else {
        viewport_height - bounds.y0
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use kurbo::{Point, Rect};
    use understory_pager::{ConfigError, Easing};

    use super::{SwipeClassifier, SwipeConfig, SwipeMove, SwipeRelease, angle_from_vertical};

    const PAGE: Rect = Rect::new(0.0, 0.0, 300.0, 500.0);
    const HEIGHT: f64 = 500.0;

    /// Drags straight up by `distance` over `steps` moves spaced `step_ms`
    /// apart, returning the last move and its timestamp.
    fn drag(
        swipe: &mut SwipeClassifier,
        distance: f64,
        steps: u32,
        step_ms: u64,
    ) -> (SwipeMove, Point, u64) {
        let start = Point::new(150.0, 400.0);
        swipe.on_down(start, 0, 0.0);
        let mut last = (SwipeMove::PassThrough, start, 0);
        for i in 1..=steps {
            let p = Point::new(150.0, 400.0 - distance * f64::from(i) / f64::from(steps));
            let t = u64::from(i) * step_ms;
            last = (swipe.on_move(p, t), p, t);
        }
        last
    }

    #[test]
    fn angle_is_measured_from_vertical() {
        assert_eq!(angle_from_vertical(0.0, -10.0), 0.0);
        assert!((angle_from_vertical(10.0, 10.0) - 45.0).abs() < 1e-9);
        assert!((angle_from_vertical(-10.0, 0.0) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn quarter_drag_commits_upward() {
        let mut swipe = SwipeClassifier::new();
        // Slow drag: 125px over 1s.
        let (step, p, t) = drag(&mut swipe, 125.0, 25, 40);
        assert_eq!(step, SwipeMove::Track { translation_y: -125.0 });
        let release = swipe.on_up(p, t + 200, -125.0, PAGE, HEIGHT);
        let SwipeRelease::Commit(animation) = release else {
            panic!("expected commit, got {release:?}");
        };
        assert_eq!(animation.from, -125.0);
        assert_eq!(animation.to, -500.0);
        assert_eq!(animation.easing, Easing::Accelerate);
        assert_eq!(animation.duration, Duration::from_millis(400));
        assert!(!swipe.is_tracking());
    }

    #[test]
    fn downward_commit_clears_the_viewport_bottom() {
        let swipe = SwipeClassifier::new();
        let page = Rect::new(0.0, 20.0, 300.0, 480.0);
        let release = swipe.settle(130.0, page, HEIGHT);
        assert_eq!(release.animation().map(|a| a.to), Some(480.0));
        assert!(release.removes_item());
    }

    #[test]
    fn tenth_drag_snaps_back_and_zero_rests() {
        let mut swipe = SwipeClassifier::new();
        let (_, p, t) = drag(&mut swipe, 50.0, 10, 40);
        let release = swipe.on_up(p, t + 200, -50.0, PAGE, HEIGHT);
        let SwipeRelease::SnapBack(animation) = release else {
            panic!("expected snap back, got {release:?}");
        };
        assert_eq!((animation.from, animation.to), (-50.0, 0.0));
        assert!(!release.removes_item());

        // Snapping back from zero is a no-op.
        let (_, p, t) = drag(&mut swipe, 50.0, 10, 40);
        assert_eq!(swipe.on_up(p, t + 200, 0.0, PAGE, HEIGHT), SwipeRelease::Rest);
    }

    #[test]
    fn diagonal_drag_is_never_captured() {
        let mut swipe = SwipeClassifier::new();
        swipe.on_down(Point::new(0.0, 400.0), 0, 0.0);
        for i in 1..=20_u32 {
            let d = f64::from(i) * 10.0;
            let step = swipe.on_move(Point::new(d, 400.0 - d), u64::from(i) * 16);
            assert_eq!(step, SwipeMove::PassThrough);
        }
        assert!(!swipe.is_scrolling());
        assert_eq!(
            swipe.on_up(Point::new(200.0, 200.0), 400, 0.0, PAGE, HEIGHT),
            SwipeRelease::PassThrough
        );
    }

    #[test]
    fn captured_gesture_holds_on_sideways_moves() {
        let mut swipe = SwipeClassifier::new();
        let (_, p, t) = drag(&mut swipe, 60.0, 3, 16);
        assert!(swipe.is_scrolling());
        let sideways = Point::new(p.x + 200.0, p.y);
        assert_eq!(swipe.on_move(sideways, t + 16), SwipeMove::Hold);
    }

    #[test]
    fn moves_inside_slop_are_unclassified() {
        let mut swipe = SwipeClassifier::new();
        swipe.on_down(Point::new(0.0, 0.0), 0, 0.0);
        assert_eq!(swipe.on_move(Point::new(0.0, -5.0), 10), SwipeMove::PassThrough);
        assert!(!swipe.is_scrolling());
    }

    #[test]
    fn drag_resumes_from_initial_translation() {
        let mut swipe = SwipeClassifier::new();
        swipe.on_down(Point::new(0.0, 300.0), 0, -40.0);
        assert_eq!(
            swipe.on_move(Point::new(0.0, 280.0), 16),
            SwipeMove::Track { translation_y: -60.0 }
        );
    }

    #[test]
    fn fast_flick_flings_with_capped_duration() {
        let mut swipe = SwipeClassifier::new();
        // 200px in 100ms: 2000 px/s upward.
        let (_, p, t) = drag(&mut swipe, 200.0, 10, 10);
        let release = swipe.on_up(p, t, -200.0, PAGE, HEIGHT);
        let SwipeRelease::Fling(animation) = release else {
            panic!("expected fling, got {release:?}");
        };
        assert_eq!(animation.to, -500.0);
        assert_eq!(animation.easing, Easing::Decelerate);
        // 300px at 2000 px/s is 150ms.
        let ms = animation.duration.as_secs_f64() * 1000.0;
        assert!((ms - 150.0).abs() < 5.0, "got {ms}ms");
    }

    #[test]
    fn flick_below_translation_threshold_snaps_back() {
        let mut swipe = SwipeClassifier::new();
        // Fast, but only 90px: neither fling nor past the 100px barrier.
        let (_, p, t) = drag(&mut swipe, 90.0, 9, 10);
        let release = swipe.on_up(p, t, -90.0, PAGE, HEIGHT);
        assert!(matches!(release, SwipeRelease::SnapBack(_)), "{release:?}");
    }

    #[test]
    fn slow_long_drag_falls_through_to_commit() {
        let mut swipe = SwipeClassifier::with_config(SwipeConfig {
            fling_min_velocity: 5000.0,
            ..SwipeConfig::default()
        });
        let (_, p, t) = drag(&mut swipe, 200.0, 10, 10);
        let release = swipe.on_up(p, t, -200.0, PAGE, HEIGHT);
        assert!(matches!(release, SwipeRelease::Commit(_)), "{release:?}");
    }

    #[test]
    fn config_validation_rejects_unusable_thresholds() {
        assert_eq!(SwipeConfig::default().validate(), Ok(()));
        let bad = |config: SwipeConfig| config.validate().unwrap_err();
        assert_eq!(
            bad(SwipeConfig {
                fling_distance_factor: -1.0,
                ..SwipeConfig::default()
            }),
            ConfigError::InvalidFactor {
                name: "fling_distance_factor",
                value: -1.0
            }
        );
        assert!(matches!(
            bad(SwipeConfig {
                fling_distance_factor: f64::NAN,
                ..SwipeConfig::default()
            }),
            ConfigError::InvalidFactor { .. }
        ));
        assert_eq!(
            bad(SwipeConfig {
                drop_barrier_fraction: -0.2,
                ..SwipeConfig::default()
            }),
            ConfigError::InvalidThreshold {
                name: "drop_barrier_fraction",
                value: -0.2
            }
        );
        assert_eq!(
            bad(SwipeConfig {
                max_angle_degrees: 120.0,
                ..SwipeConfig::default()
            }),
            ConfigError::InvalidAngle(120.0)
        );
        assert!(matches!(
            bad(SwipeConfig {
                touch_slop: f64::INFINITY,
                ..SwipeConfig::default()
            }),
            ConfigError::InvalidThreshold {
                name: "touch_slop",
                ..
            }
        ));
    }

    #[test]
    fn cancel_snaps_back_only_when_captured() {
        let mut swipe = SwipeClassifier::new();
        swipe.on_down(Point::ZERO, 0, 0.0);
        assert_eq!(swipe.on_cancel(0.0), SwipeRelease::PassThrough);

        let _ = drag(&mut swipe, 40.0, 4, 16);
        assert!(matches!(swipe.on_cancel(-40.0), SwipeRelease::SnapBack(_)));
        assert!(!swipe.is_tracking());
    }
}
