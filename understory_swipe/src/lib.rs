// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_swipe --heading-base-level=0

//! Understory Swipe: vertical swipe-to-dismiss for Understory pagers.
//!
//! A horizontally paged container owns horizontal drags. This crate claims
//! the near-vertical ones for the current page, moves the page 1:1 with the
//! pointer, and on release either throws it off screen (handing it to the
//! [`understory_pager`] discard protocol) or snaps it back.
//!
//! - [`SwipeClassifier`]: the pure decision logic. Angle filter, drop
//!   barrier, and fling detection, tunable through [`SwipeConfig`].
//! - [`VelocityTracker`]: pointer velocity from timestamped samples.
//! - [`SwipePager`]: routes [`PointerEvent`]s, applies tracking to the
//!   current item, and starts release animations on a
//!   [`PagerAdapter`](understory_pager::PagerAdapter). Every event is
//!   absorbed while the adapter is busy.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Point;
//! use understory_swipe::{Dispatch, PointerEvent, PointerPhase, SwipeConfig, SwipePager};
//! # use kurbo::{Rect, Vec2};
//! # use understory_pager::{
//! #     Animation, AnimationToken, Animator, ItemId, ItemSource, ItemView, PagerAdapter,
//! #     PagerConfig, PagerContainer, ViewType,
//! # };
//! # struct Page { frame: Rect, offset: Vec2 }
//! # impl ItemView for Page {
//! #     fn bounds(&self) -> Rect { self.frame }
//! #     fn translation(&self) -> Vec2 { self.offset }
//! #     fn set_translation(&mut self, t: Vec2) { self.offset = t; }
//! # }
//! # struct Numbers(Vec<u32>);
//! # impl ItemSource for Numbers {
//! #     type View = Page;
//! #     fn count(&self) -> usize { self.0.len() }
//! #     fn create_view(&mut self, _: usize, _: ViewType) -> Page {
//! #         Page { frame: Rect::ZERO, offset: Vec2::ZERO }
//! #     }
//! #     fn bind_view(&mut self, page: &mut Page, position: usize) {
//! #         let x = position as f64 * 300.0;
//! #         page.frame = Rect::new(x, 0.0, x + 300.0, 500.0);
//! #     }
//! #     fn remove_at(&mut self, position: usize) { self.0.remove(position); }
//! # }
//! # struct Strip;
//! # impl PagerContainer<Page> for Strip {
//! #     fn current_index(&self) -> usize { 0 }
//! #     fn attach(&mut self, _: ItemId, _: &Page) {}
//! #     fn detach(&mut self, _: ItemId, _: &Page) {}
//! #     fn request_full_invalidate(&mut self) {}
//! # }
//! # #[derive(Default)]
//! # struct Pending(Vec<(ItemId, Animation, AnimationToken)>);
//! # impl Animator for Pending {
//! #     fn start(&mut self, item: ItemId, animation: Animation, token: AnimationToken) {
//! #         self.0.push((item, animation, token));
//! #     }
//! # }
//! # let mut adapter = PagerAdapter::new(Numbers((0..30).collect()), PagerConfig::default());
//! # let mut strip = Strip;
//! # let mut animator = Pending::default();
//! # adapter.sync_window(&mut strip);
//! let mut swipe = SwipePager::try_new(500.0, SwipeConfig::default()).unwrap();
//!
//! let mut feed = |phase, y: f64, t: u64, adapter: &mut PagerAdapter<Numbers>, animator: &mut Pending| {
//!     swipe.handle(PointerEvent::new(phase, Point::new(150.0, y), t), adapter, &strip, animator)
//! };
//!
//! // Drag the current page up by 150px, slowly, and let go.
//! assert_eq!(feed(PointerPhase::Down, 400.0, 0, &mut adapter, &mut animator), Dispatch::Forward);
//! for step in 1..=15 {
//!     feed(PointerPhase::Move, 400.0 - 10.0 * step as f64, 50 * step, &mut adapter, &mut animator);
//! }
//! assert_eq!(feed(PointerPhase::Up, 250.0, 1000, &mut adapter, &mut animator), Dispatch::Consumed);
//!
//! // The page is being dropped; everything is absorbed until the cycle ends.
//! assert!(adapter.is_busy());
//! assert_eq!(feed(PointerPhase::Down, 400.0, 1016, &mut adapter, &mut animator), Dispatch::Consumed);
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo` and `understory_pager`.
//! - `libm`: enables `no_std` builds that rely on `libm` for floating-point math.
//!
//! This crate is `no_std`.

#![no_std]

mod classifier;
mod pager;
mod velocity;

pub use classifier::{SwipeClassifier, SwipeConfig, SwipeMove, SwipeRelease};
pub use pager::{Dispatch, PointerEvent, PointerPhase, SwipePager};
pub use velocity::VelocityTracker;
