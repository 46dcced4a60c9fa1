// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_pager --heading-base-level=0

//! Understory Pager: item recycling and animated removal for paged containers.
//!
//! This crate is the renderer-agnostic core behind a horizontally paged
//! container whose pages can be discarded with an animation. It owns the
//! bookkeeping and the state machine; the host owns views, layout, touch
//! dispatch, and frame timing.
//!
//! The core concepts are:
//!
//! - [`PositionCache`]: a bounded, eviction-tolerant mapping from logical
//!   position to the item currently materialized there.
//! - [`PagerAdapter`]: materializes and recycles items on behalf of the
//!   container, rebinding cached items or replacing them when their
//!   [`ViewType`] changed.
//! - The discard protocol on [`PagerAdapter`]: [`PagerAdapter::discard`]
//!   animates an item out, slides its neighbor (and cosmetically the far
//!   neighbor) into the vacated slot, then reports
//!   [`ItemSource::on_discard_finished`] on the next tick.
//! - [`Animator`] and [`Animation`]: the capability used to run animations.
//!   Completion is reported back with [`PagerAdapter::on_animation_end`].
//! - [`PageWindow`]: the current ± N window a container keeps materialized.
//!
//! Hosts implement three traits: [`ItemView`] for renderables, [`ItemSource`]
//! for the data and view factory, and [`PagerContainer`] for the paging widget.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Rect, Vec2};
//! use understory_pager::{
//!     Animation, AnimationToken, Animator, ItemId, ItemSource, ItemView, PagerAdapter,
//!     PagerConfig, PagerContainer,
//! };
//!
//! struct Page { frame: Rect, offset: Vec2 }
//!
//! impl ItemView for Page {
//!     fn bounds(&self) -> Rect { self.frame }
//!     fn translation(&self) -> Vec2 { self.offset }
//!     fn set_translation(&mut self, t: Vec2) { self.offset = t; }
//! }
//!
//! struct Numbers(Vec<u32>);
//!
//! impl ItemSource for Numbers {
//!     type View = Page;
//!     fn count(&self) -> usize { self.0.len() }
//!     fn create_view(&mut self, _: usize, _: understory_pager::ViewType) -> Page {
//!         Page { frame: Rect::ZERO, offset: Vec2::ZERO }
//!     }
//!     fn bind_view(&mut self, page: &mut Page, position: usize) {
//!         let x = position as f64 * 100.0;
//!         page.frame = Rect::new(x, 0.0, x + 100.0, 200.0);
//!     }
//!     fn remove_at(&mut self, position: usize) { self.0.remove(position); }
//! }
//!
//! #[derive(Default)]
//! struct Strip;
//!
//! impl PagerContainer<Page> for Strip {
//!     fn current_index(&self) -> usize { 0 }
//!     fn attach(&mut self, _: ItemId, _: &Page) {}
//!     fn detach(&mut self, _: ItemId, _: &Page) {}
//!     fn request_full_invalidate(&mut self) {}
//! }
//!
//! #[derive(Default)]
//! struct Pending(Vec<(ItemId, Animation, AnimationToken)>);
//!
//! impl Animator for Pending {
//!     fn start(&mut self, item: ItemId, animation: Animation, token: AnimationToken) {
//!         self.0.push((item, animation, token));
//!     }
//! }
//!
//! let mut adapter = PagerAdapter::new(Numbers((0..30).collect()), PagerConfig::default());
//! let mut strip = Strip;
//! let mut animator = Pending::default();
//!
//! // Materialize the pages around the current one.
//! adapter.sync_window(&mut strip);
//!
//! // Discard the first page; a second discard is rejected while this one runs.
//! assert!(adapter.discard_at(0, &mut animator));
//! assert!(!adapter.discard_at(1, &mut animator));
//!
//! // Drive animations to completion, as a frame clock would.
//! while let Some((item, animation, token)) = animator.0.pop() {
//!     if let Some(view) = adapter.view_mut(item) {
//!         animation.property.apply(view, animation.to);
//!     }
//!     adapter.on_animation_end(token, &mut animator);
//! }
//!
//! // On the next tick the data source is told and the container rebuilds.
//! adapter.run_deferred(&mut strip);
//! assert_eq!(adapter.count(), 29);
//! assert!(!adapter.is_busy());
//! ```
//!
//! ## Positions are not stable
//!
//! Removing an item shifts every later position down by one. The cache is not
//! renumbered; instead a finished discard drops every cached item and requests
//! a full invalidate, so positions are re-derived on the next materialize.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod adapter;
mod animation;
mod cache;
mod discard;
mod error;
mod host;
mod schedule;
mod types;
mod window;

#[cfg(test)]
mod testing;

pub use adapter::{DiscardStyle, PagerAdapter, PagerConfig};
pub use animation::{AnimatedProperty, Animation, AnimationToken, Animator, Easing};
pub use cache::{CachedItem, PositionCache};
pub use discard::DiscardFinished;
pub use error::ConfigError;
pub use host::{ItemSource, ItemView, PagerContainer};
pub use schedule::TaskQueue;
pub use types::{AnimationState, ItemId, ViewType};
pub use window::PageWindow;
