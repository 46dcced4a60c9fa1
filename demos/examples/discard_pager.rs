// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A 30-page color deck driven by a simulated frame clock.
//!
//! This example shows how to:
//! - implement `ItemView`, `ItemSource`, and `PagerContainer` for a host,
//! - run `Animator` requests from a frame clock and report completions,
//! - drain the deferred queue once per frame so data changes land on the tick
//!   after the last animation,
//! - feed pointer events through `SwipePager` to dismiss a page by flicking it.
//!
//! Run:
//! - `cargo run -p understory_pager_demos --example discard_pager`

use std::time::Duration;

use kurbo::{Point, Rect, Vec2};
use understory_pager::{
    Animation, AnimationToken, Animator, DiscardStyle, ItemId, ItemSource, ItemView, PagerAdapter,
    PagerConfig, PagerContainer, ViewType,
};
use understory_swipe::{Dispatch, PointerEvent, PointerPhase, SwipeConfig, SwipePager};

type Deck = PagerAdapter<Palette>;

const PAGE: (f64, f64) = (360.0, 640.0);
const FRAME: Duration = Duration::from_millis(16);

/// The three page kinds, selected by `value % 3`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Swatch {
    Blue,
    Green,
    Red,
}

impl Swatch {
    fn for_value(value: u32) -> Self {
        match value % 3 {
            0 => Self::Blue,
            1 => Self::Green,
            _ => Self::Red,
        }
    }

    fn view_type(self) -> ViewType {
        ViewType(self as i32)
    }

    fn from_view_type(view_type: ViewType) -> Self {
        match view_type.0 {
            1 => Self::Green,
            2 => Self::Red,
            _ => Self::Blue,
        }
    }
}

#[derive(Debug)]
struct Tile {
    swatch: Swatch,
    label: String,
    frame: Rect,
    offset: Vec2,
    alpha: f64,
}

impl Tile {
    fn bind(&mut self, value: u32, position: usize) {
        debug_assert_eq!(Swatch::for_value(value), self.swatch, "bound to a foreign kind");
        self.label = format!("{:?} #{value}", self.swatch);
        let x = position as f64 * PAGE.0;
        self.frame = Rect::new(x, 0.0, x + PAGE.0, PAGE.1);
    }
}

impl ItemView for Tile {
    fn bounds(&self) -> Rect {
        self.frame
    }

    fn translation(&self) -> Vec2 {
        self.offset
    }

    fn set_translation(&mut self, translation: Vec2) {
        self.offset = translation;
    }

    fn alpha(&self) -> f64 {
        self.alpha
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }
}

#[derive(Debug)]
struct Palette {
    values: Vec<u32>,
}

impl ItemSource for Palette {
    type View = Tile;

    fn count(&self) -> usize {
        self.values.len()
    }

    fn view_type(&self, position: usize) -> ViewType {
        Swatch::for_value(self.values[position]).view_type()
    }

    fn create_view(&mut self, _position: usize, view_type: ViewType) -> Tile {
        Tile {
            swatch: Swatch::from_view_type(view_type),
            label: String::new(),
            frame: Rect::ZERO,
            offset: Vec2::ZERO,
            alpha: 1.0,
        }
    }

    fn bind_view(&mut self, view: &mut Tile, position: usize) {
        view.bind(self.values[position], position);
    }

    fn remove_at(&mut self, position: usize) {
        let value = self.values.remove(position);
        println!("  data: removed {value} at {position}, {} left", self.values.len());
    }
}

#[derive(Debug, Default)]
struct Carousel {
    current: usize,
    rebuilds: usize,
}

impl PagerContainer<Tile> for Carousel {
    fn current_index(&self) -> usize {
        self.current
    }

    fn attach(&mut self, _item: ItemId, view: &Tile) {
        println!("  attach {}", view.label);
    }

    fn detach(&mut self, _item: ItemId, view: &Tile) {
        println!("  detach {}", view.label);
    }

    fn request_full_invalidate(&mut self) {
        self.rebuilds += 1;
    }
}

#[derive(Debug)]
struct Running {
    item: ItemId,
    animation: Animation,
    token: AnimationToken,
    elapsed: Duration,
}

/// Advances animations in fixed frames.
#[derive(Debug, Default)]
struct FrameClock {
    now: Duration,
    running: Vec<Running>,
}

impl Animator for FrameClock {
    fn start(&mut self, item: ItemId, animation: Animation, token: AnimationToken) {
        println!(
            "  start {:?} {:.0} -> {:.0} over {:?}",
            animation.property, animation.from, animation.to, animation.duration
        );
        self.running.push(Running {
            item,
            animation,
            token,
            elapsed: Duration::ZERO,
        });
    }
}

impl FrameClock {
    /// One frame: deliver last frame's deferred work, then advance animations
    /// and report the ones that ended.
    fn frame(&mut self, adapter: &mut PagerAdapter<Palette>, carousel: &mut Carousel) {
        if adapter.run_deferred(carousel) > 0 {
            adapter.sync_window(carousel);
        }
        self.now += FRAME;

        let mut ended = Vec::new();
        self.running.retain_mut(|run| {
            run.elapsed += FRAME;
            if let Some(view) = adapter.view_mut(run.item) {
                run.animation
                    .property
                    .apply(view, run.animation.value_at(run.elapsed));
            }
            let done = run.animation.is_finished(run.elapsed);
            if done {
                ended.push(run.token);
            }
            !done
        });
        for token in ended {
            adapter.on_animation_end(token, self);
        }
    }

    fn run_until_idle(&mut self, adapter: &mut PagerAdapter<Palette>, carousel: &mut Carousel) {
        let start = self.now;
        while adapter.is_busy() || !self.running.is_empty() {
            self.frame(adapter, carousel);
        }
        println!("  idle after {:?}", self.now - start);
    }
}

fn pager(style: DiscardStyle, current: usize) -> (PagerAdapter<Palette>, Carousel) {
    let config = PagerConfig {
        discard_style: style,
        ..PagerConfig::default()
    };
    let adapter = PagerAdapter::try_new(
        Palette {
            values: (0..30).collect(),
        },
        config,
    )
    .expect("default window fits the cache");
    let carousel = Carousel {
        current,
        ..Carousel::default()
    };
    (adapter, carousel)
}

fn describe(adapter: &PagerAdapter<Palette>, carousel: &Carousel) {
    let label = adapter
        .view_at(carousel.current)
        .map_or("<none>", |tile| tile.label.as_str());
    println!(
        "  {} pages, showing {label}, {} rebuilds",
        adapter.count(),
        carousel.rebuilds
    );
}

fn main() {
    let mut clock = FrameClock::default();

    println!("== dismiss control: slide page 5 up ==");
    let (mut adapter, mut carousel) = pager(DiscardStyle::SLIDE_UP, 5);
    adapter.sync_window(&mut carousel);
    assert!(adapter.discard_at(5, &mut clock));
    assert!(!adapter.discard_at(6, &mut clock), "second discard is rejected while busy");
    clock.run_until_idle(&mut adapter, &mut carousel);
    describe(&adapter, &carousel);

    println!("== dismiss control: fade the last page ==");
    let (mut adapter, mut carousel) = pager(DiscardStyle::FADE, 29);
    adapter.sync_window(&mut carousel);
    assert!(adapter.discard_at(29, &mut clock));
    clock.run_until_idle(&mut adapter, &mut carousel);
    carousel.current = 28;
    adapter.sync_window(&mut carousel);
    describe(&adapter, &carousel);

    println!("== swipe: flick page 12 upward ==");
    let (mut adapter, mut carousel) = pager(DiscardStyle::SLIDE_UP, 12);
    adapter.sync_window(&mut carousel);
    let mut swipe =
        SwipePager::try_new(PAGE.1, SwipeConfig::default()).expect("viewport is positive");
    let mut t = 0;
    let mut y = 500.0;
    let mut send = |phase, y: f64, t: u64, adapter: &mut Deck, clock: &mut FrameClock| {
        let event = PointerEvent::new(phase, Point::new(180.0, y), t);
        swipe.handle(event, adapter, &carousel, clock)
    };
    send(PointerPhase::Down, y, t, &mut adapter, &mut clock);
    for _ in 0..12 {
        t += 8;
        y -= 24.0;
        send(PointerPhase::Move, y, t, &mut adapter, &mut clock);
    }
    let dispatch = send(PointerPhase::Up, y, t, &mut adapter, &mut clock);
    assert_eq!(dispatch, Dispatch::Consumed);
    clock.run_until_idle(&mut adapter, &mut carousel);
    describe(&adapter, &carousel);

    println!("== swipe: short drag snaps back ==");
    let item = adapter.item_at(carousel.current);
    let mut swipe =
        SwipePager::try_new(PAGE.1, SwipeConfig::default()).expect("viewport is positive");
    let mut send = |phase, y: f64, t: u64, adapter: &mut Deck, clock: &mut FrameClock| {
        let event = PointerEvent::new(phase, Point::new(180.0, y), t);
        swipe.handle(event, adapter, &carousel, clock)
    };
    send(PointerPhase::Down, 400.0, 0, &mut adapter, &mut clock);
    for step in 1..=6_u32 {
        let y = 400.0 - 10.0 * f64::from(step);
        send(PointerPhase::Move, y, 60 * u64::from(step), &mut adapter, &mut clock);
    }
    send(PointerPhase::Up, 340.0, 600, &mut adapter, &mut clock);
    clock.run_until_idle(&mut adapter, &mut carousel);
    let offset = item
        .and_then(|item| adapter.view(item))
        .map_or(0.0, |tile| tile.translation().y);
    println!("  page rests at {offset:.0}");
    describe(&adapter, &carousel);
}
