// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The bounded set of pages a container keeps materialized.

use core::ops::Range;

/// Off-screen page window around the current page.
///
/// A window with `offscreen_limit = n` keeps pages `current - n ..= current + n`
/// materialized, clamped to `0..count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Number of pages kept on each side of the current page.
    pub offscreen_limit: usize,
}

impl PageWindow {
    /// Creates a window keeping `offscreen_limit` pages on each side.
    #[must_use]
    pub const fn new(offscreen_limit: usize) -> Self {
        Self { offscreen_limit }
    }

    /// Number of pages in a full (unclamped) window.
    #[must_use]
    pub const fn span(&self) -> usize {
        self.offscreen_limit.saturating_mul(2).saturating_add(1)
    }

    /// Positions that should be materialized when `current` is shown out of `count` pages.
    ///
    /// An out-of-range `current` is clamped to the last page. An empty pager
    /// yields an empty range.
    #[must_use]
    pub fn range(&self, current: usize, count: usize) -> Range<usize> {
        if count == 0 {
            return 0..0;
        }
        let current = current.min(count - 1);
        let start = current.saturating_sub(self.offscreen_limit);
        let end = current
            .saturating_add(self.offscreen_limit)
            .saturating_add(1)
            .min(count);
        start..end
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::new(2)
    }
}
