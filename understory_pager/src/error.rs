// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wiring errors.
//!
//! Lookup misses and busy rejections are ordinary values (`Option` / `bool`).
//! Only misconfiguration detected while wiring a pager together is an error.

/// A pager was wired with settings it cannot operate under.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The viewport extent must be finite and strictly positive.
    #[error("viewport extent must be finite and positive, got {0}")]
    InvalidViewport(f64),
    /// The position cache must be able to hold at least the current item.
    #[error("position cache capacity must be at least 1")]
    ZeroCapacity,
    /// A gesture threshold must be finite and non-negative.
    #[error("gesture threshold `{name}` must be finite and non-negative, got {value}")]
    InvalidThreshold {
        /// Name of the offending setting.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// An angle limit must lie within `[0, 90]` degrees.
    #[error("angle limit must be within 0..=90 degrees, got {0}")]
    InvalidAngle(f64),
    /// A scale factor must be finite and strictly positive.
    #[error("scale factor `{name}` must be finite and positive, got {value}")]
    InvalidFactor {
        /// Name of the offending setting.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// The container keeps more pages materialized than the cache can hold.
    #[error("page window of {window} items does not fit a cache of {capacity}")]
    WindowExceedsCapacity {
        /// Number of pages in the container's window (`2 * offscreen_limit + 1`).
        window: usize,
        /// Configured cache capacity.
        capacity: usize,
    },
}
