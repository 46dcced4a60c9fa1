// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 1D pointer velocity estimation from timestamped samples.
//!
//! Uses the impulse strategy: the velocity is derived from the kinetic energy
//! the samples impart, which is robust against uneven event spacing.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

const HISTORY_SIZE: usize = 20;

/// Samples older than this (relative to the newest) are ignored.
const HORIZON_MS: u64 = 100;

/// A gap this long between samples means the pointer stopped.
const ASSUME_STOPPED_MS: u64 = 40;

#[derive(Clone, Copy, Debug, Default)]
struct Sample {
    time_ms: u64,
    position: f64,
}

/// Velocity tracker over absolute positions along one axis.
#[derive(Clone, Debug)]
pub struct VelocityTracker {
    samples: [Option<Sample>; HISTORY_SIZE],
    index: usize,
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            index: 0,
        }
    }

    /// Records `position` at `time_ms`.
    pub fn add(&mut self, time_ms: u64, position: f64) {
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(Sample { time_ms, position });
    }

    /// Forgets every sample.
    pub fn reset(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.index = 0;
    }

    /// Velocity in units per second; zero with fewer than two usable samples.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        let Some(newest) = self.samples[self.index] else {
            return 0.0;
        };

        // Oldest-last: positions[0] is the newest sample.
        let mut positions = [0.0_f64; HISTORY_SIZE];
        let mut ages = [0.0_f64; HISTORY_SIZE];
        let mut count = 0;
        let mut cursor = self.index;
        let mut previous = newest;
        while let Some(sample) = self.samples[cursor] {
            let age = newest.time_ms.saturating_sub(sample.time_ms);
            let gap = previous.time_ms.abs_diff(sample.time_ms);
            if age > HORIZON_MS || gap > ASSUME_STOPPED_MS {
                break;
            }
            positions[count] = sample.position;
            ages[count] = -(age as f64);
            previous = sample;
            count += 1;
            if count == HISTORY_SIZE {
                break;
            }
            cursor = cursor.checked_sub(1).unwrap_or(HISTORY_SIZE - 1);
        }
        if count < 2 {
            return 0.0;
        }

        let mut work = 0.0;
        let start = count - 1;
        let mut next_time = ages[start];
        for i in (1..=start).rev() {
            let current_time = next_time;
            next_time = ages[i - 1];
            if current_time == next_time {
                continue;
            }
            let v_curr = (positions[i - 1] - positions[i]) / (next_time - current_time);
            let v_prev = energy_to_velocity(work);
            work += (v_curr - v_prev) * v_curr.abs();
            if i == start {
                work *= 0.5;
            }
        }
        energy_to_velocity(work) * 1000.0
    }

    /// [`velocity`](Self::velocity) clamped to `±max`.
    #[must_use]
    pub fn velocity_clamped(&self, max: f64) -> f64 {
        if !max.is_finite() || max <= 0.0 {
            return 0.0;
        }
        let v = self.velocity();
        if v.is_nan() { 0.0 } else { v.clamp(-max, max) }
    }
}

/// `E = v² / 2` with unit mass, keeping the sign.
fn energy_to_velocity(energy: f64) -> f64 {
    energy.signum() * (2.0 * energy.abs()).sqrt()
}
