// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Next-tick task queue.

use alloc::collections::VecDeque;

/// FIFO of work deferred to the next turn of the host's main loop.
///
/// Posting never runs anything. The host drains the queue once per loop
/// iteration, after the current event or animation callback has returned.
#[derive(Debug, Clone)]
pub struct TaskQueue<T> {
    tasks: VecDeque<T>,
}

impl<T> TaskQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
        }
    }

    /// Defers `task` to the next tick.
    pub fn post(&mut self, task: T) {
        self.tasks.push_back(task);
    }

    /// Takes the oldest pending task.
    pub fn pop(&mut self) -> Option<T> {
        self.tasks.pop_front()
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
