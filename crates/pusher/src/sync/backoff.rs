// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded exponential backoff between failed poll passes.

use std::time::Duration;

/// Growth factor applied per consecutive failure.
const FACTOR: u32 = 2;

/// Exponential delay bounded by `[min, max]`.
///
/// Each call to [`Backoff::next_delay`] returns `min * 2^n` for the `n`th
/// consecutive failure, capped at `max`. [`Backoff::reset`] starts over at
/// `min`.
#[derive(Debug, Clone)]
pub struct Backoff {
    min: Duration,
    max: Duration,
    attempt: u32,
}

impl Backoff {
    /// Create a backoff. A `max` below `min` is raised to `min`.
    pub fn new(min: Duration, max: Duration) -> Self {
        Backoff {
            min,
            max: max.max(min),
            attempt: 0,
        }
    }

    /// Returns the delay for the current failure and advances to the next.
    pub fn next_delay(&mut self) -> Duration {
        let delay = FACTOR
            .checked_pow(self.attempt)
            .and_then(|multiplier| self.min.checked_mul(multiplier))
            .map_or(self.max, |d| d.min(self.max));

        if delay < self.max {
            self.attempt += 1;
        }
        delay
    }

    /// Start over at the minimum delay.
    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    /// Number of consecutive failures counted since the last reset, up to the cap.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;
