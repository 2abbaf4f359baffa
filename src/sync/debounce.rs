// Copyright 2025 the Bikestem Authors
// SPDX-License-Identifier: Apache-2.0

//! Trailing-edge debounce driven by caller-supplied instants.
//!
//! Each `push` replaces the held value and restarts the quiet window; `poll`
//! hands the value out once the window has passed with no further pushes.
//! The debouncer owns no timer, so the caller decides what "now" is: the
//! async session passes the runtime clock, tests pass fixed instants.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<Pending<T>>,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Hold `value` and restart the window from `now`
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            value,
            deadline: now + self.window,
        });
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the held value becomes due, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    /// Time left until the held value is due, zero if already due
    pub fn time_remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Take the held value if its window has passed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(pending) if now >= pending.deadline => {
                self.pending.take().map(|pending| pending.value)
            }
            _ => None,
        }
    }

    /// Drop the held value without emitting it
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|pending| pending.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(250);

    #[test]
    fn emits_after_quiet_window() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.push(1, start);

        assert_eq!(debouncer.poll(start + Duration::from_millis(249)), None);
        assert_eq!(debouncer.poll(start + WINDOW), Some(1));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(start + WINDOW * 2), None);
    }

    #[test]
    fn push_restarts_window_and_keeps_latest() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        for (i, offset) in [0u64, 100, 200, 300].into_iter().enumerate() {
            debouncer.push(i, start + Duration::from_millis(offset));
        }

        // 250ms after the first push, but only 50ms after the last
        assert_eq!(debouncer.poll(start + Duration::from_millis(350)), None);
        assert_eq!(debouncer.poll(start + Duration::from_millis(550)), Some(3));
    }

    #[test]
    fn cancel_drops_pending_value() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.push("draft", start);
        assert_eq!(debouncer.cancel(), Some("draft"));
        assert_eq!(debouncer.poll(start + WINDOW), None);
        assert_eq!(debouncer.deadline(), None);
    }

    #[test]
    fn time_remaining_saturates() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        assert_eq!(debouncer.time_remaining(start), None);
        debouncer.push((), start);
        assert_eq!(debouncer.time_remaining(start), Some(WINDOW));
        assert_eq!(
            debouncer.time_remaining(start + Duration::from_secs(1)),
            Some(Duration::ZERO)
        );
    }
}
