//! Trailing-edge rate limiter for outgoing moves.

use std::time::Duration;

use tokio::time::Instant;

/// Coalesces bursts into at most one emission per interval.
///
/// The first item of a burst opens a window; later items replace the
/// pending one; when the window closes the latest item is emitted. With a
/// zero interval every item passes straight through.
#[derive(Debug)]
pub struct Throttle<T> {
    interval: Duration,
    pending: Option<T>,
    deadline: Option<Instant>,
}

impl<T> Throttle<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
            deadline: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Offer an item. Returns it immediately when unthrottled.
    pub fn push(&mut self, item: T, now: Instant) -> Option<T> {
        if self.interval.is_zero() {
            return Some(item);
        }
        self.pending = Some(item);
        if self.deadline.is_none() {
            self.deadline = Some(now + self.interval);
        }
        None
    }

    /// Emit the pending item if its window has closed.
    pub fn flush_due(&mut self, now: Instant) -> Option<T> {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn reset(&mut self) {
        self.pending = None;
        self.deadline = None;
    }
}
