//! Liveness reaper: prunes stale cursors, and only while there are any.
//!
//! The reaper never owns a timer itself. It exposes the deadline of its
//! single pending sweep and the session driver sleeps until it; when the
//! store empties the reaper goes idle and the driver stops waking up.

use std::time::Duration;

use tokio::time::Instant;
use tracing::trace;

use crate::marker::MarkerSurface;
use crate::store::PresenceStore;

/// Sweep cadence while remote cursors are present.
pub const SWEEP_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaperState {
    Idle,
    Scheduled { deadline: Instant },
}

#[derive(Debug)]
pub struct Reaper {
    state: ReaperState,
    cadence: Duration,
}

impl Reaper {
    pub fn new(cadence: Duration) -> Self {
        Self {
            state: ReaperState::Idle,
            cadence,
        }
    }

    pub fn state(&self) -> ReaperState {
        self.state
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            ReaperState::Idle => None,
            ReaperState::Scheduled { deadline } => Some(deadline),
        }
    }

    /// Opportunistic sweep right after an upsert.
    ///
    /// Arms the next sweep if entries survive and none is pending yet; an
    /// already pending sweep keeps its deadline.
    pub fn after_upsert<S: MarkerSurface>(&mut self, store: &mut PresenceStore<S>, now: Instant) {
        let remaining = store.sweep_expired(now);
        match (self.state, remaining) {
            (ReaperState::Idle, true) => self.arm(now),
            (ReaperState::Scheduled { .. }, false) => self.state = ReaperState::Idle,
            _ => {}
        }
    }

    /// Run the pending sweep if it is due. Returns whether a sweep ran.
    pub fn fire<S: MarkerSurface>(&mut self, store: &mut PresenceStore<S>, now: Instant) -> bool {
        match self.state {
            ReaperState::Scheduled { deadline } if deadline <= now => {
                self.state = ReaperState::Idle;
                if store.sweep_expired(now) {
                    self.arm(now);
                }
                trace!(remaining = store.len(), "Reaper sweep");
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.state = ReaperState::Idle;
    }

    fn arm(&mut self, now: Instant) {
        self.state = ReaperState::Scheduled {
            deadline: now + self.cadence,
        };
    }
}

impl Default for Reaper {
    fn default() -> Self {
        Self::new(SWEEP_INTERVAL)
    }
}
