use std::time::Duration;

use cursorcast_common::Point;
use serde::Serialize;

use crate::reaper::SWEEP_INTERVAL;
use crate::store::STALE_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Not attached to any stream.
    Idle,
    /// Waiting for the transport to report the stream joined.
    Connecting,
    /// Sending local moves and drawing remote cursors.
    Active,
    /// Connection lost; local presence state has been torn down.
    Disconnected,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Active => "active",
            Self::Disconnected => "disconnected",
        };
        f.write_str(name)
    }
}

/// What the driver must do with the pointer subscription after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEffect {
    None,
    StartReporting,
    StopReporting,
}

/// Timing of remote cursor expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Liveness {
    pub stale_threshold: Duration,
    pub sweep_interval: Duration,
}

impl Default for Liveness {
    fn default() -> Self {
        Self {
            stale_threshold: STALE_THRESHOLD,
            sweep_interval: SWEEP_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionCounters {
    /// Valid inbound moves.
    pub received: u64,
    /// Inbound payloads rejected by validation.
    pub dropped: u64,
    /// Valid moves whose address did not resolve locally.
    pub unresolved: u64,
    /// Outbound moves handed to the transport.
    pub sent: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CursorSnapshot {
    pub id: String,
    pub color: String,
    pub position: Option<Point>,
}

/// Point-in-time view of a session, for hosts and tests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub participant_id: String,
    /// Remote cursors, sorted by id.
    pub cursors: Vec<CursorSnapshot>,
    pub reaper_scheduled: bool,
    pub counters: SessionCounters,
}

impl SessionSnapshot {
    pub fn cursor(&self, id: &str) -> Option<&CursorSnapshot> {
        self.cursors.iter().find(|c| c.id == id)
    }

    pub fn dropped_messages(&self) -> u64 {
        self.counters.dropped
    }
}
