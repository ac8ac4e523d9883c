//! Live cursor entries, one per remote participant.
//!
//! The store owns the marker surface so every entry's marker is created and
//! destroyed together with the entry itself.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::address;
use crate::marker::{MarkerId, MarkerSurface};
use crate::protocol::PresenceMessage;
use crate::tree::ElementTree;

/// Silence after which a remote cursor is considered gone.
pub const STALE_THRESHOLD: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone)]
pub struct CursorEntry {
    pub id: String,
    pub color: String,
    pub marker: MarkerId,
    pub last_seen_at: Instant,
}

/// Result of applying one presence message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// First sighting of this participant; a marker was created and placed.
    Created,
    /// Existing marker moved and liveness refreshed.
    Moved,
    /// The address did not resolve; nothing changed.
    Unresolved,
}

pub struct PresenceStore<S: MarkerSurface> {
    entries: HashMap<String, CursorEntry>,
    surface: S,
    stale_threshold: Duration,
}

impl<S: MarkerSurface> PresenceStore<S> {
    pub fn new(surface: S) -> Self {
        Self::with_threshold(surface, STALE_THRESHOLD)
    }

    pub fn with_threshold(surface: S, stale_threshold: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            surface,
            stale_threshold,
        }
    }

    /// Create or refresh the entry for `message.id` and move its marker.
    ///
    /// The address is resolved before anything is touched: an unresolvable
    /// location never creates an entry and never moves or refreshes an
    /// existing one.
    pub fn upsert(
        &mut self,
        message: &PresenceMessage,
        tree: &ElementTree,
        now: Instant,
    ) -> UpsertOutcome {
        let Some(anchor) = address::decode(tree, &message.location.path) else {
            debug!(
                participant = %message.id,
                path = %message.location.path,
                "Skipping cursor update: address not found"
            );
            return UpsertOutcome::Unresolved;
        };
        let rect = tree.rect(anchor).unwrap_or_default();
        let scroll = tree.scroll();
        let x = rect.x + scroll.x + message.location.x;
        let y = rect.y + scroll.y + message.location.y;

        match self.entries.get_mut(&message.id) {
            Some(entry) => {
                if entry.color != message.color {
                    self.surface.set_color(entry.marker, &message.color);
                    entry.color = message.color.clone();
                }
                self.surface.translate(entry.marker, x, y);
                entry.last_seen_at = now;
                UpsertOutcome::Moved
            }
            None => {
                let marker = self.surface.create_marker(&message.id, &message.color);
                self.surface.translate(marker, x, y);
                self.entries.insert(
                    message.id.clone(),
                    CursorEntry {
                        id: message.id.clone(),
                        color: message.color.clone(),
                        marker,
                        last_seen_at: now,
                    },
                );
                debug!(participant = %message.id, "Remote cursor appeared");
                UpsertOutcome::Created
            }
        }
    }

    /// Drop every entry silent for longer than the stale threshold.
    /// Returns whether any entries remain.
    pub fn sweep_expired(&mut self, now: Instant) -> bool {
        let threshold = self.stale_threshold;
        let surface = &mut self.surface;
        self.entries.retain(|id, entry| {
            let alive = now.saturating_duration_since(entry.last_seen_at) <= threshold;
            if !alive {
                surface.remove_marker(entry.marker);
                debug!(participant = %id, "Remote cursor expired");
            }
            alive
        });
        !self.entries.is_empty()
    }

    /// Remove a single participant's entry and marker.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.entries.remove(id) {
            Some(entry) => {
                self.surface.remove_marker(entry.marker);
                true
            }
            None => false,
        }
    }

    /// Destroy every entry and marker.
    pub fn clear(&mut self) {
        for (_, entry) in self.entries.drain() {
            self.surface.remove_marker(entry.marker);
        }
    }

    pub fn get(&self, id: &str) -> Option<&CursorEntry> {
        self.entries.get(id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.entries.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stale_threshold(&self) -> Duration {
        self.stale_threshold
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
