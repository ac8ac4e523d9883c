use tokio::time::Instant;
use tracing::{debug, trace};

use crate::address;
use crate::identity::LocalSession;
use crate::protocol::{Location, PresenceMessage};
use crate::tree::ElementTree;

use super::pointer::{PointerEvent, PointerHub, PointerSubscription};
use super::throttle::Throttle;

/// Turns local pointer movement into outgoing presence messages.
#[derive(Debug)]
pub struct LocalInputReporter {
    session: LocalSession,
    throttle: Throttle<PresenceMessage>,
}

impl LocalInputReporter {
    pub fn new(session: LocalSession) -> Self {
        let throttle = Throttle::new(session.throttle);
        Self { session, throttle }
    }

    pub fn session(&self) -> &LocalSession {
        &self.session
    }

    /// Start listening for pointer movement on `hub`.
    pub fn attach(&self, hub: &PointerHub) -> PointerSubscription {
        let subscription = hub.subscribe();
        debug!(
            participant = %self.session.participant_id,
            listeners = hub.listener_count(),
            "Pointer listener attached"
        );
        subscription
    }

    /// Build the message for one pointer event.
    ///
    /// Returns the message to send now, if any. Throttled messages are held
    /// back and surface later through [`flush_due`](Self::flush_due).
    pub fn on_pointer_move(
        &mut self,
        tree: &ElementTree,
        event: &PointerEvent,
        now: Instant,
    ) -> Option<PresenceMessage> {
        let message = self.build(tree, event)?;
        self.throttle.push(message, now)
    }

    pub fn flush_due(&mut self, now: Instant) -> Option<PresenceMessage> {
        self.throttle.flush_due(now)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.throttle.deadline()
    }

    pub fn reset(&mut self) {
        self.throttle.reset();
    }

    fn build(&self, tree: &ElementTree, event: &PointerEvent) -> Option<PresenceMessage> {
        let target = event.target()?;
        if !tree.is_element(target) || !tree.is_connected(target) {
            trace!(%target, "Ignoring pointer event without a connected element target");
            return None;
        }
        let rect = tree.rect(target)?;
        let path = address::encode(tree, &event.path)?;
        Some(PresenceMessage::moved(
            self.session.participant_id.as_str(),
            self.session.color.as_str(),
            Location {
                path,
                x: event.client_x - rect.x,
                y: event.client_y - rect.y,
            },
        ))
    }
}
