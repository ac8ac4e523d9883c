//! The session state machine.
//!
//! Owns the reporter, the store, and the reaper, and reacts to the three
//! event sources: transport events, local pointer movement, and timers.
//! It never awaits; [`super::runtime`] feeds it from a single task.

use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::identity::LocalSession;
use crate::marker::{MarkerLayer, MarkerSurface};
use crate::protocol::PresenceMessage;
use crate::reaper::Reaper;
use crate::reporter::{LocalInputReporter, PointerEvent};
use crate::store::{PresenceStore, UpsertOutcome};
use crate::transport::{StreamSelector, TransportEvent};
use crate::tree::ElementTree;

use super::types::{
    CursorSnapshot, Liveness, SessionCounters, SessionEffect, SessionSnapshot, SessionState,
};

pub struct SessionController<S: MarkerSurface = MarkerLayer> {
    state: SessionState,
    stream: StreamSelector,
    reporter: LocalInputReporter,
    store: PresenceStore<S>,
    reaper: Reaper,
    counters: SessionCounters,
}

impl<S: MarkerSurface> SessionController<S> {
    pub fn new(session: LocalSession, stream: StreamSelector, surface: S) -> Self {
        Self::with_liveness(session, stream, surface, Liveness::default())
    }

    pub fn with_liveness(
        session: LocalSession,
        stream: StreamSelector,
        surface: S,
        liveness: Liveness,
    ) -> Self {
        Self {
            state: SessionState::Idle,
            stream,
            reporter: LocalInputReporter::new(session),
            store: PresenceStore::with_threshold(surface, liveness.stale_threshold),
            reaper: Reaper::new(liveness.sweep_interval),
            counters: SessionCounters::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stream(&self) -> &StreamSelector {
        &self.stream
    }

    pub fn session(&self) -> &LocalSession {
        self.reporter.session()
    }

    pub fn reporter(&self) -> &LocalInputReporter {
        &self.reporter
    }

    pub fn store(&self) -> &PresenceStore<S> {
        &self.store
    }

    pub fn reaper(&self) -> &Reaper {
        &self.reaper
    }

    pub fn counters(&self) -> &SessionCounters {
        &self.counters
    }

    /// Begin connecting. Returns the stream to open, or `None` when the
    /// session is already connecting or active.
    pub fn attach(&mut self) -> Option<StreamSelector> {
        match self.state {
            SessionState::Idle | SessionState::Disconnected => {
                self.transition(SessionState::Connecting);
                Some(self.stream.clone())
            }
            SessionState::Connecting | SessionState::Active => {
                debug!(state = %self.state, "Attach ignored");
                None
            }
        }
    }

    /// Stop everything and return to `Idle`.
    pub fn detach(&mut self) {
        if self.state != SessionState::Idle {
            self.teardown();
            self.transition(SessionState::Idle);
        }
    }

    pub fn on_transport_event(
        &mut self,
        event: TransportEvent,
        tree: &ElementTree,
        now: Instant,
    ) -> SessionEffect {
        match (event, self.state) {
            (TransportEvent::Connecting, SessionState::Disconnected) => {
                self.transition(SessionState::Connecting);
                SessionEffect::None
            }
            (
                TransportEvent::Connected,
                SessionState::Connecting | SessionState::Disconnected,
            ) => {
                self.transition(SessionState::Active);
                SessionEffect::StartReporting
            }
            (TransportEvent::Disconnected, SessionState::Active) => {
                self.teardown();
                self.transition(SessionState::Disconnected);
                SessionEffect::StopReporting
            }
            (TransportEvent::Disconnected, SessionState::Connecting) => {
                self.transition(SessionState::Disconnected);
                SessionEffect::None
            }
            (TransportEvent::Message(value), SessionState::Active) => {
                self.handle_message(value, tree, now);
                SessionEffect::None
            }
            (TransportEvent::Message(_), state) => {
                trace!(%state, "Ignoring message outside an active session");
                SessionEffect::None
            }
            (TransportEvent::Error(error), state) => {
                warn!(%state, error = %error, "Transport error");
                SessionEffect::None
            }
            (event, state) => {
                trace!(?event, %state, "Transport event does not change state");
                SessionEffect::None
            }
        }
    }

    /// Local pointer movement. Returns a message to send now, if any.
    pub fn on_pointer(
        &mut self,
        tree: &ElementTree,
        event: &PointerEvent,
        now: Instant,
    ) -> Option<PresenceMessage> {
        if self.state != SessionState::Active {
            return None;
        }
        let message = self.reporter.on_pointer_move(tree, event, now)?;
        self.counters.sent += 1;
        Some(message)
    }

    /// Run whatever timers are due. Returns a throttled message to send.
    pub fn on_timer(&mut self, now: Instant) -> Option<PresenceMessage> {
        self.reaper.fire(&mut self.store, now);
        if self.state != SessionState::Active {
            return None;
        }
        let message = self.reporter.flush_due(now)?;
        self.counters.sent += 1;
        Some(message)
    }

    /// Earliest instant at which [`on_timer`](Self::on_timer) has work.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.reaper.deadline(), self.reporter.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut cursors: Vec<CursorSnapshot> = self
            .store
            .ids()
            .into_iter()
            .filter_map(|id| self.store.get(id))
            .map(|entry| CursorSnapshot {
                id: entry.id.clone(),
                color: entry.color.clone(),
                position: self.store.surface().position(entry.marker),
            })
            .collect();
        cursors.sort_by(|a, b| a.id.cmp(&b.id));

        SessionSnapshot {
            state: self.state,
            participant_id: self.session().id().to_string(),
            cursors,
            reaper_scheduled: self.reaper.deadline().is_some(),
            counters: self.counters.clone(),
        }
    }

    fn handle_message(&mut self, value: serde_json::Value, tree: &ElementTree, now: Instant) {
        let message = match PresenceMessage::from_value(value) {
            Ok(message) => message,
            Err(e) => {
                self.counters.dropped += 1;
                warn!(error = %e, dropped = self.counters.dropped, "Dropping malformed presence message");
                return;
            }
        };
        self.counters.received += 1;
        if self.store.upsert(&message, tree, now) == UpsertOutcome::Unresolved {
            self.counters.unresolved += 1;
        }
        self.reaper.after_upsert(&mut self.store, now);
    }

    fn teardown(&mut self) {
        let own_id = self.session().id().to_string();
        if self.store.remove(&own_id) {
            debug!(participant = %own_id, "Removed own cursor marker");
        }
        let flushed = self.store.len();
        self.store.clear();
        self.reaper.cancel();
        self.reporter.reset();
        debug!(flushed, "Presence state cleared");
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            info!(from = %self.state, to = %next, stream = %self.stream, "Session state changed");
            self.state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Location;
    use crate::reaper::ReaperState;
    use cursorcast_common::{Point, Rect};
    use serde_json::json;
    use std::time::Duration;

    fn page() -> ElementTree {
        let mut tree = ElementTree::new();
        let doc = tree.document();
        let body = tree
            .create_element(doc, "body", Rect::new(0.0, 0.0, 1000.0, 1000.0))
            .unwrap();
        tree.create_element(body, "main", Rect::new(100.0, 100.0, 500.0, 500.0))
            .unwrap();
        tree
    }

    fn controller(throttle_ms: u64) -> SessionController {
        let session = LocalSession::from_parts(
            Some("me".into()),
            Some("#101010".into()),
            Duration::from_millis(throttle_ms),
        );
        SessionController::new(session, StreamSelector::Named("room".into()), MarkerLayer::new())
    }

    fn active(throttle_ms: u64, tree: &ElementTree, now: Instant) -> SessionController {
        let mut c = controller(throttle_ms);
        c.attach().unwrap();
        assert_eq!(
            c.on_transport_event(TransportEvent::Connected, tree, now),
            SessionEffect::StartReporting
        );
        c
    }

    fn remote(id: &str, path: &str) -> TransportEvent {
        TransportEvent::Message(
            PresenceMessage::moved(
                id,
                "#abcdef",
                Location {
                    path: path.into(),
                    x: 5.0,
                    y: 5.0,
                },
            )
            .to_value(),
        )
    }

    fn pointer(tree: &ElementTree, x: f64) -> PointerEvent {
        let path = tree.hit_test(x, 200.0).unwrap();
        PointerEvent::new(path, x, 200.0)
    }

    #[test]
    fn lifecycle_transitions() {
        let tree = page();
        let now = Instant::now();
        let mut c = controller(0);
        assert_eq!(c.state(), SessionState::Idle);

        assert_eq!(c.attach(), Some(StreamSelector::Named("room".into())));
        assert_eq!(c.state(), SessionState::Connecting);
        assert_eq!(c.attach(), None);

        c.on_transport_event(TransportEvent::Connected, &tree, now);
        assert_eq!(c.state(), SessionState::Active);

        let effect = c.on_transport_event(TransportEvent::Disconnected, &tree, now);
        assert_eq!(effect, SessionEffect::StopReporting);
        assert_eq!(c.state(), SessionState::Disconnected);

        c.on_transport_event(TransportEvent::Connecting, &tree, now);
        assert_eq!(c.state(), SessionState::Connecting);

        c.on_transport_event(TransportEvent::Connected, &tree, now);
        assert_eq!(c.state(), SessionState::Active);

        c.detach();
        assert_eq!(c.state(), SessionState::Idle);
    }

    #[test]
    fn repeated_connected_does_not_restart_reporting() {
        let tree = page();
        let now = Instant::now();
        let mut c = active(0, &tree, now);
        assert_eq!(
            c.on_transport_event(TransportEvent::Connected, &tree, now),
            SessionEffect::None
        );
    }

    #[test]
    fn events_after_detach_are_ignored() {
        let tree = page();
        let now = Instant::now();
        let mut c = active(0, &tree, now);
        c.detach();
        c.on_transport_event(TransportEvent::Connected, &tree, now);
        c.on_transport_event(remote("bob", "body>main"), &tree, now);
        assert_eq!(c.state(), SessionState::Idle);
        assert!(c.store().is_empty());
    }

    #[test]
    fn messages_before_activation_are_ignored() {
        let tree = page();
        let now = Instant::now();
        let mut c = controller(0);
        c.attach();
        c.on_transport_event(remote("bob", "body>main"), &tree, now);
        assert!(c.store().is_empty());
        assert_eq!(c.counters().received, 0);
    }

    #[test]
    fn active_messages_reach_the_store_and_arm_the_reaper() {
        let tree = page();
        let now = Instant::now();
        let mut c = active(0, &tree, now);

        c.on_transport_event(remote("bob", "body>main"), &tree, now);
        let snap = c.snapshot();
        assert_eq!(snap.cursors.len(), 1);
        assert_eq!(
            snap.cursor("bob").unwrap().position,
            Some(Point::new(105.0, 105.0))
        );
        assert!(snap.reaper_scheduled);
        assert_eq!(snap.counters.received, 1);
    }

    #[test]
    fn malformed_messages_are_counted_and_dropped() {
        let tree = page();
        let now = Instant::now();
        let mut c = active(0, &tree, now);

        c.on_transport_event(TransportEvent::Message(json!({"event": "move"})), &tree, now);
        c.on_transport_event(TransportEvent::Message(json!(42)), &tree, now);
        assert_eq!(c.snapshot().dropped_messages(), 2);
        assert!(c.store().is_empty());
        assert_eq!(c.state(), SessionState::Active);
    }

    #[test]
    fn unresolved_messages_are_counted() {
        let tree = page();
        let now = Instant::now();
        let mut c = active(0, &tree, now);
        c.on_transport_event(remote("bob", "body>aside"), &tree, now);
        assert!(c.store().is_empty());
        assert_eq!(c.counters().unresolved, 1);
        assert_eq!(c.reaper().state(), ReaperState::Idle);
    }

    #[test]
    fn disconnect_clears_store_and_own_marker() {
        let tree = page();
        let now = Instant::now();
        let mut c = active(100, &tree, now);

        c.on_transport_event(remote("bob", "body>main"), &tree, now);
        c.on_transport_event(remote("me", "body"), &tree, now);
        c.on_pointer(&tree, &pointer(&tree, 150.0), now);
        assert_eq!(c.store().len(), 2);
        assert!(c.next_deadline().is_some());

        c.on_transport_event(TransportEvent::Disconnected, &tree, now);
        assert!(c.store().is_empty());
        assert!(c.store().surface().is_empty());
        assert_eq!(c.reaper().state(), ReaperState::Idle);
        assert_eq!(c.next_deadline(), None);
    }

    #[test]
    fn pointer_only_emits_while_active() {
        let tree = page();
        let now = Instant::now();
        let mut c = controller(0);
        assert!(c.on_pointer(&tree, &pointer(&tree, 150.0), now).is_none());

        c.attach();
        assert!(c.on_pointer(&tree, &pointer(&tree, 150.0), now).is_none());

        c.on_transport_event(TransportEvent::Connected, &tree, now);
        let msg = c.on_pointer(&tree, &pointer(&tree, 150.0), now).unwrap();
        assert_eq!(msg.id, "me");
        assert_eq!(msg.location.path, "body>main");
        assert_eq!(msg.location.x, 50.0);
        assert_eq!(c.counters().sent, 1);

        c.on_transport_event(TransportEvent::Disconnected, &tree, now);
        assert!(c.on_pointer(&tree, &pointer(&tree, 150.0), now).is_none());
    }

    #[test]
    fn throttled_moves_flush_on_timer() {
        let tree = page();
        let t = Instant::now();
        let mut c = active(100, &tree, t);

        assert!(c.on_pointer(&tree, &pointer(&tree, 150.0), t).is_none());
        assert!(c
            .on_pointer(&tree, &pointer(&tree, 160.0), t + Duration::from_millis(50))
            .is_none());
        assert_eq!(c.next_deadline(), Some(t + Duration::from_millis(100)));

        let msg = c.on_timer(t + Duration::from_millis(100)).unwrap();
        assert_eq!(msg.location.x, 60.0);
        assert_eq!(c.next_deadline(), None);
    }

    #[test]
    fn next_deadline_is_earliest_of_reaper_and_throttle() {
        let tree = page();
        let t = Instant::now();
        let mut c = active(100, &tree, t);
        c.on_transport_event(remote("bob", "body>main"), &tree, t);
        assert_eq!(c.next_deadline(), Some(t + Duration::from_millis(500)));

        c.on_pointer(&tree, &pointer(&tree, 150.0), t + Duration::from_millis(10));
        assert_eq!(c.next_deadline(), Some(t + Duration::from_millis(110)));
    }

    #[test]
    fn timer_expires_silent_peers() {
        let tree = page();
        let t = Instant::now();
        let mut c = active(0, &tree, t);
        c.on_transport_event(remote("bob", "body>main"), &tree, t);

        let mut now = t;
        while let Some(deadline) = c.next_deadline() {
            now = deadline;
            c.on_timer(now);
        }
        assert!(c.store().is_empty());
        assert!(now - t <= Duration::from_millis(2500));
    }

    #[test]
    fn custom_liveness_is_applied() {
        let tree = page();
        let t = Instant::now();
        let mut c = SessionController::with_liveness(
            LocalSession::generate(),
            StreamSelector::Signed("tok".into()),
            MarkerLayer::new(),
            Liveness {
                stale_threshold: Duration::from_millis(300),
                sweep_interval: Duration::from_millis(100),
            },
        );
        c.attach();
        c.on_transport_event(TransportEvent::Connected, &tree, t);
        c.on_transport_event(remote("bob", "body>main"), &tree, t);
        assert_eq!(c.next_deadline(), Some(t + Duration::from_millis(100)));
        c.on_timer(t + Duration::from_millis(400));
        assert!(c.store().is_empty());
    }
}
