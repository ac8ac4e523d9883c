//! Async driver: one task owns the controller and serializes every event.

use std::sync::Arc;

use cursorcast_common::{CursorcastError, Result};
use tokio::sync::{mpsc, oneshot, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::marker::MarkerSurface;
use crate::reporter::{PointerEvent, PointerHub, PointerSubscription};
use crate::transport::{Transport, TransportEvent};
use crate::tree::ElementTree;

use super::controller::SessionController;
use super::types::{SessionEffect, SessionSnapshot, SessionState};

enum Command {
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Detach(oneshot::Sender<()>),
}

/// Handle to a running session task.
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Current state of the session, or `None` once it has stopped.
    pub async fn snapshot(&self) -> Option<SessionSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.commands.send(Command::Snapshot(tx)).await.ok()?;
        rx.await.ok()
    }

    pub async fn state(&self) -> Option<SessionState> {
        self.snapshot().await.map(|s| s.state)
    }

    /// Release the pointer listener, close the transport, and wait for the
    /// task to finish.
    pub async fn detach(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        if self.commands.send(Command::Detach(tx)).await.is_ok() {
            let _ = rx.await;
        }
        self.task
            .await
            .map_err(|e| CursorcastError::Session(format!("session task failed: {e}")))
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Attach `controller`, connect `transport`, and drive both on a new task.
pub async fn spawn<T, S>(
    mut controller: SessionController<S>,
    mut transport: T,
    tree: Arc<RwLock<ElementTree>>,
    hub: PointerHub,
) -> Result<SessionHandle>
where
    T: Transport + 'static,
    S: MarkerSurface + Send + 'static,
{
    let stream = controller
        .attach()
        .ok_or_else(|| CursorcastError::Session("session already attached".to_string()))?;
    let events = match transport.connect(&stream).await {
        Ok(events) => events,
        Err(e) => {
            controller.detach();
            return Err(e.into());
        }
    };

    let (command_tx, command_rx) = mpsc::channel(16);
    let driver = Driver {
        controller,
        transport,
        tree,
        hub,
        subscription: None,
    };
    let task = tokio::spawn(driver.run(events, command_rx));
    Ok(SessionHandle {
        commands: command_tx,
        task,
    })
}

struct Driver<T, S: MarkerSurface> {
    controller: SessionController<S>,
    transport: T,
    tree: Arc<RwLock<ElementTree>>,
    hub: PointerHub,
    subscription: Option<PointerSubscription>,
}

impl<T, S> Driver<T, S>
where
    T: Transport,
    S: MarkerSurface,
{
    async fn run(
        mut self,
        mut events: mpsc::Receiver<TransportEvent>,
        mut commands: mpsc::Receiver<Command>,
    ) {
        let mut events_open = true;
        loop {
            let deadline = self.controller.next_deadline();
            tokio::select! {
                event = events.recv(), if events_open => match event {
                    Some(event) => self.on_transport_event(event).await,
                    None => {
                        warn!("Transport event stream ended");
                        events_open = false;
                        self.on_transport_event(TransportEvent::Disconnected).await;
                    }
                },
                pointer = next_pointer(&mut self.subscription) => match pointer {
                    Some(event) => self.on_pointer(event).await,
                    None => self.subscription = None,
                },
                _ = sleep_until(deadline) => {
                    if let Some(message) = self.controller.on_timer(Instant::now()) {
                        self.transport.send(&message).await;
                    }
                },
                command = commands.recv() => match command {
                    Some(Command::Snapshot(reply)) => {
                        let _ = reply.send(self.controller.snapshot());
                    }
                    Some(Command::Detach(reply)) => {
                        self.shutdown().await;
                        let _ = reply.send(());
                        break;
                    }
                    None => {
                        debug!("Session handle dropped");
                        self.shutdown().await;
                        break;
                    }
                },
            }
        }
    }

    async fn on_transport_event(&mut self, event: TransportEvent) {
        let effect = {
            let tree = self.tree.read().await;
            self.controller
                .on_transport_event(event, &tree, Instant::now())
        };
        match effect {
            SessionEffect::StartReporting if self.subscription.is_none() => {
                self.subscription = Some(self.controller.reporter().attach(&self.hub));
            }
            SessionEffect::StopReporting => {
                if let Some(subscription) = self.subscription.take() {
                    subscription.unsubscribe();
                }
            }
            _ => {}
        }
    }

    async fn on_pointer(&mut self, event: PointerEvent) {
        let message = {
            let tree = self.tree.read().await;
            self.controller.on_pointer(&tree, &event, Instant::now())
        };
        if let Some(message) = message {
            self.transport.send(&message).await;
        }
    }

    async fn shutdown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.controller.detach();
        self.transport.disconnect().await;
        info!("Session detached");
    }
}

async fn next_pointer(subscription: &mut Option<PointerSubscription>) -> Option<PointerEvent> {
    match subscription {
        Some(subscription) => subscription.recv().await,
        None => std::future::pending().await,
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
