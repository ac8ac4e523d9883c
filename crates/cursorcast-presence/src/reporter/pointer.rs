use tokio::sync::broadcast;
use tracing::trace;

use crate::tree::NodeId;

const DEFAULT_CAPACITY: usize = 256;

/// A pointer movement as delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    /// Composed path, innermost target first.
    pub path: Vec<NodeId>,
    /// Viewport-relative pointer position.
    pub client_x: f64,
    pub client_y: f64,
}

impl PointerEvent {
    pub fn new(path: Vec<NodeId>, client_x: f64, client_y: f64) -> Self {
        Self {
            path,
            client_x,
            client_y,
        }
    }

    pub fn target(&self) -> Option<NodeId> {
        self.path.first().copied()
    }
}

/// Fan-out point for host pointer events.
#[derive(Debug, Clone)]
pub struct PointerHub {
    sender: broadcast::Sender<PointerEvent>,
}

impl PointerHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> PointerSubscription {
        PointerSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Deliver an event to every subscriber. Returns how many received it.
    pub fn dispatch(&self, event: PointerEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for PointerHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// A live registration on a [`PointerHub`]. Dropping it unsubscribes.
#[derive(Debug)]
pub struct PointerSubscription {
    receiver: broadcast::Receiver<PointerEvent>,
}

impl PointerSubscription {
    /// Next pointer event, or `None` once the hub is gone.
    ///
    /// A slow reader skips the events it missed; only the newest positions
    /// matter for presence.
    pub async fn recv(&mut self) -> Option<PointerEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    trace!(skipped, "Pointer subscription lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    pub fn unsubscribe(self) {}
}
