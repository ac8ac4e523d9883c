//! In-process transport: every participant on one bus sees the others.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use cursorcast_common::TransportError;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::protocol::PresenceMessage;

use super::types::{StreamSelector, Transport, TransportEvent};

static NEXT_ORIGIN: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone)]
struct Frame {
    stream: String,
    origin: u64,
    payload: serde_json::Value,
}

/// Shared medium for [`LoopbackTransport`]s.
///
/// The bus can be severed and restored to simulate the connection dropping
/// and coming back for every attached transport at once.
#[derive(Debug, Clone)]
pub struct LoopbackBus {
    frames: broadcast::Sender<Frame>,
    online: Arc<watch::Sender<bool>>,
}

impl LoopbackBus {
    pub fn new() -> Self {
        let (frames, _) = broadcast::channel(1024);
        let (online, _) = watch::channel(true);
        Self {
            frames,
            online: Arc::new(online),
        }
    }

    pub fn transport(&self) -> LoopbackTransport {
        LoopbackTransport {
            bus: self.clone(),
            origin: NEXT_ORIGIN.fetch_add(1, Ordering::Relaxed),
            echo: false,
            stream: None,
            pump: None,
        }
    }

    /// Drop the connection for everyone.
    pub fn sever(&self) {
        self.online.send_replace(false);
    }

    /// Bring the connection back.
    pub fn restore(&self) {
        self.online.send_replace(true);
    }

    pub fn is_online(&self) -> bool {
        *self.online.borrow()
    }

    /// Inject a raw payload on `stream` as if another participant sent it.
    pub fn inject(&self, stream: &StreamSelector, payload: serde_json::Value) -> usize {
        self.publish(Frame {
            stream: stream.key().to_string(),
            origin: 0,
            payload,
        })
    }

    fn publish(&self, frame: Frame) -> usize {
        if !self.is_online() {
            return 0;
        }
        self.frames.send(frame).unwrap_or(0)
    }
}

impl Default for LoopbackBus {
    fn default() -> Self {
        Self::new()
    }
}

pub struct LoopbackTransport {
    bus: LoopbackBus,
    origin: u64,
    echo: bool,
    stream: Option<String>,
    pump: Option<JoinHandle<()>>,
}

impl LoopbackTransport {
    /// Also deliver this transport's own messages back to it.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn is_connected(&self) -> bool {
        self.pump.is_some()
    }
}

#[async_trait]
impl Transport for LoopbackTransport {
    async fn connect(
        &mut self,
        stream: &StreamSelector,
    ) -> Result<mpsc::Receiver<TransportEvent>, TransportError> {
        if self.pump.is_some() {
            return Err(TransportError::AlreadyConnected);
        }
        let (event_tx, event_rx) = mpsc::channel(256);
        let key = stream.key().to_string();
        let mut online = self.bus.online.subscribe();
        let up = *online.borrow_and_update();
        let pump = tokio::spawn(run_pump(
            self.bus.frames.subscribe(),
            online,
            up,
            key.clone(),
            self.origin,
            self.echo,
            event_tx,
        ));
        debug!(origin = self.origin, %stream, "Loopback transport connected");
        self.stream = Some(key);
        self.pump = Some(pump);
        Ok(event_rx)
    }

    async fn send(&self, message: &PresenceMessage) {
        let Some(stream) = &self.stream else {
            return;
        };
        self.bus.publish(Frame {
            stream: stream.clone(),
            origin: self.origin,
            payload: message.to_value(),
        });
    }

    async fn disconnect(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
        self.stream = None;
    }
}

impl Drop for LoopbackTransport {
    fn drop(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
    }
}

async fn run_pump(
    mut frames: broadcast::Receiver<Frame>,
    mut online: watch::Receiver<bool>,
    mut up: bool,
    stream: String,
    origin: u64,
    echo: bool,
    events: mpsc::Sender<TransportEvent>,
) {
    if events.send(TransportEvent::Connecting).await.is_err() {
        return;
    }
    if up && events.send(TransportEvent::Connected).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            frame = frames.recv() => {
                let frame = match frame {
                    Ok(frame) => frame,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Loopback transport lagged");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                if !up || frame.stream != stream || (frame.origin == origin && !echo) {
                    continue;
                }
                if events.send(TransportEvent::Message(frame.payload)).await.is_err() {
                    break;
                }
            }
            changed = online.changed() => {
                if changed.is_err() {
                    break;
                }
                let now_up = *online.borrow_and_update();
                if now_up == up {
                    continue;
                }
                up = now_up;
                let sent = if up {
                    match events.send(TransportEvent::Connecting).await {
                        Ok(()) => events.send(TransportEvent::Connected).await,
                        Err(e) => Err(e),
                    }
                } else {
                    events.send(TransportEvent::Disconnected).await
                };
                if sent.is_err() {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Location;
    use serde_json::json;

    fn stream() -> StreamSelector {
        StreamSelector::Named("demo".into())
    }

    fn msg(id: &str) -> PresenceMessage {
        PresenceMessage::moved(
            id,
            "#ffffff",
            Location {
                path: "body".into(),
                x: 1.0,
                y: 2.0,
            },
        )
    }

    async fn connected(transport: &mut LoopbackTransport) -> mpsc::Receiver<TransportEvent> {
        let mut rx = transport.connect(&stream()).await.unwrap();
        assert_eq!(rx.recv().await, Some(TransportEvent::Connecting));
        assert_eq!(rx.recv().await, Some(TransportEvent::Connected));
        rx
    }

    #[tokio::test]
    async fn peers_receive_each_others_messages() {
        let bus = LoopbackBus::new();
        let mut a = bus.transport();
        let mut b = bus.transport();
        let _rx_a = connected(&mut a).await;
        let mut rx_b = connected(&mut b).await;

        a.send(&msg("a")).await;
        let event = rx_b.recv().await.unwrap();
        assert_eq!(event, TransportEvent::Message(msg("a").to_value()));
    }

    #[tokio::test]
    async fn own_messages_are_not_echoed_by_default() {
        let bus = LoopbackBus::new();
        let mut a = bus.transport();
        let mut rx_a = connected(&mut a).await;

        a.send(&msg("a")).await;
        bus.inject(&stream(), json!({"marker": true}));
        assert_eq!(
            rx_a.recv().await,
            Some(TransportEvent::Message(json!({"marker": true})))
        );
    }

    #[tokio::test]
    async fn echo_delivers_own_messages() {
        let bus = LoopbackBus::new();
        let mut a = bus.transport().with_echo(true);
        let mut rx_a = connected(&mut a).await;
        a.send(&msg("a")).await;
        assert_eq!(
            rx_a.recv().await,
            Some(TransportEvent::Message(msg("a").to_value()))
        );
    }

    #[tokio::test]
    async fn other_streams_are_filtered() {
        let bus = LoopbackBus::new();
        let mut a = bus.transport();
        let mut rx_a = connected(&mut a).await;

        bus.inject(&StreamSelector::Named("elsewhere".into()), json!(1));
        bus.inject(&stream(), json!(2));
        assert_eq!(rx_a.recv().await, Some(TransportEvent::Message(json!(2))));
    }

    #[tokio::test]
    async fn sever_and_restore_report_transitions() {
        let bus = LoopbackBus::new();
        let mut a = bus.transport();
        let mut rx_a = connected(&mut a).await;

        bus.sever();
        assert_eq!(rx_a.recv().await, Some(TransportEvent::Disconnected));
        assert_eq!(bus.inject(&stream(), json!("lost")), 0);

        bus.restore();
        assert_eq!(rx_a.recv().await, Some(TransportEvent::Connecting));
        assert_eq!(rx_a.recv().await, Some(TransportEvent::Connected));
        bus.inject(&stream(), json!("back"));
        assert_eq!(rx_a.recv().await, Some(TransportEvent::Message(json!("back"))));
    }

    #[tokio::test]
    async fn connecting_while_severed_waits_for_restore() {
        let bus = LoopbackBus::new();
        bus.sever();
        let mut a = bus.transport();
        let mut rx = a.connect(&stream()).await.unwrap();
        assert_eq!(rx.recv().await, Some(TransportEvent::Connecting));

        bus.restore();
        assert_eq!(rx.recv().await, Some(TransportEvent::Connecting));
        assert_eq!(rx.recv().await, Some(TransportEvent::Connected));
    }

    #[tokio::test]
    async fn double_connect_is_rejected() {
        let bus = LoopbackBus::new();
        let mut a = bus.transport();
        let _rx = a.connect(&stream()).await.unwrap();
        assert!(matches!(
            a.connect(&stream()).await,
            Err(TransportError::AlreadyConnected)
        ));
    }

    #[tokio::test]
    async fn disconnect_closes_the_event_stream() {
        let bus = LoopbackBus::new();
        let mut a = bus.transport();
        let mut rx = connected(&mut a).await;
        a.disconnect().await;
        assert!(!a.is_connected());
        assert_eq!(rx.recv().await, None);

        // Reconnecting after a disconnect is allowed.
        let _rx = connected(&mut a).await;
    }
}
