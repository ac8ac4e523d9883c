//! Background WebSocket connection loop with auto-reconnect.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{Sink, SinkExt, StreamExt};
use tokio::sync::{mpsc, Mutex, Notify, RwLock};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, error, info, warn};

use super::handler::{handle_phoenix_message, PendingJoins};
use super::types::{ChannelConfig, PhoenixMessage, RealtimeCommand, RealtimeConfig, RealtimeEvent};

static REF_COUNTER: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_ref() -> String {
    REF_COUNTER.fetch_add(1, Ordering::Relaxed).to_string()
}

/// Channels to rejoin after a reconnect, keyed by short topic.
type JoinedChannels = Arc<RwLock<HashMap<String, ChannelConfig>>>;

/// Join refs awaiting a reply on the current connection.
type SharedPendingJoins = Arc<Mutex<PendingJoins>>;

/// Signals the connection loop to stop retrying.
#[derive(Debug, Default)]
pub(crate) struct Shutdown {
    requested: AtomicBool,
    notify: Notify,
}

impl Shutdown {
    pub(crate) fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    pub(crate) fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

/// Exponential backoff: doubles each time, capped at `max`.
pub(crate) fn next_delay(current: u64, max: u64) -> u64 {
    current.saturating_mul(2).clamp(1, max.max(1))
}

pub(crate) fn envelope(topic: &str, event: &str, payload: serde_json::Value) -> PhoenixMessage {
    PhoenixMessage {
        topic: format!("realtime:{topic}"),
        event: event.to_string(),
        payload,
        msg_ref: Some(next_ref()),
    }
}

async fn write_message<S>(writer: &Mutex<S>, msg: &PhoenixMessage) -> bool
where
    S: Sink<WsMessage> + Unpin,
{
    match serde_json::to_string(msg) {
        Ok(json) => writer
            .lock()
            .await
            .send(WsMessage::Text(json.into()))
            .await
            .is_ok(),
        Err(e) => {
            warn!(error = %e, "Failed to serialize Phoenix message");
            false
        }
    }
}

/// Send a `phx_join` and remember its ref so the reply can be matched.
async fn send_join<S>(
    writer: &Mutex<S>,
    pending: &Mutex<PendingJoins>,
    topic: &str,
    channel: &ChannelConfig,
) -> bool
where
    S: Sink<WsMessage> + Unpin,
{
    let msg = envelope(topic, "phx_join", channel.to_join_payload());
    if let Some(msg_ref) = &msg.msg_ref {
        pending.lock().await.insert(msg_ref.clone(), topic.to_string());
    }
    write_message(writer, &msg).await
}

/// Rejoin a channel the server closed, unless it was left in the meantime.
async fn rejoin_after<S>(
    delay: Duration,
    writer: Arc<Mutex<S>>,
    pending: SharedPendingJoins,
    channels: JoinedChannels,
    topic: String,
) where
    S: Sink<WsMessage> + Unpin,
{
    tokio::time::sleep(delay).await;
    let channel = channels.read().await.get(&topic).cloned();
    if let Some(channel) = channel {
        info!(topic = %topic, "Rejoining channel");
        send_join(&writer, &pending, &topic, &channel).await;
    }
}

pub(crate) async fn connection_loop(
    config: RealtimeConfig,
    connected: Arc<RwLock<bool>>,
    shutdown: Arc<Shutdown>,
    event_tx: mpsc::Sender<RealtimeEvent>,
    command_rx: mpsc::Receiver<RealtimeCommand>,
) {
    let command_rx = Arc::new(Mutex::new(command_rx));
    let joined_channels: JoinedChannels = Arc::new(RwLock::new(HashMap::new()));
    let mut reconnect_delay = config.reconnect_delay_secs;
    let connect_timeout = Duration::from_secs(config.connect_timeout_secs);

    while !shutdown.is_requested() {
        let url = config.ws_url();
        info!(url = %url.split('?').next().unwrap_or(""), "Connecting to realtime server");
        let _ = event_tx.send(RealtimeEvent::Connecting).await;

        match tokio::time::timeout(connect_timeout, tokio_tungstenite::connect_async(&url)).await {
            Ok(Ok((ws_stream, _))) => {
                reconnect_delay = config.reconnect_delay_secs;
                *connected.write().await = true;
                let _ = event_tx.send(RealtimeEvent::Connected).await;

                let (ws_write, mut ws_read) = ws_stream.split();
                let ws_write = Arc::new(Mutex::new(ws_write));

                let pending: SharedPendingJoins = Arc::new(Mutex::new(PendingJoins::new()));
                for (topic, channel) in joined_channels.read().await.iter() {
                    send_join(&ws_write, &pending, topic, channel).await;
                }
                let mut rejoins = Vec::new();

                let heartbeat_handle = tokio::spawn(heartbeat_task(
                    Arc::clone(&ws_write),
                    config.heartbeat_interval_secs,
                ));
                let cmd_handle = tokio::spawn(command_forwarder(
                    Arc::clone(&command_rx),
                    Arc::clone(&ws_write),
                    Arc::clone(&joined_channels),
                    Arc::clone(&pending),
                    Arc::clone(&shutdown),
                ));

                while let Some(msg_result) = ws_read.next().await {
                    match msg_result {
                        Ok(WsMessage::Text(text)) => {
                            match serde_json::from_str::<PhoenixMessage>(&text) {
                                Ok(phoenix_msg) => {
                                    let event = {
                                        let mut pending = pending.lock().await;
                                        handle_phoenix_message(&phoenix_msg, &mut pending)
                                    };
                                    match &event {
                                        Some(RealtimeEvent::ChannelError { topic, .. }) => {
                                            joined_channels.write().await.remove(topic);
                                        }
                                        Some(RealtimeEvent::ChannelClosed { topic, .. }) => {
                                            let joined = joined_channels.read().await.contains_key(topic);
                                            if joined {
                                                rejoins.push(tokio::spawn(rejoin_after(
                                                    Duration::from_secs(config.reconnect_delay_secs),
                                                    Arc::clone(&ws_write),
                                                    Arc::clone(&pending),
                                                    Arc::clone(&joined_channels),
                                                    topic.clone(),
                                                )));
                                            }
                                        }
                                        _ => {}
                                    }
                                    if let Some(event) = event {
                                        let _ = event_tx.send(event).await;
                                    }
                                }
                                Err(_) => debug!(text = %text, "Unrecognized message from server"),
                            }
                        }
                        Ok(WsMessage::Close(_)) => {
                            info!("Realtime server closed connection");
                            break;
                        }
                        Err(e) => {
                            warn!(error = %e, "WebSocket error");
                            break;
                        }
                        _ => {}
                    }
                }

                heartbeat_handle.abort();
                cmd_handle.abort();
                for rejoin in rejoins {
                    rejoin.abort();
                }
                *connected.write().await = false;
                let _ = event_tx.send(RealtimeEvent::Disconnected).await;
            }
            Ok(Err(e)) => {
                error!(error = %e, "Failed to connect to realtime server");
                let _ = event_tx
                    .send(RealtimeEvent::Error(format!("Connection failed: {e}")))
                    .await;
            }
            Err(_elapsed) => {
                error!(timeout = ?connect_timeout, "WebSocket connection timed out");
                let _ = event_tx
                    .send(RealtimeEvent::Error("Connection timed out".to_string()))
                    .await;
            }
        }

        if shutdown.is_requested() {
            break;
        }
        info!(delay = reconnect_delay, "Reconnecting in {} seconds", reconnect_delay);
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(reconnect_delay)) => {}
            _ = shutdown.notify.notified() => {}
        }
        reconnect_delay = next_delay(reconnect_delay, config.max_reconnect_delay_secs);
    }
    debug!("Realtime connection loop stopped");
}

async fn heartbeat_task<S>(ws_write: Arc<Mutex<S>>, interval_secs: u64)
where
    S: Sink<WsMessage> + Unpin,
{
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    loop {
        interval.tick().await;
        let msg = PhoenixMessage {
            topic: "phoenix".to_string(),
            event: "heartbeat".to_string(),
            payload: serde_json::json!({}),
            msg_ref: Some(next_ref()),
        };
        if !write_message(&ws_write, &msg).await {
            break;
        }
    }
}

async fn command_forwarder<S>(
    cmd_rx: Arc<Mutex<mpsc::Receiver<RealtimeCommand>>>,
    cmd_write: Arc<Mutex<S>>,
    channels: JoinedChannels,
    pending: SharedPendingJoins,
    shutdown: Arc<Shutdown>,
) where
    S: Sink<WsMessage> + Unpin,
{
    let mut rx = cmd_rx.lock().await;
    while let Some(cmd) = rx.recv().await {
        match cmd {
            RealtimeCommand::JoinChannel { topic, config } => {
                send_join(&cmd_write, &pending, &topic, &config).await;
                channels.write().await.insert(topic, config);
            }
            RealtimeCommand::LeaveChannel { topic } => {
                let msg = envelope(&topic, "phx_leave", serde_json::json!({}));
                write_message(&cmd_write, &msg).await;
                channels.write().await.remove(&topic);
            }
            RealtimeCommand::Broadcast {
                topic,
                event,
                payload,
            } => {
                let msg = envelope(
                    &topic,
                    "broadcast",
                    serde_json::json!({
                        "type": "broadcast",
                        "event": event,
                        "payload": payload
                    }),
                );
                write_message(&cmd_write, &msg).await;
            }
            RealtimeCommand::Disconnect => {
                shutdown.request();
                let topics: Vec<String> = channels.write().await.drain().map(|(t, _)| t).collect();
                for topic in topics {
                    let msg = envelope(&topic, "phx_leave", serde_json::json!({}));
                    write_message(&cmd_write, &msg).await;
                }
                let _ = cmd_write.lock().await.send(WsMessage::Close(None)).await;
                return;
            }
        }
    }
}
