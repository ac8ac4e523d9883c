//! Public handle for the realtime connection.

use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tracing::debug;

use super::connection::{connection_loop, Shutdown};
use super::types::{ChannelConfig, RealtimeCommand, RealtimeConfig, RealtimeEvent};

/// Handle for the background connection task.
///
/// All methods are non-blocking and only queue commands.
pub struct RealtimeClient {
    command_tx: mpsc::Sender<RealtimeCommand>,
    connected: Arc<RwLock<bool>>,
    shutdown: Arc<Shutdown>,
}

impl RealtimeClient {
    /// Start the background connection. Returns `(client, event_receiver)`.
    pub fn connect(config: RealtimeConfig) -> (Self, mpsc::Receiver<RealtimeEvent>) {
        let (event_tx, event_rx) = mpsc::channel(256);
        let (command_tx, command_rx) = mpsc::channel(64);
        let connected = Arc::new(RwLock::new(false));
        let shutdown = Arc::new(Shutdown::default());

        tokio::spawn(connection_loop(
            config,
            Arc::clone(&connected),
            Arc::clone(&shutdown),
            event_tx,
            command_rx,
        ));

        let client = Self {
            command_tx,
            connected,
            shutdown,
        };
        (client, event_rx)
    }

    async fn queue(&self, command: RealtimeCommand) {
        if self.command_tx.send(command).await.is_err() {
            debug!("Realtime connection task has stopped");
        }
    }

    pub async fn join_channel(&self, topic: &str, config: ChannelConfig) {
        let topic = topic.to_string();
        self.queue(RealtimeCommand::JoinChannel { topic, config }).await;
    }

    pub async fn leave_channel(&self, topic: &str) {
        let topic = topic.to_string();
        self.queue(RealtimeCommand::LeaveChannel { topic }).await;
    }

    pub async fn broadcast(&self, topic: &str, event: &str, payload: serde_json::Value) {
        self.queue(RealtimeCommand::Broadcast {
            topic: topic.to_string(),
            event: event.to_string(),
            payload,
        })
        .await;
    }

    pub async fn is_connected(&self) -> bool {
        *self.connected.read().await
    }

    /// Leave all channels, close the socket, and stop reconnecting.
    pub async fn disconnect(&self) {
        self.shutdown.request();
        self.queue(RealtimeCommand::Disconnect).await;
    }
}
