//! [`Transport`] over the realtime client.

use async_trait::async_trait;
use cursorcast_common::TransportError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::protocol::{events, PresenceMessage};
use crate::transport::{StreamSelector, Transport, TransportEvent};

use super::client::RealtimeClient;
use super::types::{ChannelConfig, RealtimeConfig, RealtimeEvent, SIGNED_TOPIC};

pub struct RealtimeTransport {
    config: RealtimeConfig,
    client: Option<RealtimeClient>,
    topic: Option<String>,
    forwarder: Option<JoinHandle<()>>,
}

impl RealtimeTransport {
    pub fn new(config: RealtimeConfig) -> Self {
        Self {
            config,
            client: None,
            topic: None,
            forwarder: None,
        }
    }
}

/// Channel topic and join settings for a stream.
pub(crate) fn channel_for(stream: &StreamSelector) -> (String, ChannelConfig) {
    match stream {
        StreamSelector::Named(name) => (name.clone(), ChannelConfig::default()),
        StreamSelector::Signed(token) => (
            SIGNED_TOPIC.to_string(),
            ChannelConfig {
                signed_stream_name: Some(token.clone()),
                ..Default::default()
            },
        ),
    }
}

/// What the session should see for one realtime event on `topic`.
///
/// The socket coming up is not enough; the stream only counts as connected
/// once its channel join is acknowledged. A rejected join or a closed
/// channel on our topic leaves the stream disconnected until a rejoin lands.
pub(crate) fn translate(event: RealtimeEvent, topic: &str) -> Option<TransportEvent> {
    match event {
        RealtimeEvent::Connecting => Some(TransportEvent::Connecting),
        RealtimeEvent::Connected => None,
        RealtimeEvent::Disconnected => Some(TransportEvent::Disconnected),
        RealtimeEvent::ChannelJoined { topic: t } if t == topic => Some(TransportEvent::Connected),
        RealtimeEvent::ChannelError { topic: t, message } if t == topic => {
            warn!(topic = %t, reason = %message, "Channel join rejected");
            Some(TransportEvent::Disconnected)
        }
        RealtimeEvent::ChannelClosed { topic: t, reason } if t == topic => {
            warn!(topic = %t, reason = %reason, "Channel lost");
            Some(TransportEvent::Disconnected)
        }
        RealtimeEvent::Broadcast {
            topic: t,
            event,
            payload,
        } if t == topic => {
            if event == events::MOVE {
                Some(TransportEvent::Message(payload))
            } else {
                debug!(event = %event, "Ignoring broadcast");
                None
            }
        }
        RealtimeEvent::Error(e) => Some(TransportEvent::Error(e)),
        _ => None,
    }
}

#[async_trait]
impl Transport for RealtimeTransport {
    async fn connect(
        &mut self,
        stream: &StreamSelector,
    ) -> Result<mpsc::Receiver<TransportEvent>, TransportError> {
        if self.client.is_some() {
            return Err(TransportError::AlreadyConnected);
        }
        if self.config.endpoint.is_none() && self.config.project_ref.is_empty() {
            return Err(TransportError::ConnectFailed(
                "no project_ref or endpoint configured".to_string(),
            ));
        }

        let (client, mut realtime_rx) = RealtimeClient::connect(self.config.clone());
        let (topic, channel) = channel_for(stream);
        client.join_channel(&topic, channel).await;

        let (event_tx, event_rx) = mpsc::channel(256);
        let forward_topic = topic.clone();
        let forwarder = tokio::spawn(async move {
            while let Some(event) = realtime_rx.recv().await {
                let Some(event) = translate(event, &forward_topic) else {
                    continue;
                };
                if event_tx.send(event).await.is_err() {
                    break;
                }
            }
        });

        debug!(%stream, topic = %topic, "Realtime transport connecting");
        self.client = Some(client);
        self.topic = Some(topic);
        self.forwarder = Some(forwarder);
        Ok(event_rx)
    }

    async fn send(&self, message: &PresenceMessage) {
        match (&self.client, &self.topic) {
            (Some(client), Some(topic)) => {
                client.broadcast(topic, events::MOVE, message.to_value()).await;
            }
            _ => warn!("Dropping outbound move: transport not connected"),
        }
    }

    async fn disconnect(&mut self) {
        if let Some(client) = self.client.take() {
            client.disconnect().await;
        }
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
        }
        self.topic = None;
    }
}
