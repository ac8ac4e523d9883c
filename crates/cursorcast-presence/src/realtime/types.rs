//! Configuration, Phoenix envelopes, and event/command enums.

use serde::{Deserialize, Serialize};

/// Topic used for streams addressed by a signed token.
pub const SIGNED_TOPIC: &str = "signed";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct RealtimeConfig {
    /// Supabase project reference. Ignored when `endpoint` is set.
    pub project_ref: String,
    /// Publishable API key.
    pub api_key: String,
    /// Full WebSocket URL of a self-hosted Realtime server.
    pub endpoint: Option<String>,
    pub heartbeat_interval_secs: u64,
    pub reconnect_delay_secs: u64,
    pub max_reconnect_delay_secs: u64,
    pub connect_timeout_secs: u64,
}

impl std::fmt::Debug for RealtimeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeConfig")
            .field("project_ref", &self.project_ref)
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .field("heartbeat_interval_secs", &self.heartbeat_interval_secs)
            .field("reconnect_delay_secs", &self.reconnect_delay_secs)
            .field("max_reconnect_delay_secs", &self.max_reconnect_delay_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            project_ref: String::new(),
            api_key: String::new(),
            endpoint: None,
            heartbeat_interval_secs: 25,
            reconnect_delay_secs: 1,
            max_reconnect_delay_secs: 30,
            connect_timeout_secs: 15,
        }
    }
}

impl RealtimeConfig {
    pub(crate) fn ws_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => {
                let sep = if endpoint.contains('?') { '&' } else { '?' };
                format!("{endpoint}{sep}apikey={}&vsn=1.0.0", self.api_key)
            }
            None => format!(
                "wss://{}.supabase.co/realtime/v1/websocket?apikey={}&vsn=1.0.0",
                self.project_ref, self.api_key
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Phoenix protocol
// ---------------------------------------------------------------------------

/// Phoenix v1 JSON envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhoenixMessage {
    pub topic: String,
    pub event: String,
    pub payload: serde_json::Value,
    #[serde(rename = "ref")]
    pub msg_ref: Option<String>,
}

/// How to join one channel.
#[derive(Debug, Clone, Default)]
pub struct ChannelConfig {
    /// Receive our own broadcasts back.
    pub self_send: bool,
    /// Ask the server to acknowledge broadcasts.
    pub ack: bool,
    /// Server-issued token naming the stream.
    pub signed_stream_name: Option<String>,
}

impl ChannelConfig {
    pub(crate) fn to_join_payload(&self) -> serde_json::Value {
        let mut payload = serde_json::json!({
            "config": {
                "broadcast": {
                    "self": self.self_send,
                    "ack": self.ack
                },
                "presence": { "key": "" }
            }
        });
        if let Some(token) = &self.signed_stream_name {
            payload["signed_stream_name"] = serde_json::Value::String(token.clone());
        }
        payload
    }
}

// ---------------------------------------------------------------------------
// Events & commands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum RealtimeEvent {
    /// A connection attempt is starting.
    Connecting,
    /// WebSocket is up; channels are being (re)joined.
    Connected,
    Disconnected,
    ChannelJoined { topic: String },
    /// The server refused our join.
    ChannelError { topic: String, message: String },
    /// A joined channel was closed or crashed on the server.
    ChannelClosed { topic: String, reason: String },
    Broadcast {
        topic: String,
        event: String,
        payload: serde_json::Value,
    },
    Error(String),
}

#[derive(Debug)]
pub(crate) enum RealtimeCommand {
    JoinChannel {
        topic: String,
        config: ChannelConfig,
    },
    LeaveChannel {
        topic: String,
    },
    Broadcast {
        topic: String,
        event: String,
        payload: serde_json::Value,
    },
    Disconnect,
}
