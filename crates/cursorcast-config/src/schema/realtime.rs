use serde::{Deserialize, Serialize};

/// Connection settings for the realtime server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RealtimeServerConfig {
    /// Hosted project reference. Ignored when `endpoint` is set.
    pub project_ref: String,
    pub api_key: String,
    /// Full WebSocket URL of a self-hosted server.
    pub endpoint: String,
    /// Heartbeat interval in seconds (5-300).
    pub heartbeat_interval: u32,
    /// Initial reconnect delay in seconds.
    pub reconnect_delay: u32,
    /// Reconnect delay cap in seconds.
    pub max_reconnect_delay: u32,
}

impl Default for RealtimeServerConfig {
    fn default() -> Self {
        Self {
            project_ref: String::new(),
            api_key: String::new(),
            endpoint: String::new(),
            heartbeat_interval: 25,
            reconnect_delay: 1,
            max_reconnect_delay: 30,
        }
    }
}
