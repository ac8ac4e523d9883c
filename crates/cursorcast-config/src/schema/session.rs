//! Local participant and stream selection.

use serde::{Deserialize, Serialize};

/// Who we are on the stream. Empty strings mean "generate one".
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SessionConfig {
    pub participant_id: String,
    pub color: String,
    /// Minimum milliseconds between outgoing moves (0 = unthrottled).
    pub throttle_ms: u32,
}

/// Which stream to join. Exactly one of the two must be set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub name: String,
    pub signed_token: String,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            name: "lobby".into(),
            signed_token: String::new(),
        }
    }
}
