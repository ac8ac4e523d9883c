use serde::{Deserialize, Serialize};

/// How quickly silent remote cursors disappear.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LivenessConfig {
    /// Silence after which a remote cursor is removed (250-60000).
    pub stale_threshold_ms: u32,
    /// Sweep cadence while remote cursors exist (50-10000).
    pub sweep_interval_ms: u32,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            stale_threshold_ms: 2000,
            sweep_interval_ms: 500,
        }
    }
}
