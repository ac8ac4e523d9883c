//! Configuration schema.
//!
//! All structs use `serde(default)` so partial configs work.

mod liveness;
mod realtime;
mod session;
mod system;

pub use liveness::*;
pub use realtime::*;
pub use session::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CursorcastConfig {
    pub session: SessionConfig,
    pub stream: StreamConfig,
    pub liveness: LivenessConfig,
    pub realtime: RealtimeServerConfig,
    pub logging: LoggingConfig,
}
