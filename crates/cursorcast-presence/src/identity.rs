use std::time::Duration;

use cursorcast_common::{Color, ParticipantId};

/// Who the local participant is and how often it reports its pointer.
///
/// Built once per session; never persisted.
#[derive(Debug, Clone)]
pub struct LocalSession {
    pub participant_id: ParticipantId,
    pub color: String,
    /// Minimum spacing between outgoing moves. Zero disables throttling.
    pub throttle: Duration,
}

impl LocalSession {
    /// A fresh random id and a random cursor color, unthrottled.
    pub fn generate() -> Self {
        Self {
            participant_id: ParticipantId::new(),
            color: Color::random_cursor_color().to_hex(),
            throttle: Duration::ZERO,
        }
    }

    /// Use the supplied values where present and generate the rest.
    pub fn from_parts(
        participant_id: Option<String>,
        color: Option<String>,
        throttle: Duration,
    ) -> Self {
        Self {
            participant_id: participant_id
                .filter(|id| !id.is_empty())
                .map(ParticipantId::from)
                .unwrap_or_else(ParticipantId::new),
            color: color
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| Color::random_cursor_color().to_hex()),
            throttle,
        }
    }

    pub fn id(&self) -> &str {
        self.participant_id.as_str()
    }
}
