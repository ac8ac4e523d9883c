use async_trait::async_trait;
use cursorcast_common::TransportError;
use tokio::sync::mpsc;

use crate::protocol::PresenceMessage;

/// Which shared stream to join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamSelector {
    /// A plain stream name, joined as-is.
    Named(String),
    /// An opaque server-issued token that names the stream.
    Signed(String),
}

impl StreamSelector {
    /// Key used to match frames on in-process buses.
    pub fn key(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Signed(token) => token,
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, Self::Signed(_))
    }
}

impl std::fmt::Display for StreamSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(name) => write!(f, "stream '{name}'"),
            Self::Signed(_) => write!(f, "signed stream"),
        }
    }
}

/// What a transport reports back to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// A (re)connection attempt started.
    Connecting,
    /// The stream is joined; messages flow.
    Connected,
    /// The connection dropped. The transport may retry on its own.
    Disconnected,
    /// One inbound payload, not yet validated.
    Message(serde_json::Value),
    Error(String),
}

/// A pub/sub channel carrying presence messages between participants.
///
/// Delivery is best effort: `send` never reports failure to the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open `stream` and return the receiver for its events.
    async fn connect(
        &mut self,
        stream: &StreamSelector,
    ) -> Result<mpsc::Receiver<TransportEvent>, TransportError>;

    async fn send(&self, message: &PresenceMessage);

    /// Close the stream. No further events are delivered.
    async fn disconnect(&mut self);
}
